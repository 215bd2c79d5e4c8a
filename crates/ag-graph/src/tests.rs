//! Unit tests for ag-graph.

use std::collections::HashMap;

use crate::{Axis, AxisType, Graph, Series, StorageReader};

// ── Helpers ───────────────────────────────────────────────────────────────────

/// In-memory reader over `(simulation, day, variable, value)` rows.
#[derive(Default)]
struct Rows {
    order: Vec<String>,
    data:  HashMap<(String, String), Vec<(u64, f64)>>,
}

impl Rows {
    fn push(&mut self, simulation: &str, day: u64, variable: &str, value: f64) {
        if !self.order.iter().any(|s| s == simulation) {
            self.order.push(simulation.to_string());
        }
        self.data.entry((simulation.into(), variable.into())).or_default().push((day, value));
    }
}

impl StorageReader for Rows {
    fn simulation_names(&self) -> Vec<String> {
        self.order.clone()
    }

    fn read_variable(&self, simulation: &str, variable: &str) -> Vec<(u64, f64)> {
        self.data.get(&(simulation.to_string(), variable.to_string())).cloned().unwrap_or_default()
    }
}

fn types(axes: &[Axis]) -> Vec<AxisType> {
    axes.iter().map(|a| a.axis_type).collect()
}

// ── Reconciliation ────────────────────────────────────────────────────────────

#[cfg(test)]
mod reconcile {
    use super::*;
    use crate::reconcile_axes;

    fn two_series() -> Vec<Series> {
        vec![
            Series::new("Weight", "Herd.Weight").on_axes(AxisType::Bottom, AxisType::Left),
            Series::new("Intake", "Herd.Intake").on_axes(AxisType::Bottom, AxisType::Right),
        ]
    }

    #[test]
    fn shared_x_axis_appears_once() {
        let mut axes = Vec::new();
        assert!(reconcile_axes(&mut axes, &two_series()));
        assert_eq!(types(&axes), [AxisType::Bottom, AxisType::Left, AxisType::Right]);
    }

    #[test]
    fn second_call_is_a_no_op() {
        let series = two_series();
        let mut axes = Vec::new();
        reconcile_axes(&mut axes, &series);
        let snapshot = axes.clone();
        assert!(!reconcile_axes(&mut axes, &series));
        assert_eq!(axes, snapshot);
    }

    #[test]
    fn order_of_series_does_not_change_the_set() {
        let mut series = two_series();
        series.reverse();
        let mut axes = Vec::new();
        reconcile_axes(&mut axes, &series);
        let mut got = types(&axes);
        got.sort();
        assert_eq!(got, [AxisType::Bottom, AxisType::Left, AxisType::Right]);
    }

    #[test]
    fn prunes_dead_axes_and_keeps_settings() {
        let mut axes = vec![
            Axis::new(AxisType::Top),
            Axis::new(AxisType::Left).with_title("kg"),
            Axis::new(AxisType::Left),
        ];
        let series = vec![Series::new("W", "Herd.Weight")];
        assert!(reconcile_axes(&mut axes, &series));
        assert_eq!(types(&axes), [AxisType::Left, AxisType::Bottom]);
        assert_eq!(axes[0].title, "kg");
    }

    #[test]
    fn disabled_series_do_not_reference_axes() {
        let series = vec![Series::new("W", "Herd.Weight").on_axes(AxisType::Top, AxisType::Right).disabled()];
        let mut axes = vec![Axis::new(AxisType::Top)];
        assert!(reconcile_axes(&mut axes, &series));
        assert!(axes.is_empty());
        assert!(!reconcile_axes(&mut axes, &series));
    }
}

// ── Definitions ───────────────────────────────────────────────────────────────

#[cfg(test)]
mod definitions {
    use super::*;

    fn storage() -> Rows {
        let mut rows = Rows::default();
        for day in 0..3 {
            rows.push("Wet", day, "Herd.Weight", 300.0 + day as f64);
            rows.push("Wet", day, "Herd.Intake", 7.0);
            rows.push("Dry", day, "Herd.Weight", 280.0 - day as f64);
        }
        // A redelivered row: the last value for the day wins.
        rows.push("Wet", 2, "Herd.Weight", 303.0);
        rows
    }

    #[test]
    fn one_definition_per_series_per_simulation() {
        let graph = Graph::new("G")
            .with_series(Series::new("Weight", "Herd.Weight"))
            .with_series(Series::new("Off", "Herd.Weight").disabled());
        let defs = graph.definitions(&storage(), None);
        assert_eq!(defs.len(), 2);
        assert_eq!(defs[0].simulation, "Wet");
        assert_eq!(defs[0].points, [(0.0, 300.0), (1.0, 301.0), (2.0, 303.0)]);
        assert_eq!(defs[1].simulation, "Dry");
    }

    #[test]
    fn simulation_filter_restricts() {
        let graph = Graph::new("G").with_series(Series::new("Weight", "Herd.Weight"));
        let filter = vec!["Dry".to_string()];
        let defs = graph.definitions(&storage(), Some(filter.as_slice()));
        assert_eq!(defs.len(), 1);
        assert_eq!(defs[0].simulation, "Dry");
    }

    #[test]
    fn non_day_x_field_joins_on_day() {
        let graph = Graph::new("G").with_series(Series::new("IvW", "Herd.Intake").with_x_field("Herd.Weight"));
        let defs = graph.definitions(&storage(), Some(&["Wet".to_string()][..]));
        assert_eq!(defs[0].points, [(300.0, 7.0), (301.0, 7.0), (303.0, 7.0)]);
    }

    #[test]
    fn empty_y_field_is_skipped_and_legend_flags_follow_graph() {
        let mut graph = Graph::new("G")
            .with_series(Series::new("Blank", ""))
            .with_series(Series::new("Weight", "Herd.Weight"));
        graph.disabled_series.push("Weight".into());
        let defs = graph.definitions(&storage(), None);
        assert_eq!(defs.len(), 2);
        assert!(defs.iter().all(|d| d.series == "Weight" && !d.show_in_legend));
    }
}

// ── Tree binding ──────────────────────────────────────────────────────────────

#[cfg(test)]
mod tree {
    use super::*;
    use crate::{definitions_to_graph, sync_axes};
    use ag_tree::{ModelNode, ModelTree, ModelType};

    fn graph_tree() -> (ModelTree, ag_core::ModelId) {
        let mut tree = ModelTree::new(ModelNode::new(ModelType::Simulations, "Simulations"));
        let root = tree.root();
        let graph = tree.add_child(root, ModelNode::new(ModelType::Graph, "Weights")).unwrap();
        let w = ModelNode::new(ModelType::Series, "Weight").with("y_field", "Herd.Weight").unwrap();
        tree.add_child(graph, w).unwrap();
        let i = ModelNode::new(ModelType::Series, "Intake")
            .with("y_field", "Herd.Intake")
            .unwrap()
            .with("y_axis", "Right")
            .unwrap();
        tree.add_child(graph, i).unwrap();
        let stale = ModelNode::new(ModelType::Axis, "Top").with("axis_type", "Top").unwrap();
        tree.add_child(graph, stale).unwrap();
        (tree, graph)
    }

    #[test]
    fn axis_nodes_follow_series() {
        let (mut tree, graph) = graph_tree();
        assert!(sync_axes(&mut tree, graph).unwrap());
        let g = Graph::from_tree(&tree, graph).unwrap();
        assert_eq!(types(&g.axes), [AxisType::Bottom, AxisType::Left, AxisType::Right]);
        assert!(tree.find_by_path(".Simulations.Weights.Top").is_none());
        assert!(tree.find_by_path(".Simulations.Weights.BottomAxis").is_some());

        let before = tree.len();
        assert!(!sync_axes(&mut tree, graph).unwrap());
        assert_eq!(tree.len(), before);
    }

    #[test]
    fn disabling_a_series_prunes_its_axis_node() {
        let (mut tree, graph) = graph_tree();
        sync_axes(&mut tree, graph).unwrap();
        let intake = tree.find_by_path(".Simulations.Weights.Intake").unwrap();
        tree.set_enabled(intake, false).unwrap();
        assert!(sync_axes(&mut tree, graph).unwrap());
        let g = Graph::from_tree(&tree, graph).unwrap();
        assert_eq!(types(&g.axes), [AxisType::Bottom, AxisType::Left]);
    }

    #[test]
    fn definitions_from_tree() {
        let (mut tree, graph) = graph_tree();
        let mut rows = Rows::default();
        rows.push("Sim", 0, "Herd.Weight", 250.0);
        rows.push("Sim", 0, "Herd.Intake", 6.0);
        let defs = definitions_to_graph(&mut tree, graph, &rows, None).unwrap();
        assert_eq!(defs.len(), 2);
        assert_eq!(defs[1].y_axis, AxisType::Right);
        assert_eq!(defs[1].points, [(0.0, 6.0)]);
        assert_eq!(tree.children_of_type(graph, ModelType::Axis).count(), 3);
    }

    #[test]
    fn non_graph_node_rejected() {
        let (tree, _) = graph_tree();
        assert!(Graph::from_tree(&tree, tree.root()).is_err());
    }
}
