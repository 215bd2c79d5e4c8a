//! `Graph`: axes and series of one plot, reconciled against each other.
//!
//! # Axis reconciliation
//!
//! The axis list is kept equal to the set of axis slots referenced by
//! enabled series:
//!
//! 1. collect the x and y axis type of every enabled series;
//! 2. drop axes whose type nobody references (and duplicates of a type);
//! 3. append a default axis for every referenced type still missing.
//!
//! Existing axes keep their position and settings.  Reconciliation reports
//! whether it changed anything so observers are only notified on a real
//! change; running it twice in a row is a no-op the second time.

use std::collections::BTreeMap;

use ag_core::ModelId;
use ag_tree::{ModelNode, ModelTree, ModelType};

use crate::series::X_FIELD_DAY;
use crate::{Axis, AxisType, GraphError, GraphResult, Series, SeriesDefinition, StorageReader};

// ── Reconciliation ────────────────────────────────────────────────────────────

/// Axis types referenced by enabled series, x before y, first-seen order.
pub fn referenced_axes(series: &[Series]) -> Vec<AxisType> {
    let mut types = Vec::new();
    for s in series.iter().filter(|s| s.enabled) {
        for t in [s.x_axis, s.y_axis] {
            if !types.contains(&t) {
                types.push(t);
            }
        }
    }
    types
}

/// Make `axes` hold exactly one axis per type referenced by `series`.
/// Returns `true` if anything was pruned or added.
pub fn reconcile_axes(axes: &mut Vec<Axis>, series: &[Series]) -> bool {
    let referenced = referenced_axes(series);

    let before = axes.len();
    let mut kept: Vec<AxisType> = Vec::with_capacity(before);
    axes.retain(|a| {
        let keep = referenced.contains(&a.axis_type) && !kept.contains(&a.axis_type);
        if keep {
            kept.push(a.axis_type);
        }
        keep
    });
    let pruned = axes.len() != before;

    let mut added = false;
    for t in referenced {
        if !kept.contains(&t) {
            axes.push(Axis::new(t));
            added = true;
        }
    }
    pruned || added
}

// ── Graph ─────────────────────────────────────────────────────────────────────

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Graph {
    pub name:            String,
    pub caption:         String,
    pub axes:            Vec<Axis>,
    pub series:          Vec<Series>,
    /// Series hidden from the legend.
    pub disabled_series: Vec<String>,
}

impl Graph {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into(), ..Self::default() }
    }

    pub fn with_series(mut self, series: Series) -> Self {
        self.series.push(series);
        self
    }

    pub fn with_axis(mut self, axis: Axis) -> Self {
        self.axes.push(axis);
        self
    }

    pub fn axis(&self, axis_type: AxisType) -> Option<&Axis> {
        self.axes.iter().find(|a| a.axis_type == axis_type)
    }

    /// See the module docs.
    pub fn ensure_axes_consistent(&mut self) -> bool {
        let changed = reconcile_axes(&mut self.axes, &self.series);
        if changed {
            tracing::debug!(graph = %self.name, axes = self.axes.len(), "axes reconciled");
        }
        changed
    }

    /// Read a `Graph` node with its `Axis` and `Series` children.
    pub fn from_tree(tree: &ModelTree, id: ModelId) -> GraphResult<Self> {
        let node = tree.node(id)?;
        if node.model_type() != ModelType::Graph {
            return Err(GraphError::WrongNodeType { path: tree.path(id), expected: "Graph" });
        }
        let axes = tree
            .children_of_type(id, ModelType::Axis)
            .map(|(axis, n)| axis_from_node(tree, axis, n))
            .collect::<GraphResult<Vec<_>>>()?;
        let series = tree
            .children_of_type(id, ModelType::Series)
            .map(|(s, n)| series_from_node(tree, s, n))
            .collect::<GraphResult<Vec<_>>>()?;
        let disabled_series = node
            .text("disabled_series")
            .unwrap_or_default()
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect();
        Ok(Self {
            name: node.name().to_string(),
            caption: node.text("caption").unwrap_or_default().to_string(),
            axes,
            series,
            disabled_series,
        })
    }

    /// One definition per enabled series per simulation in storage,
    /// restricted to `simulation_filter` when given.
    pub fn definitions(
        &self,
        storage:           &dyn StorageReader,
        simulation_filter: Option<&[String]>,
    ) -> Vec<SeriesDefinition> {
        let simulations: Vec<String> = storage
            .simulation_names()
            .into_iter()
            .filter(|name| simulation_filter.is_none_or(|f| f.contains(name)))
            .collect();

        let mut definitions = Vec::new();
        for s in self.series.iter().filter(|s| s.enabled) {
            if s.y_field.trim().is_empty() {
                tracing::warn!(graph = %self.name, series = %s.name, "series has no y field; skipped");
                continue;
            }
            for simulation in &simulations {
                definitions.push(SeriesDefinition {
                    series:         s.name.clone(),
                    simulation:     simulation.clone(),
                    table_name:     s.table_name.clone(),
                    x_field:        s.x_field.clone(),
                    y_field:        s.y_field.clone(),
                    x_axis:         s.x_axis,
                    y_axis:         s.y_axis,
                    show_in_legend: !self.disabled_series.contains(&s.name),
                    points:         points(storage, simulation, &s.x_field, &s.y_field),
                });
            }
        }
        definitions
    }
}

/// Last value per day for one variable.
fn by_day(storage: &dyn StorageReader, simulation: &str, variable: &str) -> BTreeMap<u64, f64> {
    storage.read_variable(simulation, variable).into_iter().collect()
}

fn points(storage: &dyn StorageReader, simulation: &str, x_field: &str, y_field: &str) -> Vec<(f64, f64)> {
    let ys = by_day(storage, simulation, y_field);
    if x_field == X_FIELD_DAY {
        return ys.into_iter().map(|(day, y)| (day as f64, y)).collect();
    }
    let xs = by_day(storage, simulation, x_field);
    ys.into_iter().filter_map(|(day, y)| xs.get(&day).map(|&x| (x, y))).collect()
}

// ── Tree binding ──────────────────────────────────────────────────────────────

fn required<'a>(tree: &ModelTree, id: ModelId, node: &'a ModelNode, property: &str) -> GraphResult<&'a str> {
    node.text(property)
        .ok_or_else(|| GraphError::MissingProperty { path: tree.path(id), property: property.into() })
}

fn axis_type(tree: &ModelTree, id: ModelId, node: &ModelNode, property: &str) -> GraphResult<AxisType> {
    let value = required(tree, id, node, property)?;
    value
        .parse()
        .map_err(|_| GraphError::UnknownAxisType { path: tree.path(id), value: value.to_string() })
}

fn axis_from_node(tree: &ModelTree, id: ModelId, node: &ModelNode) -> GraphResult<Axis> {
    Ok(Axis {
        axis_type:     axis_type(tree, id, node, "axis_type")?,
        title:         node.text("title").unwrap_or_default().to_string(),
        inverted:      node.flag("inverted").unwrap_or(false),
        cross_at_zero: node.flag("cross_at_zero").unwrap_or(false),
    })
}

fn series_from_node(tree: &ModelTree, id: ModelId, node: &ModelNode) -> GraphResult<Series> {
    Ok(Series {
        name:       node.name().to_string(),
        enabled:    node.is_enabled(),
        table_name: required(tree, id, node, "table_name")?.to_string(),
        x_field:    required(tree, id, node, "x_field")?.to_string(),
        y_field:    node.text("y_field").unwrap_or_default().to_string(),
        x_axis:     axis_type(tree, id, node, "x_axis")?,
        y_axis:     axis_type(tree, id, node, "y_axis")?,
    })
}

/// Reconcile the `Axis` children of a `Graph` node in the tree.  Nodes for
/// unreferenced (or duplicate) axis types are removed; missing types get a
/// new default `Axis` node.  Returns `true` if the tree changed.
pub fn sync_axes(tree: &mut ModelTree, graph: ModelId) -> GraphResult<bool> {
    let current = Graph::from_tree(tree, graph)?;
    let referenced = referenced_axes(&current.series);

    let axis_nodes: Vec<(ModelId, AxisType)> = tree
        .children_of_type(graph, ModelType::Axis)
        .map(|(id, n)| axis_type(tree, id, n, "axis_type").map(|t| (id, t)))
        .collect::<GraphResult<_>>()?;

    let mut kept: Vec<AxisType> = Vec::new();
    let mut changed = false;
    for (id, t) in axis_nodes {
        if referenced.contains(&t) && !kept.contains(&t) {
            kept.push(t);
        } else {
            tree.remove(id)?;
            changed = true;
        }
    }
    for t in referenced.into_iter().filter(|t| !kept.contains(t)) {
        let name = unique_child_name(tree, graph, &format!("{t}Axis"));
        let node = ModelNode::new(ModelType::Axis, name)
            .with("axis_type", t.to_string())
            .map_err(|source| GraphError::Tree(ag_tree::TreeError::Validation { path: tree.path(graph), source }))?;
        tree.add_child(graph, node)?;
        changed = true;
    }
    if changed {
        tracing::debug!(graph = %tree.path(graph), "axis nodes reconciled");
    }
    Ok(changed)
}

fn unique_child_name(tree: &ModelTree, parent: ModelId, base: &str) -> String {
    let taken = |name: &str| {
        tree.get(parent)
            .map(|p| p.children().iter().any(|&c| tree.get(c).is_some_and(|n| n.name() == name)))
            .unwrap_or(false)
    };
    if !taken(base) {
        return base.to_string();
    }
    (2..)
        .map(|i| format!("{base}{i}"))
        .find(|name| !taken(name))
        .unwrap_or_else(|| base.to_string())
}

/// Reconcile the graph's axis nodes, then derive one series definition per
/// enabled series per matching simulation.
pub fn definitions_to_graph(
    tree:              &mut ModelTree,
    graph:             ModelId,
    storage:           &dyn StorageReader,
    simulation_filter: Option<&[String]>,
) -> GraphResult<Vec<SeriesDefinition>> {
    sync_axes(tree, graph)?;
    let graph = Graph::from_tree(tree, graph)?;
    Ok(graph.definitions(storage, simulation_filter))
}
