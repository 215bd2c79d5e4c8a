//! The demo model tree.
//!
//! ```text
//! Simulations
//! └─ Paddock
//!    ├─ Clock                        day 91, 120 days
//!    ├─ Weather                      8 / 24 °C
//!    ├─ Field (Zone, 40 ha)
//!    │  ├─ Wheat / Phenology         Emergence → Vegetative → Flowering → Maturity
//!    │  ├─ Cattle                    breeders, calves, steers
//!    │  ├─ Supplement                feed activity, two groups
//!    │  └─ Growth                    Manager
//!    └─ Weights                      Graph: steer and breeder mean weight
//! ```

use anyhow::Result;

use ag_core::ModelId;
use ag_tree::{ModelNode, ModelTree, ModelType};

pub const GROWTH_MANAGER: &str = ".Simulations.Paddock.Field.Growth";
pub const GRAPH: &str = ".Simulations.Paddock.Weights";

pub fn build_tree() -> Result<ModelTree> {
    let mut tree = ModelTree::new(ModelNode::new(ModelType::Simulations, "Simulations"));
    let sim = tree.add_child(tree.root(), ModelNode::new(ModelType::Simulation, "Paddock"))?;

    let clock = ModelNode::new(ModelType::Clock, "Clock")
        .with("start_day_of_year", 91i64)?
        .with("total_days", 120i64)?;
    tree.add_child(sim, clock)?;
    let weather = ModelNode::new(ModelType::Weather, "Weather").with("min_temp", 8.0)?.with("max_temp", 24.0)?;
    tree.add_child(sim, weather)?;

    let field = tree.add_child(sim, ModelNode::new(ModelType::Zone, "Field").with("area", 40.0)?)?;

    // ── Crop ──────────────────────────────────────────────────────────────
    let wheat = tree.add_child(field, ModelNode::new(ModelType::Plant, "Wheat"))?;
    let phenology = tree.add_child(wheat, ModelNode::new(ModelType::Phenology, "Phenology"))?;
    for (name, target, start, end) in [
        ("Emergence", 120.0, "Sowing", "Emergence"),
        ("Vegetative", 600.0, "Emergence", "EndOfVegetative"),
        ("Flowering", 250.0, "EndOfVegetative", "StartGrainFill"),
        ("Maturity", 500.0, "StartGrainFill", "Maturity"),
    ] {
        let phase = ModelNode::new(ModelType::Phase, name)
            .with("target", target)?
            .with("start", start)?
            .with("end", end)?;
        tree.add_child(phenology, phase)?;
    }

    // ── Herd ──────────────────────────────────────────────────────────────
    let herd = tree.add_child(field, ModelNode::new(ModelType::RuminantHerd, "Cattle"))?;
    let breeders = ModelNode::new(ModelType::RuminantCohort, "Breeders")
        .with("count", 30i64)?
        .with("age_months", 48.0)?
        .with("weight", 420.0)?
        .with("weight_sd", 25.0)?
        .with("lactating", true)?;
    tree.add_child(herd, breeders)?;
    let calves = ModelNode::new(ModelType::RuminantCohort, "Calves")
        .with("count", 20i64)?
        .with("age_months", 3.0)?
        .with("weight", 110.0)?
        .with("weight_sd", 10.0)?;
    tree.add_child(herd, calves)?;
    let steers = ModelNode::new(ModelType::RuminantCohort, "Steers")
        .with("sex", "Male")?
        .with("count", 12i64)?
        .with("age_months", 18.0)?
        .with("weight", 330.0)?
        .with("weight_sd", 20.0)?
        .with("castrated", true)?;
    tree.add_child(herd, steers)?;

    // ── Feeding ───────────────────────────────────────────────────────────
    let feed = ModelNode::new(ModelType::RuminantActivityFeed, "Supplement")
        .with("feed_style", "ProportionOfPotentialIntake")?
        .with("feed_type", "Lucerne hay")?;
    let feed = tree.add_child(field, feed)?;

    let lactating = tree.add_child(feed, ModelNode::new(ModelType::RuminantFeedGroup, "Lactating").with("value", 0.6)?)?;
    // Sex first: males have no Lactating attribute and the group stops at
    // the first false filter.
    add_filters(&mut tree, lactating, &[("Female", "Sex", "==", "Female"), ("Milking", "Lactating", "==", "true")])?;

    let steers = tree.add_child(feed, ModelNode::new(ModelType::RuminantFeedGroup, "Steers").with("value", 0.8)?)?;
    add_filters(&mut tree, steers, &[("Male", "Sex", "==", "Male"), ("Light", "Weight", "<", "400")])?;

    tree.add_child(field, ModelNode::new(ModelType::Manager, "Growth").with("script", "LiveweightGain")?)?;

    // ── Graph ─────────────────────────────────────────────────────────────
    let graph = tree.add_child(sim, ModelNode::new(ModelType::Graph, "Weights").with("caption", "Mean liveweight")?)?;
    for (name, y_field) in [("Herd", "Field.Cattle.MeanWeight"), ("Stage", "Field.Wheat.Phenology.Stage")] {
        let series = ModelNode::new(ModelType::Series, name).with("y_field", y_field)?;
        tree.add_child(graph, series)?;
    }
    // Stale axis from an earlier layout; reconciliation drops it.
    tree.add_child(graph, ModelNode::new(ModelType::Axis, "Top").with("axis_type", "Top")?)?;

    Ok(tree)
}

fn add_filters(tree: &mut ModelTree, group: ModelId, filters: &[(&str, &str, &str, &str)]) -> Result<()> {
    for &(name, parameter, operator, value) in filters {
        let filter = ModelNode::new(ModelType::RuminantFilter, name)
            .with("parameter", parameter)?
            .with("operator", operator)?
            .with("value", value)?;
        tree.add_child(group, filter)?;
    }
    Ok(())
}
