//! The closed set of model node types and their registry entries.
//!
//! Each [`ModelType`] declares, in one place:
//!
//! - the set of parent types it may be attached under ([`ModelType::valid_parents`]);
//! - the property schema a freshly created node starts with
//!   ([`ModelType::schema`]): kinds, defaults, units and constraints.
//!
//! `ModelTree` consults this registry on every attach, including while a
//! tree is rebuilt from a JSON document.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::property::{Constraint, Property, PropertyKind, PropertyValue, Rule};

/// Names accepted by `RuminantActivityFeed.feed_style`.
pub const FEED_STYLES: [&str; 6] = [
    "SpecifiedDailyAmount",
    "SpecifiedDailyAmountPerIndividual",
    "ProportionOfFeedAvailable",
    "ProportionOfWeight",
    "ProportionOfPotentialIntake",
    "ProportionOfRemainingIntakeRequired",
];

/// Operators accepted by `RuminantFilter.operator`.
pub const FILTER_OPERATORS: [&str; 6] = ["==", "!=", "<", "<=", ">", ">="];

/// Axis slots accepted by `Series.x_axis`, `Series.y_axis` and `Axis.axis_type`.
pub const AXIS_TYPES: [&str; 4] = ["Bottom", "Left", "Top", "Right"];

pub const LEGEND_POSITIONS: [&str; 12] = [
    "TopLeft", "TopCenter", "TopRight", "BottomLeft", "BottomCenter", "BottomRight",
    "LeftTop", "LeftMiddle", "LeftBottom", "RightTop", "RightMiddle", "RightBottom",
];

pub const ANNOTATION_POSITIONS: [&str; 4] = ["TopLeft", "TopRight", "BottomLeft", "BottomRight"];

/// Largest `count` a single `RuminantCohort` node accepts.
pub const MAX_COHORT_COUNT: i64 = 100_000;

pub const PHASE_POLICIES: [&str; 2] = ["Loop", "Terminate"];

pub const ACCUMULATIONS: [&str; 2] = ["ThermalTime", "Days"];

/// Every kind of node the model tree can hold.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ModelType {
    Simulations,
    Simulation,
    Experiment,
    Folder,
    Zone,
    Clock,
    Weather,
    Plant,
    Phenology,
    Phase,
    RuminantHerd,
    RuminantCohort,
    RuminantActivityFeed,
    RuminantFeedGroup,
    RuminantFilter,
    GraphPanel,
    Graph,
    Series,
    Axis,
    Manager,
}

impl ModelType {
    pub const ALL: [ModelType; 20] = [
        ModelType::Simulations,
        ModelType::Simulation,
        ModelType::Experiment,
        ModelType::Folder,
        ModelType::Zone,
        ModelType::Clock,
        ModelType::Weather,
        ModelType::Plant,
        ModelType::Phenology,
        ModelType::Phase,
        ModelType::RuminantHerd,
        ModelType::RuminantCohort,
        ModelType::RuminantActivityFeed,
        ModelType::RuminantFeedGroup,
        ModelType::RuminantFilter,
        ModelType::GraphPanel,
        ModelType::Graph,
        ModelType::Series,
        ModelType::Axis,
        ModelType::Manager,
    ];

    /// Parent types this node may be attached under.  Empty means the type
    /// can only be a tree root.
    pub fn valid_parents(self) -> &'static [ModelType] {
        use ModelType::*;
        match self {
            Simulations => &[],
            Simulation => &[Simulations, Folder, Experiment],
            Experiment => &[Simulations, Folder],
            Folder => &[Simulations, Folder, Simulation, Zone],
            Zone => &[Simulation, Zone],
            Clock | Weather => &[Simulation],
            Plant => &[Zone],
            Phenology => &[Plant],
            Phase => &[Phenology],
            RuminantHerd => &[Simulation, Zone],
            RuminantCohort => &[RuminantHerd],
            RuminantActivityFeed => &[Simulation, Zone, Folder],
            RuminantFeedGroup => &[RuminantActivityFeed],
            RuminantFilter => &[RuminantFeedGroup],
            GraphPanel => &[Simulations, Folder],
            Graph => &[Simulations, Simulation, Zone, Experiment, Folder, GraphPanel],
            Series | Axis => &[Graph],
            Manager => &[Simulation, Zone, Folder],
        }
    }

    /// `true` if a node of this type may sit directly under `parent`.
    #[inline]
    pub fn accepts_parent(self, parent: ModelType) -> bool {
        self.valid_parents().contains(&parent)
    }

    /// Default properties for a new node of this type.
    pub fn schema(self) -> Vec<Property> {
        use ModelType::*;
        match self {
            Simulations | Simulation | Experiment | Folder | GraphPanel => vec![],
            Zone => vec![
                number("area", 1.0, vec![Rule::error(Constraint::GreaterThan(0.0))])
                    .with_units("ha")
                    .with_description("Area of the zone"),
            ],
            Clock => vec![
                integer("start_day_of_year", 1, vec![Rule::error(Constraint::Range { min: 1.0, max: 366.0 })])
                    .with_description("Day of year the run starts on"),
                integer("total_days", 365, vec![Rule::error(Constraint::GreaterThan(0.0))])
                    .with_units("d"),
            ],
            Weather => vec![
                number("min_temp", 10.0, vec![]).with_units("oC"),
                number("max_temp", 25.0, vec![]).with_units("oC"),
            ],
            Plant => vec![text("crop", "wheat", vec![Rule::error(Constraint::NotEmpty)])],
            Phenology => vec![
                choice("final_phase_policy", "Terminate", &PHASE_POLICIES)
                    .with_description("What happens when the last phase completes"),
                number("base_temp", 0.0, vec![]).with_units("oC"),
                number("optimum_temp", 26.0, vec![]).with_units("oC"),
                number("maximum_temp", 34.0, vec![]).with_units("oC"),
            ],
            Phase => vec![
                text("start", "", vec![]).with_description("Event raised when the phase starts"),
                text("end", "", vec![]).with_description("Event raised when the phase ends"),
                number("target", 100.0, vec![Rule::error(Constraint::GreaterThan(0.0))])
                    .with_units("oCd")
                    .with_description("Accumulation required to complete the phase"),
                choice("accumulation", "ThermalTime", &ACCUMULATIONS),
            ],
            RuminantHerd => vec![text("breed", "Bos indicus", vec![Rule::error(Constraint::NotEmpty)])],
            RuminantCohort => vec![
                choice("sex", "Female", &["Female", "Male"]),
                integer("count", 1, vec![Rule::error(Constraint::Range { min: 0.0, max: MAX_COHORT_COUNT as f64 })]),
                number("age_months", 24.0, vec![Rule::error(Constraint::GreaterThanOrEqual(0.0))])
                    .with_units("months"),
                number("weight", 250.0, vec![Rule::error(Constraint::GreaterThan(0.0))])
                    .with_units("kg"),
                number("weight_sd", 0.0, vec![Rule::error(Constraint::GreaterThanOrEqual(0.0))])
                    .with_units("kg")
                    .with_description("Half-width of the uniform weight jitter"),
                boolean("lactating", false),
                boolean("pregnant", false),
                boolean("castrated", false),
            ],
            RuminantActivityFeed => vec![
                choice("feed_style", "SpecifiedDailyAmount", &FEED_STYLES)
                    .with_description("How each feed group's value is interpreted"),
                text("feed_type", "Hay", vec![Rule::error(Constraint::NotEmpty)]),
                number("feed_available", 0.0, vec![Rule::error(Constraint::GreaterThanOrEqual(0.0))])
                    .with_units("kg/d"),
            ],
            RuminantFeedGroup => vec![
                number("value", 1.0, vec![Rule::warning(Constraint::GreaterThan(0.0))])
                    .with_description("Value to supply"),
            ],
            RuminantFilter => vec![
                text("parameter", "Weight", vec![Rule::error(Constraint::NotEmpty)]),
                choice("operator", ">=", &FILTER_OPERATORS),
                text("value", "0", vec![]),
            ],
            Graph => vec![
                text("caption", "", vec![]),
                choice("legend_position", "TopLeft", &LEGEND_POSITIONS),
                choice("legend_orientation", "Vertical", &["Vertical", "Horizontal"]),
                choice("annotation_position", "TopLeft", &ANNOTATION_POSITIONS),
                boolean("legend_outside_graph", false),
                text("disabled_series", "", vec![])
                    .with_description("Comma-separated series names hidden from the legend"),
            ],
            Series => vec![
                text("table_name", "Report", vec![Rule::error(Constraint::NotEmpty)]),
                text("x_field", "Day", vec![Rule::error(Constraint::NotEmpty)]),
                text("y_field", "", vec![Rule::warning(Constraint::NotEmpty)]),
                choice("x_axis", "Bottom", &AXIS_TYPES),
                choice("y_axis", "Left", &AXIS_TYPES),
            ],
            Axis => vec![
                choice("axis_type", "Bottom", &AXIS_TYPES),
                text("title", "", vec![]),
                boolean("inverted", false),
                boolean("cross_at_zero", false),
            ],
            Manager => vec![
                text("script", "", vec![])
                    .with_description("Name of the component bound to this manager"),
            ],
        }
    }
}

impl fmt::Display for ModelType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

impl FromStr for ModelType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ModelType::ALL
            .iter()
            .copied()
            .find(|t| t.to_string() == s)
            .ok_or_else(|| format!("unknown model type {s:?}"))
    }
}

// ── Schema helpers ────────────────────────────────────────────────────────────
//
// Defaults are covered by `schema_defaults_are_valid` in the test suite.

fn declare(name: &str, kind: PropertyKind, value: PropertyValue, rules: Vec<Rule>) -> Property {
    Property::declared(name, kind, value, rules)
}

fn number(name: &str, value: f64, rules: Vec<Rule>) -> Property {
    declare(name, PropertyKind::Number, value.into(), rules)
}

fn integer(name: &str, value: i64, rules: Vec<Rule>) -> Property {
    declare(name, PropertyKind::Integer, value.into(), rules)
}

fn boolean(name: &str, value: bool) -> Property {
    declare(name, PropertyKind::Bool, value.into(), vec![])
}

fn text(name: &str, value: &str, rules: Vec<Rule>) -> Property {
    declare(name, PropertyKind::Text, value.into(), rules)
}

fn choice(name: &str, value: &str, options: &[&str]) -> Property {
    let options = options.iter().map(|s| s.to_string()).collect();
    declare(name, PropertyKind::Text, value.into(), vec![Rule::error(Constraint::OneOf(options))])
}
