//! The `Component` trait, the extension point for `Manager` nodes, and
//! the per-node state the scheduler owns.

use ag_core::{ModelId, Tick};
use ag_herd::{FeedActivity, Herd};
use ag_phenology::{DailyWeather, Phenology};

use crate::{ComponentError, DayReport};

// ── Bound state ───────────────────────────────────────────────────────────────

/// A herd bound from a `RuminantHerd` node.
#[derive(Debug)]
pub struct HerdState {
    pub id:     ModelId,
    /// Full tree path of the node.
    pub path:   String,
    /// Output variable prefix: the path below the simulation node.
    pub prefix: String,
    pub herd:   Herd,
}

/// A phenology bound from a `Phenology` node.
#[derive(Debug)]
pub struct PhenologyState {
    pub id:        ModelId,
    pub path:      String,
    pub prefix:    String,
    pub phenology: Phenology,
}

// ── User components ───────────────────────────────────────────────────────────

/// Read/write view of the simulation handed to a [`Component`] each day.
pub struct StepContext<'a> {
    pub tick:        Tick,
    pub day_of_year: u32,
    pub weather:     DailyWeather,
    /// Path of the node this component is bound to.
    pub path:        &'a str,
    pub herds:       &'a mut [HerdState],
    pub phenologies: &'a [PhenologyState],
    prefix:          &'a str,
    report:          &'a mut DayReport,
}

impl<'a> StepContext<'a> {
    pub(crate) fn new(
        tick:        Tick,
        day_of_year: u32,
        weather:     DailyWeather,
        path:        &'a str,
        prefix:      &'a str,
        herds:       &'a mut [HerdState],
        phenologies: &'a [PhenologyState],
        report:      &'a mut DayReport,
    ) -> Self {
        Self { tick, day_of_year, weather, path, herds, phenologies, prefix, report }
    }

    /// Record `<node>.<variable> = value` for today.
    pub fn report(&mut self, variable: &str, value: f64) {
        self.report.push(format!("{}.{variable}", self.prefix), value);
    }

    pub fn herd_mut(&mut self, path: &str) -> Option<&mut Herd> {
        self.herds.iter_mut().find(|h| h.path == path).map(|h| &mut h.herd)
    }

    pub fn phenology(&self, path: &str) -> Option<&Phenology> {
        self.phenologies.iter().find(|p| p.path == path).map(|p| &p.phenology)
    }
}

/// Daily behaviour bound to a `Manager` node through
/// [`SimBuilder::component`](crate::SimBuilder::component).
///
/// Components run in tree pre-order together with the built-in herd,
/// phenology and feed components.  Returning an error aborts the run; the
/// error reports this component's node path.
///
/// # Example
///
/// ```rust
/// use ag_sim::{Component, ComponentError, StepContext};
///
/// /// Adds 0.5 kg to every animal each day.
/// struct Growth;
///
/// impl Component for Growth {
///     fn on_day(&mut self, ctx: &mut StepContext<'_>) -> Result<(), ComponentError> {
///         for state in ctx.herds.iter_mut() {
///             for animal in &mut state.herd.individuals {
///                 animal.weight += 0.5;
///             }
///         }
///         ctx.report("Applied", 1.0);
///         Ok(())
///     }
/// }
/// ```
pub trait Component {
    fn on_day(&mut self, ctx: &mut StepContext<'_>) -> Result<(), ComponentError>;
}

// ── Registration ──────────────────────────────────────────────────────────────

/// What runs for one registered node.
pub(crate) enum Binding {
    /// Reset intake, age and recompute potential intake.
    HerdDayStart { herd: usize },
    Phenology { phenology: usize },
    Feed { activity: FeedActivity, herd: usize },
    User(Box<dyn Component>),
}

impl Binding {
    pub(crate) fn kind(&self) -> &'static str {
        match self {
            Binding::HerdDayStart { .. } => "herd",
            Binding::Phenology { .. } => "phenology",
            Binding::Feed { .. } => "feed",
            Binding::User(_) => "manager",
        }
    }
}

/// A node bound to a daily callback, in registration order.
pub(crate) struct Registration {
    pub(crate) id:      ModelId,
    pub(crate) path:    String,
    pub(crate) prefix:  String,
    pub(crate) binding: Binding,
}
