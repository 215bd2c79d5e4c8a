//! Simulation observer trait for progress reporting and data collection.

use ag_core::Tick;
use ag_phenology::PhaseTransition;

use crate::OutputRow;

/// Callbacks invoked by [`Sim::run`][crate::Sim::run] at key points in the
/// day loop.
///
/// All methods have default no-op implementations so implementors only need
/// to override what they care about.
///
/// # Example: progress printer
///
/// ```rust
/// use ag_core::Tick;
/// use ag_sim::SimObserver;
///
/// struct ProgressPrinter { interval: u64 }
///
/// impl SimObserver for ProgressPrinter {
///     fn on_day_end(&mut self, tick: Tick) {
///         if tick.0 % self.interval == 0 {
///             println!("finished {tick}");
///         }
///     }
/// }
/// ```
pub trait SimObserver {
    /// Called at the very start of each day, before any component runs.
    fn on_day_start(&mut self, _tick: Tick) {}

    /// Called when a phenology completes a phase.  Several calls may happen
    /// on one day.
    fn on_phase_change(&mut self, _tick: Tick, _phenology_path: &str, _transition: &PhaseTransition) {}

    /// Called once per output day, after every component has run, with that
    /// day's buffered rows.
    fn on_rows(&mut self, _rows: &[OutputRow]) {}

    /// Called at the end of each day.
    fn on_day_end(&mut self, _tick: Tick) {}

    /// Called after the final day when a graph's axis nodes were changed by
    /// reconciliation.
    fn on_axes_changed(&mut self, _graph_path: &str) {}

    /// Called once after the final day completes.
    fn on_sim_end(&mut self, _final_tick: Tick) {}
}

/// A [`SimObserver`] that does nothing.  Use when you need to call `run` but
/// don't want progress callbacks.
pub struct NoopObserver;

impl SimObserver for NoopObserver {}
