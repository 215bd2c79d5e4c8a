//! Output rows and the per-day buffer components write into.

use ag_core::Tick;

/// One stored value: `(simulation, day, variable, value)`.
#[derive(Debug, Clone, PartialEq)]
pub struct OutputRow {
    pub simulation: String,
    pub day:        u64,
    pub variable:   String,
    pub value:      f64,
}

/// Rows collected during one day.  Handed to the observer only after all
/// components have run, so no I/O happens inside the component loop.
#[derive(Debug, Default)]
pub struct DayReport {
    simulation: String,
    day:        u64,
    /// `false` on days between output intervals; rows are dropped.
    emit:       bool,
    rows:       Vec<OutputRow>,
}

impl DayReport {
    pub(crate) fn new(simulation: impl Into<String>) -> Self {
        Self { simulation: simulation.into(), ..Self::default() }
    }

    pub(crate) fn begin(&mut self, tick: Tick, emit: bool) {
        self.day = tick.0;
        self.emit = emit;
        self.rows.clear();
    }

    /// Record `variable = value` for today.
    pub fn push(&mut self, variable: impl Into<String>, value: f64) {
        if self.emit {
            self.rows.push(OutputRow {
                simulation: self.simulation.clone(),
                day:        self.day,
                variable:   variable.into(),
                value,
            });
        }
    }

    pub fn is_emitting(&self) -> bool {
        self.emit
    }

    pub fn rows(&self) -> &[OutputRow] {
        &self.rows
    }
}
