//! The `Phase` trait and the thermal-time phase.
//!
//! # Carry-over
//!
//! A phase is stepped with the fraction of today still unused.  When the
//! accumulation would overshoot the target, the phase consumes only what it
//! needs and hands back the rest of the day:
//!
//! ```text
//! target = 10, tt_in_phase = 8, today's accumulation = 5
//! needed   = 2          consumed = 2 / 5 = 0.4
//! leftover = 1.0 * (1 - 0.4) = 0.6  → next phase starts with 60 % of today
//! ```

use std::fmt;
use std::io;
use std::sync::Arc;

use crate::{Accumulation, DailyWeather, PhenologyError, PhenologyResult};

// ── Context and target ────────────────────────────────────────────────────────

/// State a dynamic target may read.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct PhaseContext {
    pub weather:       DailyWeather,
    /// Whole days the current phase has been stepped, including today.
    pub days_in_phase: u32,
}

impl PhaseContext {
    pub fn new(weather: DailyWeather) -> Self {
        Self { weather, days_in_phase: 0 }
    }
}

/// A phase target: constant, or a function re-evaluated on every read.
#[derive(Clone)]
pub enum Target {
    Fixed(f64),
    Dynamic(Arc<dyn Fn(&PhaseContext) -> f64 + Send + Sync>),
}

impl Target {
    pub fn dynamic(f: impl Fn(&PhaseContext) -> f64 + Send + Sync + 'static) -> Self {
        Target::Dynamic(Arc::new(f))
    }

    pub fn value(&self, ctx: &PhaseContext) -> f64 {
        match self {
            Target::Fixed(v) => *v,
            Target::Dynamic(f) => f(ctx),
        }
    }
}

impl fmt::Debug for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Target::Fixed(v) => f.debug_tuple("Fixed").field(v).finish(),
            Target::Dynamic(_) => f.write_str("Dynamic(..)"),
        }
    }
}

impl From<f64> for Target {
    fn from(v: f64) -> Self {
        Target::Fixed(v)
    }
}

// ── Phase trait ───────────────────────────────────────────────────────────────

/// Outcome of stepping a phase.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct PhaseStep {
    pub completed:         bool,
    /// Share of the offered day fraction this phase used, in `[0, 1]`.
    pub consumed_fraction: f64,
    /// Day fraction left for the next phase.  Zero unless `completed`.
    pub leftover:          f64,
}

/// One stage of development.
pub trait Phase: Send {
    fn name(&self) -> &str;

    /// Event raised when the phase starts.
    fn start(&self) -> &str;

    /// Event raised when the phase ends.
    fn end(&self) -> &str;

    /// Accumulate `prop_of_day_to_use` of today's driver.
    fn do_time_step(&mut self, prop_of_day_to_use: f64, ctx: &PhaseContext) -> PhenologyResult<PhaseStep>;

    /// `min(1, tt_in_phase / target)`.
    fn fraction_complete(&self) -> f64;

    /// Current target, recomputed on every call.
    fn target(&self) -> f64;

    fn set_target(&mut self, target: Target);

    /// Accumulation credited by the most recent step.
    fn tt_for_timestep(&self) -> f64;

    fn tt_in_phase(&self) -> f64;

    /// Zero the accumulators.  Not a transition.
    fn reset_phase(&mut self);

    /// One line describing the phase's progress.
    fn write_summary(&self, w: &mut dyn io::Write) -> io::Result<()>;
}

// ── ThermalTimePhase ──────────────────────────────────────────────────────────

/// A phase that completes once its accumulated driver reaches the target.
#[derive(Clone, Debug)]
pub struct ThermalTimePhase {
    name:            String,
    start:           String,
    end:             String,
    target:          Target,
    accumulation:    Accumulation,
    tt_for_timestep: f64,
    tt_in_phase:     f64,
    /// Context of the latest step; dynamic targets read it.
    context:         Option<PhaseContext>,
    days_in_phase:   u32,
}

impl ThermalTimePhase {
    pub fn new(name: impl Into<String>, target: impl Into<Target>, accumulation: Accumulation) -> Self {
        Self {
            name: name.into(),
            start: String::new(),
            end: String::new(),
            target: target.into(),
            accumulation,
            tt_for_timestep: 0.0,
            tt_in_phase: 0.0,
            context: None,
            days_in_phase: 0,
        }
    }

    pub fn with_events(mut self, start: impl Into<String>, end: impl Into<String>) -> Self {
        self.start = start.into();
        self.end = end.into();
        self
    }

    pub fn accumulation(&self) -> Accumulation {
        self.accumulation
    }

    fn current_context(&self) -> PhaseContext {
        self.context.unwrap_or(PhaseContext {
            weather:       DailyWeather::new(0, 0.0, 0.0),
            days_in_phase: self.days_in_phase,
        })
    }

    fn checked_target(&self) -> PhenologyResult<f64> {
        let target = self.target();
        if target.is_finite() && target > 0.0 {
            Ok(target)
        } else {
            Err(PhenologyError::TargetUnreachable { phase: self.name.clone(), target })
        }
    }
}

impl Phase for ThermalTimePhase {
    fn name(&self) -> &str {
        &self.name
    }

    fn start(&self) -> &str {
        &self.start
    }

    fn end(&self) -> &str {
        &self.end
    }

    fn do_time_step(&mut self, prop_of_day_to_use: f64, ctx: &PhaseContext) -> PhenologyResult<PhaseStep> {
        let prop = prop_of_day_to_use.clamp(0.0, 1.0);
        self.days_in_phase += 1;
        self.context = Some(PhaseContext { days_in_phase: self.days_in_phase, ..*ctx });

        let target = self.checked_target()?;
        let offered = self.accumulation.daily(&ctx.weather) * prop;

        if self.tt_in_phase + offered < target {
            self.tt_for_timestep = offered;
            self.tt_in_phase += offered;
            return Ok(PhaseStep { completed: false, consumed_fraction: 1.0, leftover: 0.0 });
        }

        let needed = (target - self.tt_in_phase).max(0.0);
        let consumed_fraction = if offered > 0.0 { (needed / offered).min(1.0) } else { 0.0 };
        self.tt_for_timestep = needed;
        self.tt_in_phase += needed;
        tracing::debug!(phase = %self.name, tt_in_phase = self.tt_in_phase, target, "phase target reached");
        Ok(PhaseStep { completed: true, consumed_fraction, leftover: prop * (1.0 - consumed_fraction) })
    }

    fn fraction_complete(&self) -> f64 {
        match self.checked_target() {
            Ok(target) => (self.tt_in_phase / target).min(1.0),
            Err(_) => 0.0,
        }
    }

    fn target(&self) -> f64 {
        self.target.value(&self.current_context())
    }

    fn set_target(&mut self, target: Target) {
        self.target = target;
    }

    fn tt_for_timestep(&self) -> f64 {
        self.tt_for_timestep
    }

    fn tt_in_phase(&self) -> f64 {
        self.tt_in_phase
    }

    fn reset_phase(&mut self) {
        self.tt_for_timestep = 0.0;
        self.tt_in_phase = 0.0;
        self.days_in_phase = 0;
        self.context = None;
    }

    fn write_summary(&self, w: &mut dyn io::Write) -> io::Result<()> {
        writeln!(
            w,
            "      {:<24} {:>8.1} / {:<8.1} {:<4} ({} -> {})",
            self.name,
            self.tt_in_phase,
            self.target(),
            self.accumulation.units(),
            self.start,
            self.end,
        )
    }
}
