//! Simulation time model.
//!
//! # Design
//!
//! Time is a monotonically increasing `Tick` counter where one tick is one
//! simulated day.  Day-of-year bookkeeping lives in `SimClock`:
//!
//!   day_of_year = ((start_day_of_year - 1 + tick) mod 365) + 1
//!
//! Leap years are ignored; weather sources that care index by `Tick`.

use std::fmt;

use crate::{AgError, AgResult};

/// Days in the clock's (non-leap) year.
pub const DAYS_PER_YEAR: u32 = 365;

// ── Tick ─────────────────────────────────────────────────────────────────────

/// An absolute simulation day counter.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Tick(pub u64);

impl Tick {
    pub const ZERO: Tick = Tick(0);
}

impl fmt::Display for Tick {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "D{}", self.0)
    }
}

// ── SimClock ──────────────────────────────────────────────────────────────────

/// Tracks the current simulated day and maps it to a day of year.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SimClock {
    /// Day of year (1-based) of tick 0.
    pub start_day_of_year: u32,
    /// The current tick, advanced by `SimClock::advance()` each day.
    pub current_tick: Tick,
}

impl SimClock {
    pub fn new(start_day_of_year: u32) -> Self {
        Self { start_day_of_year, current_tick: Tick::ZERO }
    }

    /// Advance the clock by one day.
    #[inline]
    pub fn advance(&mut self) {
        self.current_tick = Tick(self.current_tick.0 + 1);
    }

    /// Day of year (1..=365) of the current tick.
    pub fn day_of_year(&self) -> u32 {
        let zero_based = (self.start_day_of_year.saturating_sub(1) as u64 + self.current_tick.0)
            % DAYS_PER_YEAR as u64;
        zero_based as u32 + 1
    }

    /// Whole simulated years elapsed since tick 0.
    pub fn elapsed_years(&self) -> u64 {
        (self.start_day_of_year.saturating_sub(1) as u64 + self.current_tick.0) / DAYS_PER_YEAR as u64
    }
}

impl fmt::Display for SimClock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} (year {} day {:03})",
            self.current_tick,
            self.elapsed_years(),
            self.day_of_year()
        )
    }
}

// ── SimConfig ─────────────────────────────────────────────────────────────────

/// Top-level run configuration.
///
/// Typically loaded from a TOML file by the application crate and passed to
/// the simulation builder:
///
/// ```toml
/// simulation_name      = "Paddock"
/// start_day_of_year    = 121
/// total_days           = 180
/// seed                 = 42
/// output_interval_days = 1
/// ```
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SimConfig {
    /// Name written into every output row; graphs filter on it.
    pub simulation_name: String,

    /// Day of year (1-based) the run starts on.
    pub start_day_of_year: u32,

    /// Total days to simulate.
    pub total_days: u64,

    /// Master RNG seed.  The same seed always produces identical results.
    pub seed: u64,

    /// Emit output rows every N days.  1 = daily.
    pub output_interval_days: u64,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            simulation_name:      "Simulation".to_string(),
            start_day_of_year:    1,
            total_days:           365,
            seed:                 0,
            output_interval_days: 1,
        }
    }
}

impl SimConfig {
    /// The tick at which the simulation ends (exclusive upper bound).
    #[inline]
    pub fn end_tick(&self) -> Tick {
        Tick(self.total_days)
    }

    /// Construct a `SimClock` pre-configured for this run.
    pub fn make_clock(&self) -> SimClock {
        SimClock::new(self.start_day_of_year)
    }

    /// Reject configurations the day loop cannot honour.
    pub fn validate(&self) -> AgResult<()> {
        if self.simulation_name.trim().is_empty() {
            return Err(AgError::Config("simulation_name must not be empty".into()));
        }
        if !(1..=366).contains(&self.start_day_of_year) {
            return Err(AgError::Config(format!(
                "start_day_of_year {} outside 1..=366",
                self.start_day_of_year
            )));
        }
        if self.total_days == 0 {
            return Err(AgError::Config("total_days must be > 0".into()));
        }
        Ok(())
    }

    /// Parse and validate a TOML document.
    #[cfg(feature = "serde")]
    pub fn from_toml_str(s: &str) -> AgResult<Self> {
        let config: SimConfig = toml::from_str(s).map_err(|e| AgError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a TOML file.
    #[cfg(feature = "serde")]
    pub fn load(path: &std::path::Path) -> AgResult<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }
}
