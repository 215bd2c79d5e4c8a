//! `ag-phenology`: phase state machine for crop development.
//!
//! # Crate layout
//!
//! | Module            | Contents                                                   |
//! |-------------------|------------------------------------------------------------|
//! | [`accumulation`]  | `DailyWeather`, `Accumulation` (thermal time, days)        |
//! | [`phase`]         | `Phase` trait, `ThermalTimePhase`, `Target`, `PhaseStep`   |
//! | [`phenology`]     | `Phenology`, `FinalPhasePolicy`, `PhaseTransition`         |
//! | [`error`]         | `PhenologyError`, `PhenologyResult<T>`                     |
//!
//! # Daily step (summary)
//!
//! ```text
//! prop = 1.0
//! loop:
//!     step = current.do_time_step(prop)
//!     if !step.completed: break
//!     advance pointer (Loop → phase 0, Terminate → finished)
//!     prop = step.leftover
//! ```

pub mod accumulation;
pub mod error;
pub mod phase;
pub mod phenology;

#[cfg(test)]
mod tests;

pub use accumulation::{Accumulation, DailyWeather};
pub use error::{PhenologyError, PhenologyResult};
pub use phase::{Phase, PhaseContext, PhaseStep, Target, ThermalTimePhase};
pub use phenology::{FinalPhasePolicy, PhaseTransition, Phenology};
