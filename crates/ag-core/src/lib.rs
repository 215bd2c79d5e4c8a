//! `ag-core`: foundational types for the agsim model-tree engine.
//!
//! This crate is a dependency of every other `ag-*` crate.  It has no `ag-*`
//! dependencies and minimal external ones (only `rand` and `thiserror`, plus
//! optional `serde`/`toml`).
//!
//! # What lives here
//!
//! | Module    | Contents                                          |
//! |-----------|---------------------------------------------------|
//! | [`ids`]   | `ModelId`, `IndividualId`                         |
//! | [`time`]  | `Tick` (one simulated day), `SimClock`, `SimConfig` |
//! | [`rng`]   | `SimRng` (seeded, run-level)                      |
//! | [`error`] | `AgError`, `AgResult`                             |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                   |
//! |---------|----------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to all public types and   |
//! |         | enables [`SimConfig::from_toml_str`] / [`SimConfig::load`]. |

pub mod error;
pub mod ids;
pub mod rng;
pub mod time;

#[cfg(test)]
mod tests;

// ── Re-exports ────────────────────────────────────────────────────────────────

pub use error::{AgError, AgResult};
pub use ids::{IndividualId, ModelId};
pub use rng::SimRng;
pub use time::{SimClock, SimConfig, Tick};
