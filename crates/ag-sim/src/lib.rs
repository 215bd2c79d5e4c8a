//! `ag-sim`: daily scheduler for a model tree.
//!
//! # Day loop
//!
//! ```text
//! for day in 0..config.total_days:
//!   ① Weather    : read today's min/max temperature.
//!   ② Components : run every registered node in tree pre-order
//!                  RuminantHerd          → start_day (intake reset, ageing)
//!                  Phenology             → advance_day with carry-over
//!                  RuminantActivityFeed  → select and feed the herd
//!                  Manager               → user Component::on_day
//!   ③ Summary    : herd and phenology rows into the day's buffer.
//!   ④ Output     : on output days, hand the buffer to SimObserver::on_rows.
//! after the last day:
//!   reconcile the Axis children of every enabled Graph.
//! ```
//!
//! Registration order is captured once at build time.  Nodes that are
//! disabled, or sit under a disabled ancestor, are never registered.
//!
//! # Output variables
//!
//! Variable names are the node path below the simulation node plus a field,
//! e.g. `Paddock.Cattle.MeanWeight` or `Paddock.Wheat.Phenology.Stage`.
//!
//! | Node                   | Fields                              |
//! |------------------------|-------------------------------------|
//! | `RuminantHerd`         | `Count`, `MeanWeight`, `Intake`     |
//! | `Phenology`            | `Stage`, `FractionComplete`         |
//! | `RuminantActivityFeed` | `Fed`, `Skipped`                    |
//! | `Manager`              | whatever the component reports      |
//!
//! # Cargo features
//!
//! | Feature    | Effect                                                 |
//! |------------|--------------------------------------------------------|
//! | `parallel` | Evaluates feed-group predicates on Rayon's thread pool. |
//!
//! # Quick-start
//!
//! ```rust,ignore
//! use ag_core::SimConfig;
//! use ag_sim::{NoopObserver, SimBuilder};
//!
//! let tree = ag_tree::ModelTree::load(path)?;
//! let mut sim = SimBuilder::new(tree, SimConfig::default())
//!     .component(".Simulations.Base.Paddock.Sale", Box::new(SaleRule))
//!     .build()?;
//! sim.run(&mut NoopObserver)?;
//! ```

pub mod builder;
pub mod component;
pub mod error;
pub mod observer;
pub mod report;
pub mod sim;
pub mod weather;


pub use builder::SimBuilder;
pub use component::{Component, HerdState, PhenologyState, StepContext};
pub use error::{ComponentError, SimError, SimResult};
pub use observer::{NoopObserver, SimObserver};
pub use report::{DayReport, OutputRow};
pub use sim::Sim;
pub use weather::{ConstantWeather, TableWeather, WeatherSource, load_weather_csv, load_weather_reader};
