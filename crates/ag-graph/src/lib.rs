//! `ag-graph`: axis/series reconciliation and plot data derivation.
//!
//! # Crate layout
//!
//! | Module       | Contents                                                          |
//! |--------------|-------------------------------------------------------------------|
//! | [`axis`]     | `AxisType`, `Axis`                                                |
//! | [`series`]   | `Series`, `SeriesDefinition`                                      |
//! | [`graph`]    | `Graph`, `reconcile_axes`, `sync_axes`, `definitions_to_graph`    |
//! | [`storage`]  | `StorageReader` trait                                             |
//! | [`error`]    | `GraphError`, `GraphResult<T>`                                    |

pub mod axis;
pub mod error;
pub mod graph;
pub mod series;
pub mod storage;

#[cfg(test)]
mod tests;

pub use axis::{Axis, AxisType};
pub use error::{GraphError, GraphResult};
pub use graph::{definitions_to_graph, reconcile_axes, referenced_axes, sync_axes, Graph};
pub use series::{Series, SeriesDefinition, X_FIELD_DAY};
pub use storage::StorageReader;
