//! `ag-output`: sinks for the daily rows a run produces.
//!
//! | Feature   | Backend     | Storage                                  |
//! |-----------|-------------|------------------------------------------|
//! | *(none)*  | Memory      | [`MemoryStore`], also a `StorageReader`  |
//! | *(none)*  | CSV         | `output.csv`                             |
//! | `sqlite`  | SQLite      | `output.db`, also a `StorageReader`      |
//!
//! Every backend implements [`OutputWriter`] and is driven by
//! [`SimOutputObserver`], which implements `ag_sim::SimObserver`.
//!
//! Delivery is at-least-once.  Writing the same `(simulation, day,
//! variable)` twice is harmless: readers keep the last value.
//!
//! # Usage
//!
//! ```rust,ignore
//! use ag_output::{CsvWriter, SimOutputObserver};
//!
//! let writer = CsvWriter::new(Path::new("./output"))?;
//! let mut obs = SimOutputObserver::new(writer);
//! sim.run(&mut obs)?;
//! if let Some(e) = obs.take_error() {
//!     eprintln!("output error: {e}");
//! }
//! ```

pub mod csv;
pub mod error;
pub mod memory;
pub mod observer;
pub mod writer;

#[cfg(feature = "sqlite")]
pub mod sqlite;

#[cfg(test)]
mod tests;

pub use ag_sim::OutputRow;

pub use csv::CsvWriter;
pub use error::{OutputError, OutputResult, StoreError};
pub use memory::MemoryStore;
pub use observer::SimOutputObserver;
pub use writer::OutputWriter;

#[cfg(feature = "sqlite")]
pub use sqlite::SqliteWriter;
