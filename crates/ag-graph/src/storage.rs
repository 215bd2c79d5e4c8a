//! Read access to stored daily output.

/// A source of `(simulation, day, variable, value)` rows.
///
/// Stores are written with at-least-once delivery, so a reader may hold the
/// same `(simulation, day, variable)` more than once; consumers keep the
/// last value per day.
pub trait StorageReader {
    /// Every simulation that has stored rows, in first-seen order.
    fn simulation_names(&self) -> Vec<String>;

    /// `(day, value)` rows for one variable of one simulation, in day order.
    /// Unknown names yield an empty vector.
    fn read_variable(&self, simulation: &str, variable: &str) -> Vec<(u64, f64)>;
}
