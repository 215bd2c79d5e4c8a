//! In-memory row store.

use std::collections::BTreeMap;

use ag_graph::StorageReader;

use crate::writer::OutputWriter;
use crate::{OutputResult, OutputRow};

/// Keeps every row in memory.  Doubles as the read side for
/// `ag_graph::definitions_to_graph`.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    rows: Vec<OutputRow>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every row written, duplicates included, in arrival order.
    pub fn rows(&self) -> &[OutputRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Distinct variable names of one simulation, sorted.
    pub fn variables(&self, simulation: &str) -> Vec<String> {
        let mut names: Vec<String> = self
            .rows
            .iter()
            .filter(|r| r.simulation == simulation)
            .map(|r| r.variable.clone())
            .collect();
        names.sort();
        names.dedup();
        names
    }
}

impl OutputWriter for MemoryStore {
    fn write_rows(&mut self, rows: &[OutputRow]) -> OutputResult<()> {
        self.rows.extend_from_slice(rows);
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        Ok(())
    }
}

impl StorageReader for MemoryStore {
    fn simulation_names(&self) -> Vec<String> {
        let mut names: Vec<String> = Vec::new();
        for row in &self.rows {
            if !names.contains(&row.simulation) {
                names.push(row.simulation.clone());
            }
        }
        names
    }

    fn read_variable(&self, simulation: &str, variable: &str) -> Vec<(u64, f64)> {
        let by_day: BTreeMap<u64, f64> = self
            .rows
            .iter()
            .filter(|r| r.simulation == simulation && r.variable == variable)
            .map(|r| (r.day, r.value))
            .collect();
        by_day.into_iter().collect()
    }
}
