//! SQLite output backend (feature `sqlite`).
//!
//! Creates `output.db` in the configured output directory with one table,
//! `report`, keyed by `(simulation, day, variable)`.  A repeated key
//! replaces the earlier value.

use std::path::Path;

use rusqlite::Connection;

use ag_graph::StorageReader;

use crate::writer::OutputWriter;
use crate::{OutputError, OutputResult, OutputRow};

/// File name created by [`SqliteWriter::new`].
pub const DB_FILE: &str = "output.db";

/// Writes simulation output to an SQLite database and reads it back for
/// graphing.
pub struct SqliteWriter {
    conn:     Connection,
    finished: bool,
}

impl SqliteWriter {
    /// Open (or create) `output.db` in `dir` and initialise the schema.
    pub fn new(dir: &Path) -> OutputResult<Self> {
        let path = dir.join(DB_FILE);
        let conn = Connection::open(&path).map_err(|e| OutputError::open(&path, e))?;

        conn.execute_batch(
            "PRAGMA journal_mode = WAL;
             PRAGMA synchronous  = NORMAL;
             CREATE TABLE IF NOT EXISTS report (
                 simulation TEXT    NOT NULL,
                 day        INTEGER NOT NULL,
                 variable   TEXT    NOT NULL,
                 value      REAL    NOT NULL,
                 PRIMARY KEY (simulation, day, variable)
             );",
        )
        .map_err(|e| OutputError::open(&path, e))?;

        Ok(Self { conn, finished: false })
    }

    fn insert(&self, rows: &[OutputRow]) -> rusqlite::Result<()> {
        let tx = self.conn.unchecked_transaction()?;
        {
            let mut stmt = tx.prepare_cached(
                "INSERT OR REPLACE INTO report (simulation, day, variable, value) \
                 VALUES (?1, ?2, ?3, ?4)",
            )?;
            for row in rows {
                stmt.execute(rusqlite::params![row.simulation, row.day as i64, row.variable, row.value])?;
            }
        }
        tx.commit()
    }

    fn query_simulations(&self) -> rusqlite::Result<Vec<String>> {
        let mut stmt = self.conn.prepare_cached("SELECT simulation FROM report GROUP BY simulation ORDER BY MIN(rowid)")?;
        let names = stmt.query_map([], |row| row.get(0))?;
        names.collect()
    }

    fn query_variable(&self, simulation: &str, variable: &str) -> rusqlite::Result<Vec<(u64, f64)>> {
        let mut stmt = self.conn.prepare_cached(
            "SELECT day, value FROM report WHERE simulation = ?1 AND variable = ?2 ORDER BY day",
        )?;
        let rows = stmt.query_map(rusqlite::params![simulation, variable], |row| {
            Ok((row.get::<_, i64>(0)? as u64, row.get(1)?))
        })?;
        rows.collect()
    }
}

impl OutputWriter for SqliteWriter {
    fn write_rows(&mut self, rows: &[OutputRow]) -> OutputResult<()> {
        if self.finished {
            return Err(OutputError::after_finish(rows));
        }
        if rows.is_empty() {
            return Ok(());
        }
        self.insert(rows).map_err(|e| OutputError::write(rows, e))
    }

    fn finish(&mut self) -> OutputResult<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;
        self.conn.execute_batch("PRAGMA wal_checkpoint(TRUNCATE);").map_err(OutputError::finish)
    }
}

impl StorageReader for SqliteWriter {
    fn simulation_names(&self) -> Vec<String> {
        self.query_simulations().unwrap_or_else(|e| {
            tracing::warn!(error = %e, "reading simulation names failed");
            Vec::new()
        })
    }

    fn read_variable(&self, simulation: &str, variable: &str) -> Vec<(u64, f64)> {
        self.query_variable(simulation, variable).unwrap_or_else(|e| {
            tracing::warn!(simulation, variable, error = %e, "reading variable failed");
            Vec::new()
        })
    }
}
