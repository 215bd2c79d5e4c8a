//! CSV output backend.
//!
//! Creates `output.csv` in the configured output directory with one row per
//! stored value: `simulation,day,variable,value`.

use std::fs::File;
use std::path::Path;

use csv::Writer;

use crate::writer::OutputWriter;
use crate::{OutputError, OutputResult, OutputRow};

/// File name created by [`CsvWriter::new`].
pub const CSV_FILE: &str = "output.csv";

/// Writes simulation output to a single long-format CSV file.
pub struct CsvWriter {
    rows:     Writer<File>,
    finished: bool,
}

impl CsvWriter {
    /// Create `output.csv` in `dir` and write the header row.
    pub fn new(dir: &Path) -> OutputResult<Self> {
        let path = dir.join(CSV_FILE);
        let mut rows = Writer::from_path(&path).map_err(|e| OutputError::open(&path, e))?;
        rows.write_record(["simulation", "day", "variable", "value"])
            .map_err(|e| OutputError::open(&path, e))?;
        Ok(Self { rows, finished: false })
    }
}

impl OutputWriter for CsvWriter {
    fn write_rows(&mut self, rows: &[OutputRow]) -> OutputResult<()> {
        if self.finished {
            return Err(OutputError::after_finish(rows));
        }
        for row in rows {
            self.rows
                .write_record(&[
                    row.simulation.clone(),
                    row.day.to_string(),
                    row.variable.clone(),
                    row.value.to_string(),
                ])
                .map_err(|e| OutputError::write(rows, e))?;
        }
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;
        self.rows.flush().map_err(OutputError::finish)
    }
}
