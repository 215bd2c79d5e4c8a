//! Integration tests for ag-output.

use ag_core::SimConfig;
use ag_sim::{Sim, SimBuilder};
use ag_tree::{ModelNode, ModelTree, ModelType};

use crate::OutputRow;

fn row(simulation: &str, day: u64, variable: &str, value: f64) -> OutputRow {
    OutputRow { simulation: simulation.into(), day, variable: variable.into(), value }
}

/// A simulation with one 2-animal herd and one graph plotting its weight.
fn small_sim(total_days: u64, output_interval_days: u64) -> Sim {
    let mut tree = ModelTree::new(ModelNode::new(ModelType::Simulations, "Simulations"));
    let sim = tree.add_child(tree.root(), ModelNode::new(ModelType::Simulation, "Dry")).unwrap();
    let herd = tree.add_child(sim, ModelNode::new(ModelType::RuminantHerd, "Herd")).unwrap();
    let cows = ModelNode::new(ModelType::RuminantCohort, "Cows").with("count", 2i64).unwrap();
    tree.add_child(herd, cows).unwrap();
    let graph = tree.add_child(sim, ModelNode::new(ModelType::Graph, "Weight")).unwrap();
    let series = ModelNode::new(ModelType::Series, "Mean").with("y_field", "Herd.MeanWeight").unwrap();
    tree.add_child(graph, series).unwrap();

    let config = SimConfig { total_days, output_interval_days, ..SimConfig::default() };
    SimBuilder::new(tree, config).build().unwrap()
}

// ── Memory store ──────────────────────────────────────────────────────────────

#[cfg(test)]
mod memory_tests {
    use super::*;
    use crate::{MemoryStore, OutputWriter};
    use ag_graph::StorageReader;

    #[test]
    fn duplicates_keep_last_value() {
        let mut store = MemoryStore::new();
        store.write_rows(&[row("A", 0, "X", 1.0), row("A", 1, "X", 2.0)]).unwrap();
        store.write_rows(&[row("A", 1, "X", 5.0)]).unwrap();
        assert_eq!(store.len(), 3);
        assert_eq!(store.read_variable("A", "X"), [(0, 1.0), (1, 5.0)]);
    }

    #[test]
    fn simulation_names_in_first_seen_order() {
        let mut store = MemoryStore::new();
        store.write_rows(&[row("Wet", 0, "X", 1.0), row("Dry", 0, "X", 1.0), row("Wet", 1, "X", 1.0)]).unwrap();
        assert_eq!(store.simulation_names(), ["Wet", "Dry"]);
        assert!(store.read_variable("Wet", "Missing").is_empty());
    }

    #[test]
    fn variables_sorted_and_distinct() {
        let mut store = MemoryStore::new();
        store.write_rows(&[row("A", 0, "b", 1.0), row("A", 0, "a", 1.0), row("A", 1, "b", 1.0)]).unwrap();
        assert_eq!(store.variables("A"), ["a", "b"]);
    }
}

// ── CSV ───────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod csv_tests {
    use tempfile::TempDir;

    use super::*;
    use crate::csv::{CSV_FILE, CsvWriter};
    use crate::{OutputError, OutputWriter};

    fn tmp() -> TempDir {
        tempfile::tempdir().expect("create temp dir")
    }

    #[test]
    fn csv_header_correct() {
        let dir = tmp();
        let mut w = CsvWriter::new(dir.path()).unwrap();
        w.finish().unwrap();

        let mut rdr = csv::Reader::from_path(dir.path().join(CSV_FILE)).unwrap();
        let headers: Vec<_> = rdr.headers().unwrap().iter().map(str::to_owned).collect();
        assert_eq!(headers, ["simulation", "day", "variable", "value"]);
    }

    #[test]
    fn csv_rows_written() {
        let dir = tmp();
        let mut w = CsvWriter::new(dir.path()).unwrap();
        w.write_rows(&[row("A", 3, "Herd.Count", 2.0), row("A", 3, "Herd.Intake", 1.5)]).unwrap();
        w.finish().unwrap();

        let mut rdr = csv::Reader::from_path(dir.path().join(CSV_FILE)).unwrap();
        let rows: Vec<_> = rdr.records().map(|r| r.unwrap()).collect();
        assert_eq!(rows.len(), 2);
        assert_eq!(&rows[0][1], "3");
        assert_eq!(&rows[1][2], "Herd.Intake");
        assert_eq!(&rows[1][3], "1.5");
    }

    #[test]
    fn csv_finish_idempotent() {
        let dir = tmp();
        let mut w = CsvWriter::new(dir.path()).unwrap();
        w.finish().unwrap();
        w.finish().unwrap();
    }

    #[test]
    fn missing_directory_names_the_file() {
        let dir = tmp();
        let missing = dir.path().join("nope");
        match CsvWriter::new(&missing) {
            Err(OutputError::Open { path, .. }) => assert_eq!(path, missing.join(CSV_FILE)),
            Err(other) => panic!("unexpected error {other}"),
            Ok(_) => panic!("writer opened in a missing directory"),
        }
    }

    #[test]
    fn rows_after_finish_are_refused() {
        let dir = tmp();
        let mut w = CsvWriter::new(dir.path()).unwrap();
        w.finish().unwrap();
        let err = w.write_rows(&[row("A", 4, "Herd.Count", 2.0)]).unwrap_err();
        assert!(matches!(err, OutputError::AfterFinish { day: 4, rows: 1 }));
    }
}

// ── Observer ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod observer_tests {
    use super::*;
    use crate::csv::{CSV_FILE, CsvWriter};
    use crate::{MemoryStore, OutputError, OutputResult, OutputWriter, SimOutputObserver};
    use ag_graph::definitions_to_graph;

    struct Broken {
        finished: bool,
    }

    impl OutputWriter for Broken {
        fn write_rows(&mut self, rows: &[OutputRow]) -> OutputResult<()> {
            Err(OutputError::write(rows, std::io::Error::other("disk full")))
        }

        fn finish(&mut self) -> OutputResult<()> {
            self.finished = true;
            Ok(())
        }
    }

    #[test]
    fn memory_run_then_graph() {
        let mut sim = small_sim(6, 1);
        let mut obs = SimOutputObserver::new(MemoryStore::new());
        sim.run(&mut obs).unwrap();
        assert!(obs.take_error().is_none());
        // 3 herd rows per day.
        assert_eq!(obs.rows_written(), 18);

        let store = obs.into_writer();
        let mut tree = sim.into_tree();
        let graph = tree.find_by_path(".Simulations.Dry.Weight").unwrap();
        let defs = definitions_to_graph(&mut tree, graph, &store, None).unwrap();
        assert_eq!(defs.len(), 1);
        assert_eq!(defs[0].simulation, "Dry");
        assert_eq!(defs[0].points.len(), 6);
    }

    #[test]
    fn interval_limits_rows() {
        let dir = tempfile::tempdir().unwrap();
        let mut sim = small_sim(6, 2);
        let mut obs = SimOutputObserver::new(CsvWriter::new(dir.path()).unwrap());
        sim.run(&mut obs).unwrap();
        assert!(obs.take_error().is_none());

        // Days 0, 2 and 4, three rows each.
        let mut rdr = csv::Reader::from_path(dir.path().join(CSV_FILE)).unwrap();
        assert_eq!(rdr.records().count(), 9);
    }

    #[test]
    fn first_error_kept_and_run_completes() {
        let mut sim = small_sim(3, 1);
        let mut obs = SimOutputObserver::new(Broken { finished: false });
        sim.run(&mut obs).unwrap();
        let err = obs.take_error().unwrap();
        assert!(err.to_string().contains("disk full"));
        assert!(matches!(err, OutputError::Write { day: 0, rows: 3, .. }), "{err}");
        assert!(obs.take_error().is_none());
        assert_eq!(obs.rows_written(), 0);
        assert!(obs.into_writer().finished);
    }

    #[test]
    fn boxed_writer_works() {
        let writer: Box<dyn OutputWriter> = Box::new(MemoryStore::new());
        let mut sim = small_sim(2, 1);
        let mut obs = SimOutputObserver::new(writer);
        sim.run(&mut obs).unwrap();
        assert_eq!(obs.rows_written(), 6);
    }
}

// ── SQLite ────────────────────────────────────────────────────────────────────

#[cfg(all(test, feature = "sqlite"))]
mod sqlite_tests {
    use tempfile::TempDir;

    use super::*;
    use crate::sqlite::{DB_FILE, SqliteWriter};
    use crate::OutputWriter;
    use ag_graph::StorageReader;

    fn tmp() -> TempDir {
        tempfile::tempdir().expect("create temp dir")
    }

    #[test]
    fn sqlite_db_created() {
        let dir = tmp();
        let _w = SqliteWriter::new(dir.path()).unwrap();
        assert!(dir.path().join(DB_FILE).exists());
    }

    #[test]
    fn sqlite_replaces_duplicates() {
        let dir = tmp();
        let mut w = SqliteWriter::new(dir.path()).unwrap();
        w.write_rows(&[row("A", 0, "X", 1.0), row("A", 1, "X", 2.0)]).unwrap();
        w.write_rows(&[row("A", 1, "X", 7.0)]).unwrap();
        w.finish().unwrap();

        let conn = rusqlite::Connection::open(dir.path().join(DB_FILE)).unwrap();
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM report", [], |r| r.get(0)).unwrap();
        assert_eq!(count, 2);
        assert_eq!(w.read_variable("A", "X"), [(0, 1.0), (1, 7.0)]);
    }

    #[test]
    fn sqlite_reads_simulation_names() {
        let dir = tmp();
        let mut w = SqliteWriter::new(dir.path()).unwrap();
        w.write_rows(&[row("Wet", 0, "X", 1.0), row("Dry", 0, "X", 1.0)]).unwrap();
        assert_eq!(w.simulation_names(), ["Wet", "Dry"]);
    }
}
