//! paddock: a crop and a herd on one field, run for a season.
//!
//! ```text
//! paddock [TREE.json] [CONFIG.toml] [OUTPUT_DIR]
//! ```
//!
//! Without arguments the built-in tree from `tree.rs` is used.  Set
//! `RUST_LOG=debug` for per-day detail.

mod tree;

use std::path::Path;
use std::time::Instant;

use anyhow::{Context, Result, bail};
use tracing_subscriber::{EnvFilter, fmt};

use ag_core::{SimConfig, Tick};
use ag_graph::{StorageReader, definitions_to_graph};
use ag_output::{CsvWriter, MemoryStore, OutputRow, OutputWriter, SimOutputObserver};
use ag_phenology::PhaseTransition;
use ag_sim::{Component, ComponentError, SimBuilder, SimObserver, StepContext};
use ag_tree::ModelTree;

use tree::{GRAPH, GROWTH_MANAGER, build_tree};

// ── Constants ─────────────────────────────────────────────────────────────────

const SEED: u64 = 7;
/// Liveweight gained per kg of intake above maintenance.
const GAIN_PER_KG: f64 = 0.12;
/// Intake needed to hold weight, as a fraction of potential intake.
const MAINTENANCE: f64 = 0.55;

// ── Application component ─────────────────────────────────────────────────────

/// Converts the day's intake into liveweight change.
struct LiveweightGain;

impl Component for LiveweightGain {
    fn on_day(&mut self, ctx: &mut StepContext<'_>) -> Result<(), ComponentError> {
        let mut total = 0.0;
        for state in ctx.herds.iter_mut() {
            for animal in &mut state.herd.individuals {
                let surplus = animal.intake - MAINTENANCE * animal.potential_intake;
                let gain = GAIN_PER_KG * surplus;
                animal.weight = (animal.weight + gain).max(1.0);
                total += gain;
            }
        }
        ctx.report("Gain", total);
        Ok(())
    }
}

// ── Observer ──────────────────────────────────────────────────────────────────

/// Forwards rows to a memory store and a CSV file, and prints phase changes.
struct PaddockObserver {
    memory: SimOutputObserver<MemoryStore>,
    csv:    Option<SimOutputObserver<CsvWriter>>,
}

impl SimObserver for PaddockObserver {
    fn on_phase_change(&mut self, tick: Tick, path: &str, transition: &PhaseTransition) {
        match &transition.to {
            Some(to) => println!("  {tick}  {path}: {} -> {to}", transition.from),
            None => println!("  {tick}  {path}: {} complete", transition.from),
        }
    }

    fn on_rows(&mut self, rows: &[OutputRow]) {
        self.memory.on_rows(rows);
        if let Some(csv) = &mut self.csv {
            csv.on_rows(rows);
        }
    }

    fn on_axes_changed(&mut self, graph_path: &str) {
        println!("  axes reconciled for {graph_path}");
    }

    fn on_sim_end(&mut self, final_tick: Tick) {
        self.memory.on_sim_end(final_tick);
        if let Some(csv) = &mut self.csv {
            csv.on_sim_end(final_tick);
        }
    }
}

// ── main ──────────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt().with_env_filter(filter).with_target(false).init();

    let args: Vec<String> = std::env::args().skip(1).collect();

    // 1. Tree: from JSON or built in.
    let tree = match args.first() {
        Some(path) => ModelTree::load(Path::new(path)).with_context(|| format!("loading tree {path}"))?,
        None => build_tree()?,
    };
    for warning in tree.validate() {
        tracing::warn!(path = %warning.path, property = %warning.property, "{}", warning.message);
    }

    // 2. Config: from TOML or defaults.  A Clock node overrides the dates.
    let config = match args.get(1) {
        Some(path) => SimConfig::load(Path::new(path)).with_context(|| format!("loading config {path}"))?,
        None => SimConfig { seed: SEED, ..SimConfig::default() },
    };

    // 3. Output sinks.
    let csv = match args.get(2) {
        Some(dir) => {
            std::fs::create_dir_all(dir)?;
            Some(SimOutputObserver::new(CsvWriter::new(Path::new(dir))?))
        }
        None => None,
    };
    let mut observer = PaddockObserver { memory: SimOutputObserver::new(MemoryStore::new()), csv };

    // 4. Build and run.
    let has_growth = tree.find_by_path(GROWTH_MANAGER).is_some();
    let mut builder = SimBuilder::new(tree, config);
    if has_growth {
        builder = builder.component(GROWTH_MANAGER, Box::new(LiveweightGain));
    }
    let mut sim = builder.build()?;
    println!("=== paddock: {} ===", sim.config.simulation_name);
    println!("Order: {}", sim.registration_order().collect::<Vec<_>>().join(", "));
    println!();

    let t0 = Instant::now();
    sim.run(&mut observer)?;
    let elapsed = t0.elapsed();
    println!();
    println!("Ran {} days in {:.1} ms", sim.current_tick().0, elapsed.as_secs_f64() * 1000.0);

    for state in sim.herds() {
        let herd = &state.herd;
        if !herd.is_empty() {
            println!("{}: {} head, mean {:.1} kg", state.path, herd.len(), herd.total_weight() / herd.len() as f64);
        }
    }
    for state in sim.phenologies() {
        let mut summary = Vec::new();
        state.phenology.write_summary(&mut summary)?;
        print!("{}", String::from_utf8_lossy(&summary));
    }

    // 5. Output errors.
    if let Some(e) = observer.memory.take_error() {
        bail!("memory store: {e}");
    }
    if let Some(csv) = &mut observer.csv {
        if let Some(e) = csv.take_error() {
            bail!("csv output: {e}");
        }
    }

    // 6. Graph series from the stored rows.
    let mut store = observer.memory.into_writer();
    store.finish()?;
    println!("Stored {} rows for {:?}", store.len(), store.simulation_names());

    let mut tree = sim.into_tree();
    if let Some(graph) = tree.find_by_path(GRAPH) {
        for def in definitions_to_graph(&mut tree, graph, &store, None)? {
            let last = def.points.last().map(|&(_, y)| y).unwrap_or(f64::NAN);
            println!(
                "  series {:<6} {:<30} {} points on {}/{}  last {:.2}",
                def.series,
                def.y_field,
                def.points.len(),
                def.x_axis,
                def.y_axis,
                last
            );
        }
    }
    Ok(())
}
