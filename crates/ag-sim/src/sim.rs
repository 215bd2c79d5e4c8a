//! The `Sim` struct and its day loop.

use ag_core::{ModelId, SimClock, SimConfig, Tick};
use ag_graph::sync_axes;
use ag_herd::{Herd, Selection, SelectionContext};
use ag_phenology::{PhaseContext, Phenology};
use ag_tree::{ModelTree, ModelType};

use crate::component::{Binding, HerdState, PhenologyState, Registration, StepContext};
use crate::{DayReport, SimError, SimObserver, SimResult, WeatherSource};

/// The simulation runner.
///
/// `Sim` owns the model tree and everything bound from it.  Each day:
///
/// 1. **Weather**: today's [`DailyWeather`](ag_phenology::DailyWeather) is
///    read from the [`WeatherSource`].
/// 2. **Components**: every registered node runs once, in the tree
///    pre-order captured by [`SimBuilder::build`](crate::SimBuilder::build):
///    - `RuminantHerd`         → start the herd's day (intake reset, ageing).
///    - `Phenology`            → advance phases, with carry-over.
///    - `RuminantActivityFeed` → evaluate feed groups and feed the herd.
///    - `Manager`              → the user [`Component`](crate::Component).
/// 3. **Summary**: herd and phenology state rows are appended.
/// 4. **Output**: on output days the buffered rows go to
///    [`SimObserver::on_rows`].
///
/// A failing callback aborts the run; the error names the node's path.
/// After the last day every enabled `Graph` has its axis nodes reconciled.
pub struct Sim {
    pub config: SimConfig,
    pub clock:  SimClock,

    pub(crate) tree:          ModelTree,
    pub(crate) simulation:    ModelId,
    pub(crate) herds:         Vec<HerdState>,
    pub(crate) phenologies:   Vec<PhenologyState>,
    pub(crate) registrations: Vec<Registration>,
    pub(crate) weather:       Box<dyn WeatherSource>,
    pub(crate) report:        DayReport,
}

impl Sim {
    // ── Main loop ─────────────────────────────────────────────────────────

    /// Run until `config.end_tick()`, then reconcile graph axes.
    pub fn run<O: SimObserver>(&mut self, observer: &mut O) -> SimResult<()> {
        tracing::info!(simulation = %self.config.simulation_name, days = self.config.total_days, "run started");
        while self.clock.current_tick < self.config.end_tick() {
            self.run_day(observer)?;
        }
        self.finish(observer)?;
        tracing::info!(simulation = %self.config.simulation_name, tick = %self.clock.current_tick, "run finished");
        Ok(())
    }

    /// Run exactly `n` days from the current position (ignores `end_tick`
    /// and does not reconcile graphs).
    ///
    /// Useful for tests and incremental stepping.
    pub fn run_days<O: SimObserver>(&mut self, n: u64, observer: &mut O) -> SimResult<()> {
        for _ in 0..n {
            self.run_day(observer)?;
        }
        Ok(())
    }

    fn run_day<O: SimObserver>(&mut self, observer: &mut O) -> SimResult<()> {
        let now = self.clock.current_tick;
        observer.on_day_start(now);

        let interval = self.config.output_interval_days;
        self.report.begin(now, interval > 0 && now.0.is_multiple_of(interval));

        self.process_day(now, observer)?;

        if self.report.is_emitting() {
            observer.on_rows(self.report.rows());
        }
        observer.on_day_end(now);
        self.clock.advance();
        Ok(())
    }

    fn finish<O: SimObserver>(&mut self, observer: &mut O) -> SimResult<()> {
        let graphs: Vec<ModelId> = self
            .tree
            .iter()
            .filter(|(id, n)| n.model_type() == ModelType::Graph && self.tree.is_effectively_enabled(*id))
            .map(|(id, _)| id)
            .collect();
        for graph in graphs {
            if sync_axes(&mut self.tree, graph)? {
                observer.on_axes_changed(&self.tree.path(graph));
            }
        }
        observer.on_sim_end(self.clock.current_tick);
        Ok(())
    }

    // ── Core day processing ───────────────────────────────────────────────

    fn process_day<O: SimObserver>(&mut self, now: Tick, observer: &mut O) -> SimResult<()> {
        let day_of_year = self.clock.day_of_year();
        let weather = self.weather.weather(now, day_of_year)?;

        // Split borrows: registrations mutate herds and the report while the
        // registration list itself is iterated.
        let Self { registrations, herds, phenologies, report, .. } = self;

        for reg in registrations.iter_mut() {
            match &mut reg.binding {
                Binding::HerdDayStart { herd } => herds[*herd].herd.start_day(),

                Binding::Phenology { phenology } => {
                    let state = &mut phenologies[*phenology];
                    let transitions = state
                        .phenology
                        .advance_day(&PhaseContext::new(weather))
                        .map_err(|source| SimError::Phenology { path: reg.path.clone(), source })?;
                    for transition in &transitions {
                        observer.on_phase_change(now, &reg.path, transition);
                    }
                }

                Binding::Feed { activity, herd } => {
                    let outcome = activity.apply(&mut herds[*herd].herd);
                    if outcome.skipped > 0 {
                        tracing::warn!(
                            path = %reg.path,
                            skipped = outcome.skipped,
                            "individuals skipped by filter evaluation"
                        );
                    }
                    report.push(format!("{}.Fed", reg.prefix), outcome.fed);
                    report.push(format!("{}.Skipped", reg.prefix), outcome.skipped as f64);
                }

                Binding::User(component) => {
                    let mut ctx = StepContext::new(
                        now,
                        day_of_year,
                        weather,
                        &reg.path,
                        &reg.prefix,
                        herds,
                        phenologies,
                        report,
                    );
                    component.on_day(&mut ctx).map_err(|source| SimError::Component {
                        path: reg.path.clone(),
                        tick: now,
                        source,
                    })?;
                }
            }
        }

        for state in herds.iter() {
            let herd = &state.herd;
            let count = herd.len() as f64;
            let mean_weight = if herd.is_empty() { 0.0 } else { herd.total_weight() / count };
            report.push(format!("{}.Count", state.prefix), count);
            report.push(format!("{}.MeanWeight", state.prefix), mean_weight);
            report.push(format!("{}.Intake", state.prefix), herd.total_intake());
        }
        for state in phenologies.iter() {
            report.push(format!("{}.Stage", state.prefix), state.phenology.stage());
            report.push(format!("{}.FractionComplete", state.prefix), state.phenology.fraction_complete());
        }
        Ok(())
    }

    // ── Accessors ─────────────────────────────────────────────────────────

    pub fn tree(&self) -> &ModelTree {
        &self.tree
    }

    /// Give the tree back, e.g. to save it or edit it between runs.
    pub fn into_tree(self) -> ModelTree {
        self.tree
    }

    /// The `Simulation` node being run.
    pub fn simulation(&self) -> ModelId {
        self.simulation
    }

    pub fn current_tick(&self) -> Tick {
        self.clock.current_tick
    }

    pub fn herds(&self) -> &[HerdState] {
        &self.herds
    }

    pub fn herd(&self, path: &str) -> Option<&Herd> {
        self.herds.iter().find(|h| h.path == path).map(|h| &h.herd)
    }

    pub fn phenologies(&self) -> &[PhenologyState] {
        &self.phenologies
    }

    pub fn phenology(&self, path: &str) -> Option<&Phenology> {
        self.phenologies.iter().find(|p| p.path == path).map(|p| &p.phenology)
    }

    /// Node paths in the order their callbacks run each day.
    pub fn registration_order(&self) -> impl Iterator<Item = &str> + '_ {
        self.registrations.iter().map(|r| r.path.as_str())
    }

    /// Evaluate one feed group of the activity at `activity_path` against
    /// its herd's current state, without feeding.
    pub fn selection(&self, activity_path: &str, group: &str) -> Option<Selection> {
        self.registrations.iter().find_map(|reg| match &reg.binding {
            Binding::Feed { activity, herd } if reg.path == activity_path => {
                let ctx = SelectionContext { style: activity.style, feed_available: activity.feed_available };
                let group = activity.groups.iter().find(|g| g.name == group)?;
                Some(group.evaluate(&self.herds[*herd].herd.individuals, ctx))
            }
            _ => None,
        })
    }
}
