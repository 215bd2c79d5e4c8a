//! Fluent builder for constructing a [`Sim`] from a model tree.

use ag_core::{ModelId, SimConfig, SimRng};
use ag_herd::{FeedActivity, Herd};
use ag_phenology::{Phenology, Target};
use ag_tree::{ModelTree, ModelType};

use crate::component::{Binding, HerdState, PhenologyState, Registration};
use crate::{Component, ConstantWeather, DayReport, Sim, SimError, SimResult, WeatherSource};

/// Fluent builder for [`Sim`].
///
/// # Required inputs
///
/// - [`ModelTree`]: the composition tree.  The sim owns it for the run.
/// - [`SimConfig`]: seed, default run length and output interval.
///
/// # Optional inputs (have defaults)
///
/// | Method                      | Default                                          |
/// |-----------------------------|--------------------------------------------------|
/// | `.simulation(path)`         | First enabled `Simulation` node in pre-order     |
/// | `.weather(source)`          | The simulation's `Weather` node, else 10/25 °C   |
/// | `.component(path, c)`       | `Manager` nodes without a component are skipped  |
/// | `.phase_target(p, name, t)` | Targets from the `Phase` nodes                   |
///
/// A `Clock` node under the simulation overrides `start_day_of_year` and
/// `total_days`; the simulation node's name becomes `simulation_name`.
///
/// # Example
///
/// ```rust
/// use ag_core::SimConfig;
/// use ag_sim::{NoopObserver, SimBuilder};
/// use ag_tree::{ModelNode, ModelTree, ModelType};
///
/// let mut tree = ModelTree::new(ModelNode::new(ModelType::Simulations, "Simulations"));
/// tree.add_child(tree.root(), ModelNode::new(ModelType::Simulation, "Base")).unwrap();
///
/// let config = SimConfig { total_days: 10, ..SimConfig::default() };
/// let mut sim = SimBuilder::new(tree, config).build().unwrap();
/// sim.run(&mut NoopObserver).unwrap();
/// assert_eq!(sim.clock.current_tick.0, 10);
/// ```
pub struct SimBuilder {
    tree:       ModelTree,
    config:     SimConfig,
    simulation: Option<String>,
    weather:    Option<Box<dyn WeatherSource>>,
    components: Vec<(String, Box<dyn Component>)>,
    targets:    Vec<(String, String, Target)>,
}

impl SimBuilder {
    pub fn new(tree: ModelTree, config: SimConfig) -> Self {
        Self { tree, config, simulation: None, weather: None, components: Vec::new(), targets: Vec::new() }
    }

    /// Run the `Simulation` node at `path` instead of the first one.
    pub fn simulation(mut self, path: impl Into<String>) -> Self {
        self.simulation = Some(path.into());
        self
    }

    pub fn weather(mut self, source: Box<dyn WeatherSource>) -> Self {
        self.weather = Some(source);
        self
    }

    /// Bind `component` to the `Manager` node at `path`.
    pub fn component(mut self, path: impl Into<String>, component: Box<dyn Component>) -> Self {
        self.components.push((path.into(), component));
        self
    }

    /// Replace the target of phase `phase` in the `Phenology` node at `path`,
    /// e.g. with a [`Target::Dynamic`] function.
    pub fn phase_target(mut self, path: impl Into<String>, phase: impl Into<String>, target: Target) -> Self {
        self.targets.push((path.into(), phase.into(), target));
        self
    }

    /// Validate inputs, bind every enabled node under the simulation in
    /// pre-order, and return a ready-to-run [`Sim`].
    pub fn build(mut self) -> SimResult<Sim> {
        let tree = self.tree;
        let simulation = resolve_simulation(&tree, self.simulation.as_deref())?;
        let sim_path = tree.path(simulation);

        // ── Configuration ─────────────────────────────────────────────────
        let mut config = self.config;
        config.simulation_name = tree.node(simulation)?.name().to_string();
        if let Some((_, clock)) = tree
            .children_of_type(simulation, ModelType::Clock)
            .find(|(_, n)| n.is_enabled())
        {
            if let Some(start) = clock.integer("start_day_of_year") {
                config.start_day_of_year = u32::try_from(start)
                    .map_err(|_| SimError::Config(format!("start_day_of_year {start} out of range")))?;
            }
            if let Some(days) = clock.integer("total_days") {
                config.total_days = u64::try_from(days)
                    .map_err(|_| SimError::Config(format!("total_days {days} out of range")))?;
            }
        }
        config.validate()?;

        // ── Registration order ────────────────────────────────────────────
        let order: Vec<(ModelId, ModelType)> = tree
            .find_all_children(simulation)
            .filter(|&(id, _)| tree.is_effectively_enabled(id))
            .map(|(id, n)| (id, n.model_type()))
            .collect();
        let prefix = |id: ModelId| {
            let path = tree.path(id);
            path.strip_prefix(&format!("{sim_path}.")).unwrap_or(&path).to_string()
        };

        // Herds first so feed activities can resolve them wherever they sit.
        let mut rng = SimRng::new(config.seed);
        let mut herds = Vec::new();
        for &(id, model_type) in &order {
            if model_type == ModelType::RuminantHerd {
                let herd = Herd::from_tree(&tree, id, &mut rng)?;
                herds.push(HerdState { id, path: tree.path(id), prefix: prefix(id), herd });
            }
        }

        let mut phenologies: Vec<PhenologyState> = Vec::new();
        let mut registrations = Vec::new();
        for &(id, model_type) in &order {
            let path = tree.path(id);
            let binding = match model_type {
                ModelType::RuminantHerd => {
                    match herds.iter().position(|h| h.id == id) {
                        Some(herd) => Binding::HerdDayStart { herd },
                        None => continue,
                    }
                }
                ModelType::Phenology => {
                    let mut phenology = Phenology::from_tree(&tree, id)
                        .map_err(|source| SimError::Phenology { path: path.clone(), source })?;
                    for (_, phase, target) in self.targets.iter().filter(|(p, _, _)| *p == path) {
                        phenology
                            .set_target(phase, target.clone())
                            .map_err(|source| SimError::Phenology { path: path.clone(), source })?;
                    }
                    phenologies.push(PhenologyState { id, path: path.clone(), prefix: prefix(id), phenology });
                    Binding::Phenology { phenology: phenologies.len() - 1 }
                }
                ModelType::RuminantActivityFeed => {
                    let activity = FeedActivity::from_tree(&tree, id)?;
                    let herd = herd_in_scope(&tree, id, simulation, &herds)
                        .ok_or_else(|| SimError::Config(format!("feed activity `{path}` has no herd in scope")))?;
                    Binding::Feed { activity, herd }
                }
                ModelType::Manager => match self.components.iter().position(|(p, _)| *p == path) {
                    Some(i) => Binding::User(self.components.remove(i).1),
                    None => {
                        tracing::warn!(%path, "manager has no bound component; skipped");
                        continue;
                    }
                },
                _ => continue,
            };
            tracing::debug!(%path, kind = binding.kind(), "registered");
            registrations.push(Registration { id, path: path.clone(), prefix: prefix(id), binding });
        }

        if let Some((path, _)) = self.components.first() {
            return Err(SimError::Config(format!("no enabled Manager node at `{path}` for the supplied component")));
        }
        if let Some((path, phase, _)) = self.targets.iter().find(|(p, _, _)| !phenologies.iter().any(|s| s.path == *p)) {
            return Err(SimError::Config(format!("no enabled Phenology at `{path}` for phase `{phase}`")));
        }

        // ── Weather ───────────────────────────────────────────────────────
        let weather = match self.weather {
            Some(source) => source,
            None => {
                let node = tree
                    .children_of_type(simulation, ModelType::Weather)
                    .find(|(_, n)| n.is_enabled())
                    .map(|(_, n)| n);
                let constant = match node {
                    Some(n) => ConstantWeather::new(
                        n.number("min_temp").unwrap_or(ConstantWeather::default().min_temp),
                        n.number("max_temp").unwrap_or(ConstantWeather::default().max_temp),
                    ),
                    None => ConstantWeather::default(),
                };
                Box::new(constant) as Box<dyn WeatherSource>
            }
        };

        tracing::info!(
            simulation = %config.simulation_name,
            components = registrations.len(),
            herds = herds.len(),
            phenologies = phenologies.len(),
            days = config.total_days,
            "simulation built"
        );

        Ok(Sim {
            clock: config.make_clock(),
            report: DayReport::new(config.simulation_name.clone()),
            config,
            tree,
            simulation,
            herds,
            phenologies,
            registrations,
            weather,
        })
    }
}

fn resolve_simulation(tree: &ModelTree, path: Option<&str>) -> SimResult<ModelId> {
    match path {
        Some(path) => {
            let id = tree
                .find_by_path(path)
                .ok_or_else(|| SimError::Config(format!("no node at `{path}`")))?;
            if tree.node(id)?.model_type() != ModelType::Simulation {
                return Err(SimError::Config(format!("`{path}` is not a Simulation")));
            }
            if !tree.is_effectively_enabled(id) {
                return Err(SimError::Config(format!("simulation `{path}` is disabled")));
            }
            Ok(id)
        }
        None => tree
            .iter()
            .find(|&(id, n)| n.model_type() == ModelType::Simulation && tree.is_effectively_enabled(id))
            .map(|(id, _)| id)
            .ok_or_else(|| SimError::Config("the tree has no enabled Simulation".into())),
    }
}

/// The herd a feed activity feeds: walking up from the activity, the first
/// herd (in pre-order) under the nearest ancestor that contains one.
fn herd_in_scope(tree: &ModelTree, activity: ModelId, simulation: ModelId, herds: &[HerdState]) -> Option<usize> {
    let mut scope = tree.get(activity)?.parent();
    while let Some(ancestor) = scope {
        let base = format!("{}.", tree.path(ancestor));
        if let Some(i) = herds.iter().position(|h| h.path.starts_with(&base)) {
            return Some(i);
        }
        if ancestor == simulation {
            break;
        }
        scope = tree.get(ancestor)?.parent();
    }
    None
}
