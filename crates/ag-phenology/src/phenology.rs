//! `Phenology`: the ordered phase sequence and its current-phase pointer.

use std::fmt;
use std::io;
use std::str::FromStr;

use ag_core::ModelId;
use ag_tree::{ModelTree, ModelType};

use crate::{Accumulation, Phase, PhaseContext, PhenologyError, PhenologyResult, Target, ThermalTimePhase};

/// What happens when the last phase completes.  There is no default: every
/// phenology states its policy.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum FinalPhasePolicy {
    /// Wrap to the first phase with fresh accumulators.
    Loop,
    /// Stop; further days are no-ops.
    Terminate,
}

impl fmt::Display for FinalPhasePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

impl FromStr for FinalPhasePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Loop" => Ok(FinalPhasePolicy::Loop),
            "Terminate" => Ok(FinalPhasePolicy::Terminate),
            other => Err(format!("unknown final phase policy {other:?}")),
        }
    }
}

/// One completed phase within a day.
#[derive(Clone, Debug, PartialEq)]
pub struct PhaseTransition {
    pub from:        String,
    /// `None` once a `Terminate` phenology has finished.
    pub to:          Option<String>,
    pub end_event:   String,
    pub start_event: Option<String>,
    /// `true` if this transition wrapped back to the first phase.
    pub looped:      bool,
}

/// An ordered list of phases stepped once per day.
pub struct Phenology {
    name:     String,
    phases:   Vec<Box<dyn Phase>>,
    current:  usize,
    policy:   FinalPhasePolicy,
    finished: bool,
}

impl fmt::Debug for Phenology {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Phenology")
            .field("name", &self.name)
            .field("phases", &self.phase_names().collect::<Vec<_>>())
            .field("current", &self.current)
            .field("policy", &self.policy)
            .field("finished", &self.finished)
            .finish()
    }
}

impl Phenology {
    pub fn new(name: impl Into<String>, phases: Vec<Box<dyn Phase>>, policy: FinalPhasePolicy) -> PhenologyResult<Self> {
        let name = name.into();
        if phases.is_empty() {
            return Err(PhenologyError::NoPhases { name });
        }
        Ok(Self { name, phases, current: 0, policy, finished: false })
    }

    /// Build from a `Phenology` node and its enabled `Phase` children.
    pub fn from_tree(tree: &ModelTree, id: ModelId) -> PhenologyResult<Self> {
        let node = tree.node(id)?;
        let path = tree.path(id);
        if node.model_type() != ModelType::Phenology {
            return Err(PhenologyError::InvalidSetting { path, message: "not a Phenology node".into() });
        }
        let number = |id: ModelId, property: &str| -> PhenologyResult<f64> {
            tree.node(id)?.number(property).ok_or_else(|| PhenologyError::MissingProperty {
                path:     tree.path(id),
                property: property.into(),
            })
        };
        let text = |id: ModelId, property: &str| -> PhenologyResult<String> {
            tree.node(id)?.text(property).map(str::to_string).ok_or_else(|| PhenologyError::MissingProperty {
                path:     tree.path(id),
                property: property.into(),
            })
        };

        let policy = text(id, "final_phase_policy")?
            .parse::<FinalPhasePolicy>()
            .map_err(|message| PhenologyError::InvalidSetting { path: path.clone(), message })?;
        let thermal = Accumulation::ThermalTime {
            base:    number(id, "base_temp")?,
            optimum: number(id, "optimum_temp")?,
            maximum: number(id, "maximum_temp")?,
        };

        let mut phases: Vec<Box<dyn Phase>> = Vec::new();
        for (phase_id, phase_node) in tree.children_of_type(id, ModelType::Phase) {
            if !phase_node.is_enabled() {
                continue;
            }
            let accumulation = match text(phase_id, "accumulation")?.as_str() {
                "Days" => Accumulation::Days,
                _ => thermal,
            };
            let phase = ThermalTimePhase::new(phase_node.name(), number(phase_id, "target")?, accumulation)
                .with_events(text(phase_id, "start")?, text(phase_id, "end")?);
            phases.push(Box::new(phase));
        }
        let phenology = Self::new(node.name(), phases, policy)?;
        tracing::debug!(%path, phases = phenology.phases.len(), %policy, "phenology bound");
        Ok(phenology)
    }

    // ── Accessors ─────────────────────────────────────────────────────────

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn policy(&self) -> FinalPhasePolicy {
        self.policy
    }

    pub fn phases(&self) -> &[Box<dyn Phase>] {
        &self.phases
    }

    pub fn phase_names(&self) -> impl Iterator<Item = &str> + '_ {
        self.phases.iter().map(|p| p.name())
    }

    pub fn current_index(&self) -> usize {
        self.current
    }

    pub fn current_phase(&self) -> &dyn Phase {
        self.phases[self.current].as_ref()
    }

    pub fn current_phase_name(&self) -> &str {
        self.current_phase().name()
    }

    pub fn fraction_complete(&self) -> f64 {
        self.current_phase().fraction_complete()
    }

    /// 1-based index of the current phase plus its fraction complete.
    pub fn stage(&self) -> f64 {
        (self.current + 1) as f64 + self.fraction_complete()
    }

    /// `true` once a `Terminate` phenology has completed its last phase.
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Replace the target of the named phase.
    pub fn set_target(&mut self, phase: &str, target: Target) -> PhenologyResult<()> {
        let p = self
            .phases
            .iter_mut()
            .find(|p| p.name() == phase)
            .ok_or_else(|| PhenologyError::UnknownPhase(phase.to_string()))?;
        p.set_target(target);
        Ok(())
    }

    // ── Stepping ──────────────────────────────────────────────────────────

    /// Advance one day.  A day may complete several phases; each completion
    /// passes its unused day fraction to the next phase.
    ///
    /// A day completes each phase at most once, and stepping stops as soon
    /// as a completion leaves the day fraction unchanged.  Any remainder is
    /// dropped.
    pub fn advance_day(&mut self, ctx: &PhaseContext) -> PhenologyResult<Vec<PhaseTransition>> {
        let mut transitions = Vec::new();
        let mut prop = 1.0;
        while !self.finished && prop > 0.0 && transitions.len() < self.phases.len() {
            let step = self.phases[self.current].do_time_step(prop, ctx)?;
            if !step.completed {
                break;
            }
            transitions.push(self.complete_current());
            if step.leftover >= prop {
                tracing::debug!(phenology = %self.name, leftover = step.leftover, "phase made no progress");
                break;
            }
            prop = step.leftover;
        }
        Ok(transitions)
    }

    /// Move the pointer past the current phase, applying the final-phase
    /// policy at the end of the list.
    fn complete_current(&mut self) -> PhaseTransition {
        let from = &self.phases[self.current];
        let (from_name, end_event) = (from.name().to_string(), from.end().to_string());

        let looped = self.current + 1 == self.phases.len();
        if looped && self.policy == FinalPhasePolicy::Terminate {
            self.finished = true;
            tracing::info!(phenology = %self.name, phase = %from_name, "final phase complete");
            return PhaseTransition { from: from_name, to: None, end_event, start_event: None, looped: false };
        }

        self.current = if looped { 0 } else { self.current + 1 };
        let next = &mut self.phases[self.current];
        next.reset_phase();
        tracing::debug!(phenology = %self.name, from = %from_name, to = %next.name(), "phase transition");
        PhaseTransition {
            from: from_name,
            to: Some(next.name().to_string()),
            end_event,
            start_event: Some(next.start().to_string()),
            looped,
        }
    }

    /// Back to the first phase with every accumulator zeroed.
    pub fn reset(&mut self) {
        for phase in &mut self.phases {
            phase.reset_phase();
        }
        self.current = 0;
        self.finished = false;
    }

    /// Summary lines for every phase up to and including the current one.
    pub fn write_summary(&self, w: &mut dyn io::Write) -> io::Result<()> {
        writeln!(w, "   {} ({})", self.name, self.policy)?;
        for phase in &self.phases[..=self.current] {
            phase.write_summary(w)?;
        }
        Ok(())
    }
}
