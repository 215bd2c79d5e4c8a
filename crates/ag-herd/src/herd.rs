//! `Herd` and its cohort-based builder.
//!
//! # Usage
//!
//! ```rust
//! use ag_core::SimRng;
//! use ag_herd::{Cohort, HerdBuilder, Sex};
//!
//! let mut rng = SimRng::new(42);
//! let herd = HerdBuilder::new("Bos indicus")
//!     .cohort(Cohort::new(Sex::Female, 10, 36.0, 300.0))
//!     .cohort(Cohort::new(Sex::Male, 5, 18.0, 220.0).with_weight_sd(15.0))
//!     .build(&mut rng)
//!     .unwrap();
//!
//! assert_eq!(herd.len(), 15);
//! ```

use ag_core::{IndividualId, ModelId, SimRng};
use ag_tree::{ModelTree, ModelType};

use crate::ruminant::{Ruminant, Sex, SexState};
use crate::{HerdError, HerdResult};

// ── Cohort ────────────────────────────────────────────────────────────────────

/// A group of identical animals to create at setup time.
#[derive(Clone, Debug, PartialEq)]
pub struct Cohort {
    pub sex:       Sex,
    pub count:     usize,
    pub age:       f64,
    pub weight:    f64,
    /// Half-width of the uniform jitter applied to each animal's weight.
    pub weight_sd: f64,
    pub lactating: bool,
    pub pregnant:  bool,
    pub castrated: bool,
}

impl Cohort {
    pub fn new(sex: Sex, count: usize, age: f64, weight: f64) -> Self {
        Self { sex, count, age, weight, weight_sd: 0.0, lactating: false, pregnant: false, castrated: false }
    }

    pub fn with_weight_sd(mut self, weight_sd: f64) -> Self {
        self.weight_sd = weight_sd;
        self
    }

    pub fn lactating(mut self) -> Self {
        self.lactating = true;
        self
    }

    pub fn pregnant(mut self) -> Self {
        self.pregnant = true;
        self
    }

    pub fn castrated(mut self) -> Self {
        self.castrated = true;
        self
    }

    /// Read a `RuminantCohort` node.
    pub fn from_node(tree: &ModelTree, id: ModelId) -> HerdResult<Self> {
        let node = tree.node(id)?;
        if node.model_type() != ModelType::RuminantCohort {
            return Err(HerdError::WrongNodeType { path: tree.path(id), expected: "RuminantCohort" });
        }
        let missing = |property: &str| HerdError::MissingProperty { path: tree.path(id), property: property.into() };

        let sex = match node.text("sex").ok_or_else(|| missing("sex"))? {
            "Male" => Sex::Male,
            _ => Sex::Female,
        };
        let count = node.integer("count").ok_or_else(|| missing("count"))?;
        Ok(Self {
            sex,
            count:     usize::try_from(count).unwrap_or(0),
            age:       node.number("age_months").ok_or_else(|| missing("age_months"))?,
            weight:    node.number("weight").ok_or_else(|| missing("weight"))?,
            weight_sd: node.number("weight_sd").unwrap_or(0.0),
            lactating: node.flag("lactating").unwrap_or(false),
            pregnant:  node.flag("pregnant").unwrap_or(false),
            castrated: node.flag("castrated").unwrap_or(false),
        })
    }

    fn state(&self) -> SexState {
        match self.sex {
            Sex::Female => SexState::Female { lactating: self.lactating, pregnant: self.pregnant },
            Sex::Male => SexState::Male { castrated: self.castrated },
        }
    }
}

// ── HerdBuilder ───────────────────────────────────────────────────────────────

/// Fluent builder for a [`Herd`].
pub struct HerdBuilder {
    breed:   String,
    cohorts: Vec<Cohort>,
}

impl HerdBuilder {
    pub fn new(breed: impl Into<String>) -> Self {
        Self { breed: breed.into(), cohorts: Vec::new() }
    }

    pub fn cohort(mut self, cohort: Cohort) -> Self {
        self.cohorts.push(cohort);
        self
    }

    /// Create every animal.  Ids are assigned in cohort order; weights are
    /// jittered from `rng`, floored at 1 kg.
    pub fn build(self, rng: &mut SimRng) -> HerdResult<Herd> {
        let mut individuals = Vec::new();
        for cohort in &self.cohorts {
            for _ in 0..cohort.count {
                let id = IndividualId::from_index(individuals.len())
                    .ok_or_else(|| HerdError::PopulationOverflow { breed: self.breed.clone() })?;
                let weight = rng.jitter(cohort.weight, cohort.weight_sd).max(1.0);
                individuals.push(Ruminant::new(id, self.breed.clone(), cohort.state(), cohort.age, weight));
            }
        }
        Ok(Herd { breed: self.breed, individuals })
    }
}

// ── Herd ──────────────────────────────────────────────────────────────────────

/// The population a herd node manages.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Herd {
    pub breed:       String,
    pub individuals: Vec<Ruminant>,
}

impl Herd {
    /// Build from a `RuminantHerd` node and its enabled `RuminantCohort`
    /// children.
    pub fn from_tree(tree: &ModelTree, id: ModelId, rng: &mut SimRng) -> HerdResult<Self> {
        let node = tree.node(id)?;
        if node.model_type() != ModelType::RuminantHerd {
            return Err(HerdError::WrongNodeType { path: tree.path(id), expected: "RuminantHerd" });
        }
        let breed = node
            .text("breed")
            .ok_or_else(|| HerdError::MissingProperty { path: tree.path(id), property: "breed".into() })?;

        let mut builder = HerdBuilder::new(breed);
        for (cohort, n) in tree.children_of_type(id, ModelType::RuminantCohort) {
            if n.is_enabled() {
                builder = builder.cohort(Cohort::from_node(tree, cohort)?);
            }
        }
        let herd = builder.build(rng)?;
        tracing::debug!(path = %tree.path(id), individuals = herd.len(), "herd initialised");
        Ok(herd)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.individuals.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.individuals.is_empty()
    }

    pub fn get(&self, id: IndividualId) -> Option<&Ruminant> {
        self.individuals.iter().find(|r| r.id == id)
    }

    pub fn get_mut(&mut self, id: IndividualId) -> Option<&mut Ruminant> {
        self.individuals.iter_mut().find(|r| r.id == id)
    }

    pub fn start_day(&mut self) {
        for r in &mut self.individuals {
            r.start_day();
        }
    }

    pub fn total_weight(&self) -> f64 {
        self.individuals.iter().map(|r| r.weight).sum()
    }

    pub fn total_intake(&self) -> f64 {
        self.individuals.iter().map(|r| r.intake).sum()
    }
}
