//! Feed groups and weighted selection.
//!
//! # Weights
//!
//! Each matched individual receives a weight: the amount allocated to it,
//! derived from the group's `value` and the owning activity's [`FeedStyle`].
//!
//! | Style                                 | Weight per match                            |
//! |---------------------------------------|---------------------------------------------|
//! | `SpecifiedDailyAmount`                | `value / matched`                           |
//! | `SpecifiedDailyAmountPerIndividual`   | `value`                                     |
//! | `ProportionOfFeedAvailable`           | `value * feed_available / matched`          |
//! | `ProportionOfWeight`                  | `value * Weight`                            |
//! | `ProportionOfPotentialIntake`         | `value * PotentialIntake`                   |
//! | `ProportionOfRemainingIntakeRequired` | `value * max(0, PotentialIntake - Intake)`  |
//!
//! A non-positive `value` still selects, with every weight `0`.

use std::fmt;
use std::str::FromStr;

use ag_core::{IndividualId, ModelId};
use ag_tree::{ModelTree, ModelType};

use crate::{FilterEvaluationError, HerdError, HerdResult, Individual, Predicate};

// ── FeedStyle ─────────────────────────────────────────────────────────────────

/// Selection mode: how a group's `value` turns into per-individual amounts.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum FeedStyle {
    SpecifiedDailyAmount,
    SpecifiedDailyAmountPerIndividual,
    ProportionOfFeedAvailable,
    ProportionOfWeight,
    ProportionOfPotentialIntake,
    ProportionOfRemainingIntakeRequired,
}

impl FeedStyle {
    pub const ALL: [FeedStyle; 6] = [
        FeedStyle::SpecifiedDailyAmount,
        FeedStyle::SpecifiedDailyAmountPerIndividual,
        FeedStyle::ProportionOfFeedAvailable,
        FeedStyle::ProportionOfWeight,
        FeedStyle::ProportionOfPotentialIntake,
        FeedStyle::ProportionOfRemainingIntakeRequired,
    ];

    /// `true` for the proportion-based styles.
    pub fn is_proportional(self) -> bool {
        !matches!(self, FeedStyle::SpecifiedDailyAmount | FeedStyle::SpecifiedDailyAmountPerIndividual)
    }
}

impl fmt::Display for FeedStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

impl FromStr for FeedStyle {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FeedStyle::ALL
            .iter()
            .copied()
            .find(|style| style.to_string() == s)
            .ok_or_else(|| format!("unknown feed style {s:?}"))
    }
}

/// State the group reads from outside the individual.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct SelectionContext {
    pub style:          FeedStyle,
    /// Feed on hand today, kg.  Only read by `ProportionOfFeedAvailable`.
    pub feed_available: f64,
}

// ── Selection ─────────────────────────────────────────────────────────────────

/// One matched individual and its allocated weight.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Selected {
    /// Position in the evaluated population.
    pub index:  usize,
    pub id:     IndividualId,
    pub weight: f64,
}

/// Result of evaluating a group against a population.  Transient: built
/// fresh on every evaluation.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Selection {
    /// Matches in population order.
    pub entries:    Vec<Selected>,
    /// `matched / population` (0 for an empty population).
    pub proportion: f64,
    /// Individuals excluded because a predicate could not be evaluated.
    pub skipped:    Vec<FilterEvaluationError>,
}

impl Selection {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn total_weight(&self) -> f64 {
        self.entries.iter().map(|e| e.weight).sum()
    }

    pub fn ids(&self) -> impl Iterator<Item = IndividualId> + '_ {
        self.entries.iter().map(|e| e.id)
    }
}

// ── FilterGroup ───────────────────────────────────────────────────────────────

/// A named set of predicates (combined with AND) and the value to allocate
/// to the individuals they select.
#[derive(Clone, Debug, PartialEq)]
pub struct FilterGroup {
    pub name:      String,
    pub value:     f64,
    pub predicate: Predicate,
}

impl FilterGroup {
    pub fn new(name: impl Into<String>, value: f64, filters: Vec<Predicate>) -> Self {
        Self { name: name.into(), value, predicate: Predicate::All(filters) }
    }

    /// Read a `RuminantFeedGroup` node and compile its enabled
    /// `RuminantFilter` children.
    pub fn from_tree(tree: &ModelTree, id: ModelId) -> HerdResult<Self> {
        let node = tree.node(id)?;
        if node.model_type() != ModelType::RuminantFeedGroup {
            return Err(HerdError::WrongNodeType { path: tree.path(id), expected: "RuminantFeedGroup" });
        }
        let value = node
            .number("value")
            .ok_or_else(|| HerdError::MissingProperty { path: tree.path(id), property: "value".into() })?;
        let filters = tree
            .children_of_type(id, ModelType::RuminantFilter)
            .filter(|(_, n)| n.is_enabled())
            .map(|(filter, _)| Predicate::from_filter_node(tree, filter))
            .collect::<HerdResult<Vec<_>>>()?;
        if value <= 0.0 {
            tracing::warn!(path = %tree.path(id), value, "feed group value is not positive; it will allocate nothing");
        }
        Ok(Self::new(node.name(), value, filters))
    }

    /// Select matching individuals from `population` and weight them.
    pub fn evaluate<I>(&self, population: &[I], ctx: SelectionContext) -> Selection
    where
        I: Individual + Sync,
    {
        let outcomes = self.match_all(population);

        let mut matched = Vec::new();
        let mut skipped = Vec::new();
        for (index, outcome) in outcomes.into_iter().enumerate() {
            match outcome {
                Ok(true) => matched.push(index),
                Ok(false) => {}
                Err(e) => skipped.push(e),
            }
        }
        if !skipped.is_empty() {
            tracing::warn!(group = %self.name, skipped = skipped.len(), first = %skipped[0], "individuals excluded from filter group");
        }

        let n = matched.len();
        let value = self.value.max(0.0);
        let entries = matched
            .into_iter()
            .map(|index| {
                let individual = &population[index];
                Selected { index, id: individual.id(), weight: weight(individual, value, n, ctx) }
            })
            .collect();

        let proportion = if population.is_empty() { 0.0 } else { n as f64 / population.len() as f64 };
        tracing::trace!(group = %self.name, matched = n, proportion, "filter group evaluated");
        Selection { entries, proportion, skipped }
    }

    #[cfg(not(feature = "parallel"))]
    fn match_all<I: Individual + Sync>(&self, population: &[I]) -> Vec<Result<bool, FilterEvaluationError>> {
        population.iter().map(|i| self.predicate.evaluate(i)).collect()
    }

    #[cfg(feature = "parallel")]
    fn match_all<I: Individual + Sync>(&self, population: &[I]) -> Vec<Result<bool, FilterEvaluationError>> {
        use rayon::prelude::*;
        population.par_iter().map(|i| self.predicate.evaluate(i)).collect()
    }
}

fn weight<I: Individual + ?Sized>(individual: &I, value: f64, matched: usize, ctx: SelectionContext) -> f64 {
    let share = |amount: f64| if matched == 0 { 0.0 } else { amount / matched as f64 };
    let number = |name: &str| individual.number(name).unwrap_or(0.0).max(0.0);
    match ctx.style {
        FeedStyle::SpecifiedDailyAmount => share(value),
        FeedStyle::SpecifiedDailyAmountPerIndividual => value,
        FeedStyle::ProportionOfFeedAvailable => share(value * ctx.feed_available.max(0.0)),
        FeedStyle::ProportionOfWeight => value * number("Weight"),
        FeedStyle::ProportionOfPotentialIntake => value * number("PotentialIntake"),
        FeedStyle::ProportionOfRemainingIntakeRequired => {
            value * (number("PotentialIntake") - number("Intake")).max(0.0)
        }
    }
}
