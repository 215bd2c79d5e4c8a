//! The ruminant record.

use std::fmt;

use ag_core::IndividualId;

use crate::{AttributeValue, Individual};

/// Daily potential intake as a fraction of live weight.
pub const POTENTIAL_INTAKE_FRACTION: f64 = 0.025;

/// Potential intake multiplier for lactating females.
pub const LACTATION_INTAKE_FACTOR: f64 = 1.35;

/// Intake is limited to this multiple of potential intake.  Food offered
/// beyond the limit still counts as fed.
pub const INTAKE_LIMIT_FACTOR: f64 = 1.2;

/// Mean month length used for daily ageing.
pub const DAYS_PER_MONTH: f64 = 30.4;

/// Weaning age in months.
pub const WEANING_AGE_MONTHS: f64 = 6.0;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Sex {
    Female,
    Male,
}

impl Sex {
    pub fn as_str(self) -> &'static str {
        match self {
            Sex::Female => "Female",
            Sex::Male => "Male",
        }
    }
}

impl fmt::Display for Sex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Attributes that only one sex carries.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum SexState {
    Female { lactating: bool, pregnant: bool },
    Male { castrated: bool },
}

impl SexState {
    pub fn sex(&self) -> Sex {
        match self {
            SexState::Female { .. } => Sex::Female,
            SexState::Male { .. } => Sex::Male,
        }
    }
}

/// One animal in a herd.
#[derive(Clone, Debug, PartialEq)]
pub struct Ruminant {
    pub id:         IndividualId,
    pub breed:      String,
    pub state:      SexState,
    /// Age in months.
    pub age:        f64,
    /// Live weight in kg.
    pub weight:     f64,
    /// Intake received today in kg.
    pub intake:     f64,
    /// Potential daily intake in kg, recomputed at the start of each day.
    pub potential_intake: f64,
}

impl Ruminant {
    pub fn new(id: IndividualId, breed: impl Into<String>, state: SexState, age: f64, weight: f64) -> Self {
        let mut r = Self { id, breed: breed.into(), state, age, weight, intake: 0.0, potential_intake: 0.0 };
        r.potential_intake = r.compute_potential_intake();
        r
    }

    pub fn sex(&self) -> Sex {
        self.state.sex()
    }

    pub fn is_weaned(&self) -> bool {
        self.age >= WEANING_AGE_MONTHS
    }

    fn compute_potential_intake(&self) -> f64 {
        let base = self.weight.max(0.0) * POTENTIAL_INTAKE_FRACTION;
        match self.state {
            SexState::Female { lactating: true, .. } => base * LACTATION_INTAKE_FACTOR,
            _ => base,
        }
    }

    /// Start-of-day bookkeeping: age by one day, clear intake and recompute
    /// potential intake.
    pub fn start_day(&mut self) {
        self.age += 1.0 / DAYS_PER_MONTH;
        self.intake = 0.0;
        self.potential_intake = self.compute_potential_intake();
    }

    /// Offer `amount` kg of feed.  Intake rises by at most the room left
    /// under the intake limit; the full amount is returned as fed.
    pub fn feed(&mut self, amount: f64) -> f64 {
        let amount = amount.max(0.0);
        let limit = self.potential_intake * INTAKE_LIMIT_FACTOR;
        self.intake = (self.intake + amount).min(limit.max(self.intake));
        amount
    }

    /// Intake still needed to reach potential intake today.
    pub fn remaining_intake(&self) -> f64 {
        (self.potential_intake - self.intake).max(0.0)
    }
}

impl Individual for Ruminant {
    fn id(&self) -> IndividualId {
        self.id
    }

    fn attribute(&self, name: &str) -> Option<AttributeValue> {
        let value = match (name, self.state) {
            ("Id", _) => AttributeValue::Number(f64::from(self.id.0)),
            ("Breed", _) => AttributeValue::Text(self.breed.clone()),
            ("Sex", _) => AttributeValue::from(self.sex().as_str()),
            ("Age", _) => AttributeValue::Number(self.age),
            ("Weight", _) => AttributeValue::Number(self.weight),
            ("PotentialIntake", _) => AttributeValue::Number(self.potential_intake),
            ("Intake", _) => AttributeValue::Number(self.intake),
            ("Weaned", _) => AttributeValue::Bool(self.is_weaned()),
            ("Lactating", SexState::Female { lactating, .. }) => AttributeValue::Bool(lactating),
            ("Pregnant", SexState::Female { pregnant, .. }) => AttributeValue::Bool(pregnant),
            ("Castrated", SexState::Male { castrated }) => AttributeValue::Bool(castrated),
            _ => return None,
        };
        Some(value)
    }
}
