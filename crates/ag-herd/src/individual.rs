//! The `Individual` trait: what the filter engine needs from a population
//! member.

use std::fmt;

use ag_core::IndividualId;

/// A named attribute value read from an individual.
#[derive(Clone, Debug, PartialEq)]
pub enum AttributeValue {
    Number(f64),
    Bool(bool),
    Text(String),
}

impl AttributeValue {
    /// Parse a filter operand as typed in the model tree: numbers first,
    /// then `true`/`false`, otherwise text.
    pub fn parse(s: &str) -> Self {
        let trimmed = s.trim();
        if let Ok(v) = trimmed.parse::<f64>() {
            return AttributeValue::Number(v);
        }
        match trimmed.to_ascii_lowercase().as_str() {
            "true" => AttributeValue::Bool(true),
            "false" => AttributeValue::Bool(false),
            _ => AttributeValue::Text(trimmed.to_string()),
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match *self {
            AttributeValue::Number(v) => Some(v),
            _ => None,
        }
    }

    pub fn kind_name(&self) -> &'static str {
        match self {
            AttributeValue::Number(_) => "number",
            AttributeValue::Bool(_) => "bool",
            AttributeValue::Text(_) => "text",
        }
    }
}

impl fmt::Display for AttributeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttributeValue::Number(v) => write!(f, "{v}"),
            AttributeValue::Bool(v) => write!(f, "{v}"),
            AttributeValue::Text(s) => write!(f, "{s:?}"),
        }
    }
}

impl From<f64> for AttributeValue {
    fn from(v: f64) -> Self {
        AttributeValue::Number(v)
    }
}

impl From<bool> for AttributeValue {
    fn from(v: bool) -> Self {
        AttributeValue::Bool(v)
    }
}

impl From<&str> for AttributeValue {
    fn from(v: &str) -> Self {
        AttributeValue::Text(v.to_string())
    }
}

/// A member of a population that filter predicates can inspect.
///
/// `attribute` returns `None` for attributes the individual does not carry
/// (for example `Pregnant` on a male), which the engine reports as
/// [`FilterEvaluationError::MissingAttribute`](crate::FilterEvaluationError::MissingAttribute).
///
/// Selection modes read these attribute names when an individual's state
/// drives the allocated amount:
///
/// | Attribute          | Used by                                 |
/// |--------------------|-----------------------------------------|
/// | `Weight`           | `ProportionOfWeight`                    |
/// | `PotentialIntake`  | `ProportionOfPotentialIntake`, `ProportionOfRemainingIntakeRequired` |
/// | `Intake`           | `ProportionOfRemainingIntakeRequired`   |
pub trait Individual {
    fn id(&self) -> IndividualId;

    fn attribute(&self, name: &str) -> Option<AttributeValue>;

    /// Numeric attribute shortcut.
    fn number(&self, name: &str) -> Option<f64> {
        self.attribute(name).and_then(|v| v.as_f64())
    }
}
