//! Typed, named properties attached to model nodes.
//!
//! A [`Property`] carries its declared [`PropertyKind`], the current
//! [`PropertyValue`], optional display metadata (units, description), and a
//! list of [`Rule`]s.  Every assignment validates eagerly:
//!
//! - a kind mismatch or a violated [`Severity::Error`] rule rejects the value
//!   and leaves the property untouched;
//! - a violated [`Severity::Warning`] rule accepts the value and is reported
//!   later through [`Property::warnings`] (and `ModelTree::validate`).
//!
//! Values are never clamped.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::ValidationError;

// ── Kinds and values ──────────────────────────────────────────────────────────

/// Declared value type of a property.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PropertyKind {
    Number,
    Integer,
    Bool,
    Text,
}

impl fmt::Display for PropertyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// A property value.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum PropertyValue {
    Number(f64),
    Integer(i64),
    Bool(bool),
    Text(String),
}

impl PropertyValue {
    pub fn kind(&self) -> PropertyKind {
        match self {
            PropertyValue::Number(_) => PropertyKind::Number,
            PropertyValue::Integer(_) => PropertyKind::Integer,
            PropertyValue::Bool(_) => PropertyKind::Bool,
            PropertyValue::Text(_) => PropertyKind::Text,
        }
    }

    /// Numeric view; integers widen to `f64`.
    pub fn as_f64(&self) -> Option<f64> {
        match *self {
            PropertyValue::Number(v) => Some(v),
            PropertyValue::Integer(v) => Some(v as f64),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match *self {
            PropertyValue::Integer(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match *self {
            PropertyValue::Bool(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            PropertyValue::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Convert to `kind` where that is lossless (integer → number).
    fn coerce(self, kind: PropertyKind) -> Option<PropertyValue> {
        match (self, kind) {
            (PropertyValue::Integer(v), PropertyKind::Number) => Some(PropertyValue::Number(v as f64)),
            (v, k) if v.kind() == k => Some(v),
            _ => None,
        }
    }
}

impl fmt::Display for PropertyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PropertyValue::Number(v) => write!(f, "{v}"),
            PropertyValue::Integer(v) => write!(f, "{v}"),
            PropertyValue::Bool(v) => write!(f, "{v}"),
            PropertyValue::Text(s) => write!(f, "{s:?}"),
        }
    }
}

impl From<f64> for PropertyValue {
    fn from(v: f64) -> Self {
        PropertyValue::Number(v)
    }
}

impl From<i64> for PropertyValue {
    fn from(v: i64) -> Self {
        PropertyValue::Integer(v)
    }
}

impl From<bool> for PropertyValue {
    fn from(v: bool) -> Self {
        PropertyValue::Bool(v)
    }
}

impl From<&str> for PropertyValue {
    fn from(v: &str) -> Self {
        PropertyValue::Text(v.to_string())
    }
}

impl From<String> for PropertyValue {
    fn from(v: String) -> Self {
        PropertyValue::Text(v)
    }
}

// ── Constraints ───────────────────────────────────────────────────────────────

/// A validation predicate over a property value.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Constraint {
    GreaterThan(f64),
    GreaterThanOrEqual(f64),
    LessThan(f64),
    LessThanOrEqual(f64),
    /// Inclusive on both ends.
    Range { min: f64, max: f64 },
    /// Text must contain a non-whitespace character.
    NotEmpty,
    /// Text must equal one of the listed options.
    OneOf(Vec<String>),
}

impl Constraint {
    /// `None` if `value` satisfies the constraint, otherwise a message.
    ///
    /// Numeric constraints ignore non-numeric values and vice versa; the kind
    /// check runs before constraints.
    pub fn check(&self, value: &PropertyValue) -> Option<String> {
        match self {
            Constraint::GreaterThan(limit) => value
                .as_f64()
                .filter(|v| !(*v > *limit))
                .map(|v| format!("{v} must be greater than {limit}")),
            Constraint::GreaterThanOrEqual(limit) => value
                .as_f64()
                .filter(|v| !(*v >= *limit))
                .map(|v| format!("{v} must be at least {limit}")),
            Constraint::LessThan(limit) => value
                .as_f64()
                .filter(|v| !(*v < *limit))
                .map(|v| format!("{v} must be less than {limit}")),
            Constraint::LessThanOrEqual(limit) => value
                .as_f64()
                .filter(|v| !(*v <= *limit))
                .map(|v| format!("{v} must be at most {limit}")),
            Constraint::Range { min, max } => value
                .as_f64()
                .filter(|v| !(*v >= *min && *v <= *max))
                .map(|v| format!("{v} must lie within [{min}, {max}]")),
            Constraint::NotEmpty => value
                .as_str()
                .filter(|s| s.trim().is_empty())
                .map(|_| "value must not be empty".to_string()),
            Constraint::OneOf(options) => value
                .as_str()
                .filter(|s| !options.iter().any(|o| o == s))
                .map(|s| format!("{s:?} is not one of [{}]", options.join(", "))),
        }
    }
}

/// How a violated constraint is treated.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Severity {
    /// Reject the assignment.
    #[default]
    Error,
    /// Accept the value, report it through validation.
    Warning,
}

/// A constraint with its severity.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Rule {
    pub constraint: Constraint,
    #[serde(default)]
    pub severity: Severity,
}

impl Rule {
    pub fn error(constraint: Constraint) -> Self {
        Self { constraint, severity: Severity::Error }
    }

    pub fn warning(constraint: Constraint) -> Self {
        Self { constraint, severity: Severity::Warning }
    }
}

// ── Property ──────────────────────────────────────────────────────────────────

/// A typed, named, validated value on a model node.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Property {
    pub name: String,
    pub kind: PropertyKind,
    value: PropertyValue,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub units: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub rules: Vec<Rule>,
}

impl Property {
    /// Declare a property with an initial value.
    ///
    /// The initial value goes through the same validation as any later
    /// assignment, so a schema cannot declare an invalid default.
    pub fn new(
        name:  impl Into<String>,
        kind:  PropertyKind,
        value: impl Into<PropertyValue>,
        rules: Vec<Rule>,
    ) -> Result<Self, ValidationError> {
        let name = name.into();
        let value = value
            .into()
            .coerce(kind)
            .ok_or_else(|| ValidationError::new(&name, format!("expected a {kind} value")))?;
        let property = Self { name, kind, value, units: None, description: None, rules };
        property.validate(&property.value)?;
        Ok(property)
    }

    /// Schema-side constructor; defaults are checked by the registry tests.
    pub(crate) fn declared(name: &str, kind: PropertyKind, value: PropertyValue, rules: Vec<Rule>) -> Self {
        Self { name: name.to_string(), kind, value, units: None, description: None, rules }
    }

    pub fn with_units(mut self, units: impl Into<String>) -> Self {
        self.units = Some(units.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    #[inline]
    pub fn value(&self) -> &PropertyValue {
        &self.value
    }

    /// Check `value` against the declared kind and every error-severity rule.
    pub fn validate(&self, value: &PropertyValue) -> Result<(), ValidationError> {
        if value.kind() != self.kind
            && !(self.kind == PropertyKind::Number && value.kind() == PropertyKind::Integer)
        {
            return Err(ValidationError::new(
                &self.name,
                format!("expected a {} value, got {}", self.kind, value.kind()),
            ));
        }
        for rule in self.rules.iter().filter(|r| r.severity == Severity::Error) {
            if let Some(message) = rule.constraint.check(value) {
                return Err(ValidationError::new(&self.name, message));
            }
        }
        Ok(())
    }

    /// Validate and store `value`.  On error the previous value is kept.
    pub fn assign(&mut self, value: impl Into<PropertyValue>) -> Result<(), ValidationError> {
        let value = value.into();
        self.validate(&value)?;
        // Validation guarantees the coercion succeeds.
        if let Some(value) = value.coerce(self.kind) {
            self.value = value;
        }
        for warning in self.warnings() {
            tracing::warn!(property = %self.name, "{warning}");
        }
        Ok(())
    }

    /// Messages for every warning-severity rule the current value violates.
    pub fn warnings(&self) -> Vec<String> {
        self.rules
            .iter()
            .filter(|r| r.severity == Severity::Warning)
            .filter_map(|r| r.constraint.check(&self.value))
            .collect()
    }
}
