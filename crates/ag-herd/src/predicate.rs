//! Composable boolean predicates over individuals.
//!
//! A `RuminantFilter` node compiles to one [`Predicate::Compare`]; a feed
//! group's filters combine with [`Predicate::All`].  `All` of nothing is
//! true, so a group without filters matches everyone.

use std::fmt;
use std::str::FromStr;

use ag_core::ModelId;
use ag_tree::{ModelTree, ModelType};

use crate::{AttributeValue, FilterEvaluationError, HerdError, HerdResult, Individual};

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum CompareOp {
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
}

impl CompareOp {
    pub fn symbol(self) -> &'static str {
        match self {
            CompareOp::Eq => "==",
            CompareOp::Ne => "!=",
            CompareOp::Lt => "<",
            CompareOp::Le => "<=",
            CompareOp::Gt => ">",
            CompareOp::Ge => ">=",
        }
    }

    fn is_equality(self) -> bool {
        matches!(self, CompareOp::Eq | CompareOp::Ne)
    }

    fn apply<T: PartialOrd + ?Sized>(self, a: &T, b: &T) -> bool {
        match self {
            CompareOp::Eq => a == b,
            CompareOp::Ne => a != b,
            CompareOp::Lt => a < b,
            CompareOp::Le => a <= b,
            CompareOp::Gt => a > b,
            CompareOp::Ge => a >= b,
        }
    }
}

impl fmt::Display for CompareOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

impl FromStr for CompareOp {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "==" | "=" => Ok(CompareOp::Eq),
            "!=" | "<>" => Ok(CompareOp::Ne),
            "<" => Ok(CompareOp::Lt),
            "<=" => Ok(CompareOp::Le),
            ">" => Ok(CompareOp::Gt),
            ">=" => Ok(CompareOp::Ge),
            other => Err(format!("unknown operator {other:?}")),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum Predicate {
    Compare { attribute: String, op: CompareOp, value: AttributeValue },
    All(Vec<Predicate>),
    Any(Vec<Predicate>),
    Not(Box<Predicate>),
}

impl Predicate {
    pub fn compare(attribute: impl Into<String>, op: CompareOp, value: impl Into<AttributeValue>) -> Self {
        Predicate::Compare { attribute: attribute.into(), op, value: value.into() }
    }

    /// Predicate matching every individual.
    pub fn always() -> Self {
        Predicate::All(Vec::new())
    }

    /// Compile a `RuminantFilter` node.
    pub fn from_filter_node(tree: &ModelTree, id: ModelId) -> HerdResult<Self> {
        let node = tree.node(id)?;
        if node.model_type() != ModelType::RuminantFilter {
            return Err(HerdError::WrongNodeType { path: tree.path(id), expected: "RuminantFilter" });
        }
        let text = |property: &str| {
            node.text(property)
                .ok_or_else(|| HerdError::MissingProperty { path: tree.path(id), property: property.into() })
        };
        let attribute = text("parameter")?;
        let op_text = text("operator")?;
        let op = op_text
            .parse::<CompareOp>()
            .map_err(|_| HerdError::UnknownOperator { path: tree.path(id), op: op_text.to_string() })?;
        let value = AttributeValue::parse(text("value")?);
        Ok(Predicate::compare(attribute, op, value))
    }

    /// Evaluate against one individual.
    ///
    /// `All` and `Any` short-circuit, so an attribute error in a later term
    /// is only reported if that term is reached.
    pub fn evaluate<I: Individual + ?Sized>(&self, individual: &I) -> Result<bool, FilterEvaluationError> {
        match self {
            Predicate::Compare { attribute, op, value } => {
                let actual = individual.attribute(attribute).ok_or_else(|| {
                    FilterEvaluationError::MissingAttribute { individual: individual.id(), attribute: attribute.clone() }
                })?;
                compare(&actual, *op, value).ok_or_else(|| FilterEvaluationError::TypeMismatch {
                    individual: individual.id(),
                    attribute:  attribute.clone(),
                    op:         op.symbol(),
                    actual:     actual.kind_name().to_string(),
                    expected:   value.to_string(),
                })
            }
            Predicate::All(terms) => {
                for term in terms {
                    if !term.evaluate(individual)? {
                        return Ok(false);
                    }
                }
                Ok(true)
            }
            Predicate::Any(terms) => {
                for term in terms {
                    if term.evaluate(individual)? {
                        return Ok(true);
                    }
                }
                Ok(false)
            }
            Predicate::Not(inner) => inner.evaluate(individual).map(|b| !b),
        }
    }
}

/// `None` when the operands cannot be compared with `op`.
fn compare(actual: &AttributeValue, op: CompareOp, expected: &AttributeValue) -> Option<bool> {
    match (actual, expected) {
        (AttributeValue::Number(a), AttributeValue::Number(b)) => Some(op.apply(a, b)),
        (AttributeValue::Bool(a), AttributeValue::Bool(b)) if op.is_equality() => Some(op.apply(a, b)),
        (AttributeValue::Text(a), AttributeValue::Text(b)) if op.is_equality() => {
            Some(op.apply(&a.to_ascii_lowercase(), &b.to_ascii_lowercase()))
        }
        _ => None,
    }
}

impl fmt::Display for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let join = |f: &mut fmt::Formatter<'_>, terms: &[Predicate], sep: &str| -> fmt::Result {
            write!(f, "(")?;
            for (i, t) in terms.iter().enumerate() {
                if i > 0 {
                    write!(f, " {sep} ")?;
                }
                write!(f, "{t}")?;
            }
            write!(f, ")")
        };
        match self {
            Predicate::Compare { attribute, op, value } => write!(f, "{attribute} {op} {value}"),
            Predicate::All(terms) if terms.is_empty() => write!(f, "all"),
            Predicate::All(terms) => join(f, terms, "and"),
            Predicate::Any(terms) => join(f, terms, "or"),
            Predicate::Not(inner) => write!(f, "not {inner}"),
        }
    }
}
