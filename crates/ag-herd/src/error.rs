use ag_core::IndividualId;
use ag_tree::TreeError;
use thiserror::Error;

/// A predicate could not be evaluated against one individual.
///
/// The individual is excluded from the selection and the error is counted
/// in [`Selection::skipped`](crate::Selection::skipped); evaluation of the
/// rest of the population continues.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum FilterEvaluationError {
    #[error("{individual} has no attribute `{attribute}`")]
    MissingAttribute { individual: IndividualId, attribute: String },

    #[error("{individual}: cannot compare `{attribute}` ({actual}) {op} {expected}")]
    TypeMismatch {
        individual: IndividualId,
        attribute:  String,
        op:         &'static str,
        actual:     String,
        expected:   String,
    },
}

#[derive(Debug, Error)]
pub enum HerdError {
    #[error(transparent)]
    Tree(#[from] TreeError),

    #[error("`{path}` is missing property `{property}`")]
    MissingProperty { path: String, property: String },

    #[error("`{path}`: unknown feed style {style:?}")]
    UnknownFeedStyle { path: String, style: String },

    #[error("`{path}`: unknown comparison operator {op:?}")]
    UnknownOperator { path: String, op: String },

    #[error("`{path}` is not a {expected}")]
    WrongNodeType { path: String, expected: &'static str },

    #[error("{breed} herd has more individuals than ids")]
    PopulationOverflow { breed: String },
}

pub type HerdResult<T> = Result<T, HerdError>;
