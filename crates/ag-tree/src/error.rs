use ag_core::ModelId;
use thiserror::Error;

use crate::ModelType;

/// A property value failed its declared kind or an error-severity constraint.
#[derive(Debug, Error, Clone, PartialEq)]
#[error("invalid value for property `{property}`: {message}")]
pub struct ValidationError {
    pub property: String,
    pub message:  String,
}

impl ValidationError {
    pub fn new(property: &str, message: impl Into<String>) -> Self {
        Self { property: property.to_string(), message: message.into() }
    }
}

/// A node was placed under a parent whose type it does not accept.
#[derive(Debug, Error, Clone, PartialEq)]
#[error(
    "{child_type} `{child_name}` cannot be placed under {parent_type} `{parent_path}` \
     (accepted parents: {accepted})"
)]
pub struct InvalidParentError {
    pub child_type:  ModelType,
    pub child_name:  String,
    pub parent_type: ModelType,
    pub parent_path: String,
    pub accepted:    String,
}

#[derive(Debug, Error)]
pub enum TreeError {
    #[error(transparent)]
    InvalidParent(#[from] InvalidParentError),

    #[error("`{parent_path}` already has a child named `{name}`")]
    DuplicateName { parent_path: String, name: String },

    #[error("{0} not found")]
    NodeNotFound(ModelId),

    #[error("`{parent_path}`: invalid node name {name:?} ({reason})")]
    InvalidName { parent_path: String, name: String, reason: &'static str },

    #[error("tree is full: no id left for {needed} more node(s)")]
    ArenaFull { needed: usize },

    #[error("the root node cannot be detached")]
    DetachRoot,

    #[error("`{path}` has no property `{property}`")]
    UnknownProperty { path: String, property: String },

    #[error("`{path}`: {source}")]
    Validation {
        path:   String,
        #[source]
        source: ValidationError,
    },

    #[error("model document error: {0}")]
    Document(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type TreeResult<T> = Result<T, TreeError>;
