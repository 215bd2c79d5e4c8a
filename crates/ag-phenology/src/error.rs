use ag_tree::TreeError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PhenologyError {
    /// The phase target evaluated to a non-positive or non-finite value.
    #[error("phase `{phase}` has an unreachable target {target}")]
    TargetUnreachable { phase: String, target: f64 },

    #[error("phenology `{name}` has no phases")]
    NoPhases { name: String },

    #[error("phenology has no phase named `{0}`")]
    UnknownPhase(String),

    #[error("`{path}` is missing property `{property}`")]
    MissingProperty { path: String, property: String },

    #[error("`{path}`: {message}")]
    InvalidSetting { path: String, message: String },

    #[error(transparent)]
    Tree(#[from] TreeError),
}

pub type PhenologyResult<T> = Result<T, PhenologyError>;
