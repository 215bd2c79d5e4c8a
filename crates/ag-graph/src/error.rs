use ag_tree::TreeError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum GraphError {
    #[error(transparent)]
    Tree(#[from] TreeError),

    #[error("`{path}` is not a {expected}")]
    WrongNodeType { path: String, expected: &'static str },

    #[error("`{path}` is missing property `{property}`")]
    MissingProperty { path: String, property: String },

    #[error("`{path}`: unknown axis type {value:?}")]
    UnknownAxisType { path: String, value: String },
}

pub type GraphResult<T> = Result<T, GraphError>;
