use ag_core::{AgError, Tick};
use ag_graph::GraphError;
use ag_herd::HerdError;
use ag_phenology::PhenologyError;
use ag_tree::TreeError;
use thiserror::Error;

/// Error type returned by user [`Component`](crate::Component)s.
pub type ComponentError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Debug, Error)]
pub enum SimError {
    #[error("simulation configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Core(#[from] AgError),

    #[error(transparent)]
    Tree(#[from] TreeError),

    #[error(transparent)]
    Herd(#[from] HerdError),

    #[error(transparent)]
    Graph(#[from] GraphError),

    #[error("`{path}`: {source}")]
    Phenology {
        path:   String,
        #[source]
        source: PhenologyError,
    },

    /// A daily callback failed; the run stops at `tick`.
    #[error("component `{path}` failed on {tick}: {source}")]
    Component {
        path:   String,
        tick:   Tick,
        #[source]
        source: ComponentError,
    },

    #[error("no weather for {0}")]
    WeatherMissing(Tick),

    #[error("weather file error: {0}")]
    WeatherCsv(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type SimResult<T> = Result<T, SimError>;
