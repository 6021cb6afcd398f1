use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("missing required environment variable {0}")]
    MissingVar(&'static str),

    #[error("invalid value for {name}: {value:?}")]
    InvalidVar { name: &'static str, value: String },
}

#[derive(Error, Debug)]
pub enum FetchError {
    #[error("failed to build http client: {0}")]
    Client(#[source] reqwest::Error),

    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("http {status} from {url}")]
    Status {
        url: String,
        status: reqwest::StatusCode,
    },
}

#[derive(Error, Debug, PartialEq)]
pub enum ParseError {
    #[error("no <table> found on page")]
    NoTable,

    #[error("column {column} not found (available: {available:?})")]
    MissingColumn {
        column: String,
        available: Vec<String>,
    },

    #[error("expected at least {needed} team rows, found {found}")]
    TooFewRows { needed: usize, found: usize },
}

#[derive(Error, Debug)]
pub enum NotifyError {
    #[error("failed to build http client: {0}")]
    Client(#[source] reqwest::Error),

    #[error("sendMessage request failed: {0}")]
    Transport(#[source] reqwest::Error),

    #[error("sendMessage returned http {status}")]
    Status { status: reqwest::StatusCode },
}

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("fetch failed: {0}")]
    Fetch(#[from] FetchError),

    #[error("parse failed: {0}")]
    Parse(#[from] ParseError),

    #[error("bad goal average for {team}: {value}")]
    DataQuality { team: String, value: f64 },

    #[error("notify failed: {0}")]
    Notify(#[from] NotifyError),
}

impl PipelineError {
    /// Source-side failures end the run quietly; a failed delivery does not.
    pub fn is_recoverable(&self) -> bool {
        match self {
            PipelineError::Fetch(_) | PipelineError::Parse(_) | PipelineError::DataQuality { .. } => {
                true
            }
            PipelineError::Notify(_) => false,
        }
    }
}
