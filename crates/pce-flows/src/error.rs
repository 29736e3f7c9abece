use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("io error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    #[error("invalid query file {path}: {source}")]
    Yaml {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("traffic config '{0}' not found in query file")]
    UnknownTrafficConfig(String),

    #[error("label filter '{0}' does not match any label on the pce")]
    UnresolvableLabel(String),

    #[error("policy decision '{0}' is not one of allowed, potentially_blocked, blocked, unknown")]
    UnknownPolicyDecision(String),

    #[error("label filter '{0}' is not of the form key=value")]
    InvalidLabelFilter(String),
}

impl ExportError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ExportError::Io {
            path: path.into(),
            source,
        }
    }
}
