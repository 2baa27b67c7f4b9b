use std::path::PathBuf;

/// Failures that cross the pipeline boundary. Stage degradations never show up here.
#[derive(Debug, thiserror::Error)]
pub enum TriageError {
    #[error("knowledge resource {path} is not valid UTF-8: {source}")]
    KnowledgeDecode {
        path: PathBuf,
        #[source]
        source: std::string::FromUtf8Error,
    },
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("config: {0}")]
    Load(#[from] config::ConfigError),
    #[error("invalid config: {0}")]
    Invalid(String),
}
