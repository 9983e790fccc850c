use thiserror::Error;

/// Failure while producing a reply.
///
/// Never reaches end users: the selector logs it and answers with a fixed
/// apology instead.
#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("malformed analysis bundle: {0}")]
    MalformedAnalysis(String),

    #[error("template '{template}' has no value for placeholder '{placeholder}'")]
    Template {
        template: String,
        placeholder: String,
    },
}

impl From<serde_json::Error> for GenerationError {
    fn from(err: serde_json::Error) -> Self {
        GenerationError::MalformedAnalysis(err.to_string())
    }
}

/// Errors related to loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Read(String),

    #[error("failed to parse config: {0}")]
    Parse(String),
}
