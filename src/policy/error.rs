use thiserror::Error;

/// Failure to read a policy value coming from a request or the environment.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("unknown content type: {0}")]
    ContentType(String),
    #[error("unknown visibility status: {0}")]
    Visibility(String),
    #[error("unknown application case: {0}")]
    ApplicationCase(String),
    #[error("unknown content filter level: {0}")]
    ContentFilterLevel(String),
}
