use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfError {
    #[error("Illegal query '{query}': {message}")]
    IllegalQuery { query: String, message: String, position: Option<usize> },
    #[error("Config index out of sync for {uuid}: {reason}")]
    OutOfSync { uuid: String, reason: String },
    #[error("Configuration access error: {0}")]
    ConfigurationAccess(String),
    #[error("Path index out of range: {from}..{to} of a path with {len} segments")]
    PathIndex { from: usize, to: usize, len: usize },
    #[error("Unbound template parameter: {0}")]
    UnboundParameter(String),
    #[error("Settings error: {0}")]
    Settings(String),
    #[error("Lock poisoned: {0}")]
    Lock(String),
}

impl ConfError {
    pub fn illegal_query(query: &str, message: impl Into<String>) -> Self {
        Self::IllegalQuery { query: query.to_string(), message: message.into(), position: None }
    }
}

pub type Result<T> = std::result::Result<T, ConfError>;

// Helper conversions
impl From<config::ConfigError> for ConfError {
    fn from(e: config::ConfigError) -> Self { Self::Settings(e.to_string()) }
}
impl From<serde_json::Error> for ConfError {
    fn from(e: serde_json::Error) -> Self { Self::ConfigurationAccess(e.to_string()) }
}
impl From<std::io::Error> for ConfError {
    fn from(e: std::io::Error) -> Self { Self::ConfigurationAccess(e.to_string()) }
}
