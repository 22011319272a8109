use thiserror::Error;

pub type Result<T> = std::result::Result<T, ImporterError>;

#[derive(Error, Debug)]
pub enum ImporterError {
    #[error("HTTP request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("HTTP error {status}: {url}")]
    HttpStatus {
        status: reqwest::StatusCode,
        url: String,
    },

    #[error("Failed to parse JSON: {0}")]
    ParseError(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Malformed input: {0}")]
    MalformedInput(String),

    #[error("Cannot parse couple names from '{fragment}'")]
    NameParse { fragment: String },

    #[error("group not found: {0}")]
    GroupNotFound(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("failed to {action} from {provider} {context}: {source}")]
    Provider {
        action: String,
        provider: String,
        context: String,
        #[source]
        source: Box<ImporterError>,
    },
}

impl ImporterError {
    /// Wraps `self` with the operation prefix surfaced to callers.
    pub fn within(
        self,
        action: impl Into<String>,
        provider: impl Into<String>,
        context: impl Into<String>,
    ) -> Self {
        Self::Provider {
            action: action.into(),
            provider: provider.into(),
            context: context.into(),
            source: Box::new(self),
        }
    }

    /// Tags a malformed-input failure with where it happened.
    pub fn malformed(context: impl std::fmt::Display, cause: impl std::fmt::Display) -> Self {
        Self::MalformedInput(format!("{}: {}", context, cause))
    }

    pub fn is_not_found(&self) -> bool {
        match self {
            Self::GroupNotFound(_) => true,
            Self::Provider { source, .. } => source.is_not_found(),
            _ => false,
        }
    }
}
