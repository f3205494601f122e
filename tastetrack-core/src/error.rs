use std::fmt;

use thiserror::Error;

use crate::parse::ExpectedShape;

/// The external collaborators the core talks to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Service {
    Weather,
    LanguageModel,
    Fitness,
}

impl fmt::Display for Service {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Service::Weather => "weather service",
            Service::LanguageModel => "language model",
            Service::Fitness => "fitness service",
        };
        f.write_str(name)
    }
}

/// Model output could not be coerced into the expected shape.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FormatError {
    #[error("No JSON {0} found in model response")]
    NoSpan(ExpectedShape),

    #[error("Invalid JSON {shape} in model response: {message}")]
    InvalidJson {
        shape: ExpectedShape,
        message: String,
    },

    #[error("Model response contained no usable recipes")]
    NoRecipes,
}

/// Network, timeout or authorization failure from a collaborator.
#[derive(Error, Debug)]
pub enum ExternalCallError {
    #[error("{service} request failed: {message}")]
    Request { service: Service, message: String },

    #[error("{service} request timed out")]
    Timeout { service: Service },

    #[error("{service} rejected credentials: {message}")]
    Unauthorized { service: Service, message: String },

    #[error("{service} returned error: {status} - {message}")]
    Status {
        service: Service,
        status: u16,
        message: String,
    },

    #[error("{service} response could not be read: {message}")]
    InvalidResponse { service: Service, message: String },

    #[error("{service} is not configured: {message}")]
    NotConfigured { service: Service, message: String },
}

impl ExternalCallError {
    /// Classify a reqwest error for the given service.
    pub fn from_reqwest(service: Service, err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ExternalCallError::Timeout { service }
        } else if err.is_decode() {
            ExternalCallError::InvalidResponse {
                service,
                message: err.to_string(),
            }
        } else {
            ExternalCallError::Request {
                service,
                message: err.to_string(),
            }
        }
    }

    /// Map a non-success HTTP status to the matching variant.
    pub fn from_status(service: Service, status: u16, message: String) -> Self {
        match status {
            401 | 403 => ExternalCallError::Unauthorized { service, message },
            _ => ExternalCallError::Status {
                service,
                status,
                message,
            },
        }
    }

    pub fn service(&self) -> Service {
        match self {
            ExternalCallError::Request { service, .. }
            | ExternalCallError::Timeout { service }
            | ExternalCallError::Unauthorized { service, .. }
            | ExternalCallError::Status { service, .. }
            | ExternalCallError::InvalidResponse { service, .. }
            | ExternalCallError::NotConfigured { service, .. } => *service,
        }
    }
}

/// Why an enrichment attempt was discarded.
///
/// Never surfaced past [`crate::enrich::enrich_or_keep`].
#[derive(Error, Debug)]
pub enum EnrichmentFailure {
    #[error("Enrichment call failed: {0}")]
    Call(#[from] ExternalCallError),

    #[error("Enrichment response unparseable: {0}")]
    Format(#[from] FormatError),

    #[error("Enrichment response has wrong shape: {0}")]
    MalformedShape(String),
}

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(String),

    #[error("Connection pool error: {0}")]
    Pool(String),

    #[error("Stored list is not valid JSON: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Store lock poisoned")]
    Poisoned,
}

#[derive(Error, Debug)]
pub enum LedgerError {
    #[error("Vote ledger I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("Vote ledger row invalid: {0}")]
    Csv(#[from] csv::Error),

    #[error("Vote ledger lock poisoned")]
    Poisoned,
}

/// Errors from the suggestion flows.
#[derive(Error, Debug)]
pub enum SuggestError {
    #[error("Select or enter a mood")]
    EmptyMood,

    #[error(transparent)]
    Format(#[from] FormatError),

    #[error(transparent)]
    External(#[from] ExternalCallError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("Invalid value for {name}: {value}")]
    InvalidValue { name: String, value: String },
}
