//! Weather Index Library
//!
//! In-memory indexes for historical weather observations, answering exact-date,
//! calendar-range and extreme-value queries per location.
//!
//! This library provides tools for:
//! - Keeping a location's observations sorted by date with binary-search lookup
//! - Keeping locations sorted by name and county with binary-search lookup
//! - Extracting observations by year or by year and month
//! - Averages and tie-preserving extremes that ignore missing readings
//! - Extreme-value queries across a whole collection, a county or one location
//! - Loading observations from delimited text files

pub mod config;
pub mod constants;

// Core application modules
pub mod app {
    pub mod models;
    pub mod services {
        pub mod comparators;
        pub mod loader;
        pub mod location_index;
        pub mod observation_index;
    }
}

// CLI modules
pub mod cli {
    pub mod args;
    pub mod commands;
}

// Re-export commonly used types
pub use app::models::{Location, Observation, TemperatureKind};
pub use app::services::comparators::{Comparator, DateComparator, LocationComparator};
pub use app::services::location_index::LocationIndex;
pub use app::services::observation_index::ObservationIndex;
pub use config::Config;

/// Result type alias for weather index operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for weather index operations
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// A required key field is empty or a date component is malformed
    #[error("Invalid argument: {message}")]
    InvalidArgument { message: String },

    /// An entry with the same key already exists in the target index
    #[error("Duplicate key: {key}")]
    DuplicateKey { key: String },

    /// A user-named entity does not exist
    #[error("Not found: {what}")]
    NotFound { what: String },

    /// I/O operation failed
    #[error("I/O error: {message}")]
    Io {
        message: String,
        #[source]
        source: std::io::Error,
    },

    /// CSV reading or writing error
    #[error("CSV error in '{file}': {message}")]
    Csv {
        file: String,
        message: String,
        #[source]
        source: Option<csv::Error>,
    },

    /// Configuration error
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    /// Output serialization error
    #[error("Serialization error: {message}")]
    Serialization { message: String },
}

impl Error {
    /// Create an invalid argument error
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            message: message.into(),
        }
    }

    /// Create a duplicate key error
    pub fn duplicate_key(key: impl Into<String>) -> Self {
        Self::DuplicateKey { key: key.into() }
    }

    /// Create a not found error
    pub fn not_found(what: impl Into<String>) -> Self {
        Self::NotFound { what: what.into() }
    }

    /// Create an I/O error with context
    pub fn io(message: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            message: message.into(),
            source,
        }
    }

    /// Create a CSV error with context
    pub fn csv(file: impl Into<String>, message: impl Into<String>, source: Option<csv::Error>) -> Self {
        Self::Csv {
            file: file.into(),
            message: message.into(),
            source,
        }
    }

    /// Create a configuration error
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Create a serialization error
    pub fn serialization(message: impl Into<String>) -> Self {
        Self::Serialization {
            message: message.into(),
        }
    }
}

// Automatic conversions from common error types
impl From<std::io::Error> for Error {
    fn from(error: std::io::Error) -> Self {
        Self::Io {
            message: "I/O operation failed".to_string(),
            source: error,
        }
    }
}

impl From<csv::Error> for Error {
    fn from(error: csv::Error) -> Self {
        Self::Csv {
            file: "unknown".to_string(),
            message: "CSV processing failed".to_string(),
            source: Some(error),
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(error: serde_json::Error) -> Self {
        Self::Serialization {
            message: error.to_string(),
        }
    }
}
