//! Error types for flowerengine.
//!
//! Fetch-stage failures are terminal and carry the account they were raised
//! for. "Nothing to recommend" outcomes of the selector are not errors and
//! live in [`crate::selector`].

use thiserror::Error;

/// Failure reported by an [`crate::AccountLookup`] implementation.
#[derive(Error, Debug)]
pub enum LookupError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("RPC error from {endpoint} (code {code}): {message}")]
    Rpc {
        endpoint: String,
        code: i64,
        message: String,
    },

    #[error("Invalid response from {endpoint}: {reason}")]
    InvalidResponse { endpoint: String, reason: String },

    #[error("No Hive API endpoints configured")]
    NoEndpoints,

    #[error("Lookup unavailable: {0}")]
    Unavailable(String),
}

/// Failure while fetching and validating a node metadata document.
#[derive(Error, Debug)]
pub enum MetadataError {
    #[error("Account @{account} not found")]
    AccountNotFound { account: String },

    #[error("Account @{account} has no JSON metadata")]
    EmptyMetadata { account: String },

    #[error("Malformed JSON metadata on @{account}: {source}")]
    MalformedMetadata {
        account: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid metadata structure on @{account}: '{field}' {reason}")]
    InvalidMetadataShape {
        account: String,
        field: &'static str,
        reason: String,
    },

    #[error("Account lookup failed for @{account}: {source}")]
    Lookup {
        account: String,
        #[source]
        source: LookupError,
    },
}

impl MetadataError {
    /// Account the failure was raised for
    pub fn account(&self) -> &str {
        match self {
            MetadataError::AccountNotFound { account }
            | MetadataError::EmptyMetadata { account }
            | MetadataError::MalformedMetadata { account, .. }
            | MetadataError::InvalidMetadataShape { account, .. }
            | MetadataError::Lookup { account, .. } => account,
        }
    }

    /// Stage of the fetch pipeline that failed
    pub fn stage(&self) -> &'static str {
        match self {
            MetadataError::AccountNotFound { .. }
            | MetadataError::EmptyMetadata { .. }
            | MetadataError::Lookup { .. } => "lookup",
            MetadataError::MalformedMetadata { .. } => "parse",
            MetadataError::InvalidMetadataShape { .. } => "validate",
        }
    }

    /// Stable machine-readable kind
    pub fn kind(&self) -> &'static str {
        match self {
            MetadataError::AccountNotFound { .. } => "account_not_found",
            MetadataError::EmptyMetadata { .. } => "empty_metadata",
            MetadataError::MalformedMetadata { .. } => "malformed_metadata",
            MetadataError::InvalidMetadataShape { .. } => "invalid_metadata_shape",
            MetadataError::Lookup { .. } => "lookup_failed",
        }
    }
}

/// Failure while querying a selected Hive-Engine node.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Engine node returned HTTP {0}")]
    Status(u16),

    #[error("RPC error from engine node: {0}")]
    Rpc(String),

    #[error("Invalid engine response: {0}")]
    InvalidResponse(#[from] serde_json::Error),
}

/// Failure while reading the configuration file.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: toml::de::Error,
    },
}
