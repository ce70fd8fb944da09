/*!
 * Error types for the openie-harvest application.
 *
 * This module contains custom error types for the different stages of the
 * pipeline, using the thiserror crate for ergonomic error definitions.
 */

use thiserror::Error;

/// Errors that can occur when talking to the remote API
#[derive(Error, Debug)]
pub enum FetchError {
    /// The request could not be sent or the connection failed
    #[error("API request failed: {0}")]
    RequestFailed(String),

    /// The response body was not valid JSON or had an unexpected shape
    #[error("Failed to parse API response: {0}")]
    ParseError(String),

    /// The API answered with a non-success `code` field in its payload
    #[error("API responded with code {code} while {context}")]
    ApiError {
        /// Code embedded in the response payload
        code: i64,
        /// What the client was doing when the API refused
        context: String,
    },

    /// Every attempt allowed by the retry policy failed
    #[error("Request failed after {attempts} attempts: {last_error}")]
    RetriesExhausted {
        /// Number of attempts made
        attempts: u32,
        /// Message of the final failure
        last_error: String,
    },
}

/// Errors raised while turning raw records into OpenIE documents
#[derive(Error, Debug, PartialEq, Eq)]
pub enum TransformError {
    /// A tag code is not present in the dictionary
    #[error("Unknown tag code '{0}'")]
    UnknownTag(String),

    /// A tag code maps to an empty label
    #[error("Tag code '{0}' maps to an empty label")]
    EmptyLabel(String),
}

/// Errors raised while writing output files
#[derive(Error, Debug)]
pub enum OutputError {
    /// Filesystem failure
    #[error("I/O error on {path}: {message}")]
    Io {
        /// File or directory involved
        path: String,
        /// Underlying error message
        message: String,
    },

    /// JSON serialization or deserialization failure
    #[error("JSON error on {path}: {message}")]
    Json {
        /// File involved
        path: String,
        /// Underlying error message
        message: String,
    },
}

/// Main application error type that wraps all other errors
#[derive(Error, Debug)]
pub enum AppError {
    /// Error from the remote API
    #[error("Fetch error: {0}")]
    Fetch(#[from] FetchError),

    /// Error from record transformation
    #[error("Transform error: {0}")]
    Transform(#[from] TransformError),

    /// Error from writing output
    #[error("Output error: {0}")]
    Output(#[from] OutputError),

    /// Invalid user input or configuration
    #[error("Input error: {0}")]
    Input(String),

    /// The user interrupted the run before it completed
    #[error("Interrupted")]
    Interrupted,

    /// Any other error
    #[error("Unknown error: {0}")]
    Unknown(String),
}

impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        Self::Unknown(error.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(error: std::io::Error) -> Self {
        Self::Output(OutputError::Io {
            path: String::from("<unknown>"),
            message: error.to_string(),
        })
    }
}
