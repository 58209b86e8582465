use thiserror::Error;

use crate::store::StoreError;

#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("Invalid parameter reference '{0}'")]
    InvalidReference(String),
    #[error("Parameter store request failed: {0}")]
    Store(#[from] StoreError),
    #[error("The following parameter(s) cannot be resolved: {}", .0.join(","))]
    NotFound(Vec<String>),
    #[error("Parameter reference prefix does not match parameter type: {}", .0.join("; "))]
    PolicyViolation(Vec<String>),
    #[error("Secure parameter references are not allowed: {}", .0.join(","))]
    SecureReferencesRejected(Vec<String>),
    #[error(transparent)]
    Input(#[from] InputError),
}

#[derive(Debug, Error)]
pub enum InputError {
    #[error("Input file name is not provided")]
    MissingInputFile,
    #[error("Output file name is not provided")]
    MissingOutputFile,
    #[error("Failed to read file '{path}': {source}")]
    Unreadable {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("File '{path}' is too large: {size} bytes exceeds the limit of {limit} bytes")]
    TooLarge { path: String, size: u64, limit: u64 },
    #[error("Failed to write file '{path}': {source}")]
    Unwritable {
        path: String,
        #[source]
        source: std::io::Error,
    },
}
