//! Error types for configuration loading and design resolution.

use socgen_common::ParseVlnvError;

/// Errors that can occur when loading or validating a tool configuration or design.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// An I/O error occurred while reading a configuration file.
    #[error("failed to read configuration: {0}")]
    IoError(#[from] std::io::Error),

    /// The JSON or TOML content could not be parsed.
    #[error("failed to parse configuration: {0}")]
    ParseError(String),

    /// A required field is missing or empty.
    #[error("missing required field: {0}")]
    MissingField(String),

    /// A configuration value failed validation.
    #[error("validation error: {0}")]
    ValidationError(String),

    /// Two IP instances or block design cells share a module name.
    #[error("duplicate instance name '{0}'")]
    DuplicateInstance(String),

    /// Two source files would be copied to the same name in the output directory.
    #[error("duplicate source file name '{0}'")]
    DuplicateFileName(String),

    /// A block design cell carries a malformed VLNV.
    #[error("cell '{cell}': {source}")]
    InvalidVlnv {
        /// The module name of the offending cell.
        cell: String,
        /// The underlying parse error.
        source: ParseVlnvError,
    },
}
