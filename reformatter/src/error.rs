//! Error types for the expression reformatter.
//!
//! The hierarchy mirrors the stages of a run:
//!
//! - [`IdentifierError`] - a composite identifier does not have the expected shape
//! - [`RowError`] - an input row cannot be turned into an output row
//! - [`ParseError`] - the input cannot be decoded or read as CSV
//! - [`ReformatError`] - top-level errors returned by the pipeline
//!
//! Conversion is automatic via `From` implementations, so `?` works across
//! stage boundaries.

use std::path::PathBuf;

use thiserror::Error;

// =============================================================================
// Identifier Errors
// =============================================================================

/// Errors while splitting a composite identifier.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IdentifierError {
    /// The identifier has no `" - "` between probe and descriptor.
    #[error("identifier '{0}' has no \" - \" separator")]
    MissingSeparator(String),

    /// The descriptor splits into fewer than four `_` parts.
    #[error("descriptor '{descriptor}' has {found} '_'-delimited parts, expected at least 4")]
    TooFewDescriptorParts { descriptor: String, found: usize },
}

// =============================================================================
// Row Errors
// =============================================================================

/// Errors while deriving an output row from an input row.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RowError {
    /// The row does not carry an identifier and a value.
    #[error("Row {row}: expected at least 2 fields, found {found}")]
    TooFewFields { row: usize, found: usize },

    /// The identifier field is malformed.
    #[error("Row {row}: {source}")]
    Identifier {
        row: usize,
        #[source]
        source: IdentifierError,
    },
}

// =============================================================================
// Parse Errors
// =============================================================================

/// Errors while decoding and tokenizing the input.
#[derive(Debug, Error)]
pub enum ParseError {
    /// Failed to read the input stream.
    #[error("Failed to read input: {0}")]
    Io(#[from] std::io::Error),

    /// The CSV reader rejected a record.
    #[error("Invalid CSV: {0}")]
    Csv(#[from] csv::Error),

    /// An explicitly requested encoding is not known.
    #[error("Unsupported encoding: {0}")]
    Encoding(String),
}

// =============================================================================
// Reformat Errors (top-level)
// =============================================================================

/// Top-level errors returned by [`crate::transform::pipeline::reformat_file`].
#[derive(Debug, Error)]
pub enum ReformatError {
    /// The input file cannot be opened.
    #[error("Cannot read input '{}': {source}", .path.display())]
    Input {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The output file cannot be created.
    #[error("Cannot write output '{}': {source}", .path.display())]
    Output {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Decoding or CSV error on the input side.
    #[error("Parse error: {0}")]
    Parse(#[from] ParseError),

    /// A data row is malformed; the run stops here.
    #[error("Malformed input: {0}")]
    Row(#[from] RowError),

    /// A record could not be written.
    #[error("Write error: {0}")]
    Write(#[source] csv::Error),

    /// Buffered output could not be flushed.
    #[error("Flush error: {0}")]
    Flush(#[source] std::io::Error),
}

// =============================================================================
// Result Type Aliases
// =============================================================================

/// Result type for identifier parsing.
pub type IdentifierResult<T> = Result<T, IdentifierError>;

/// Result type for input parsing.
pub type ParseResult<T> = Result<T, ParseError>;

/// Result type for pipeline operations.
pub type ReformatResult<T> = Result<T, ReformatError>;
