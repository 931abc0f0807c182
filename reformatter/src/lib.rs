//! # Expression Reformat - flatten composite probe/sample identifiers
//!
//! Expression datasets exported as `"<probe> - <type>_<disease>_<id1>_<id2>",<value>`
//! rows are rewritten into a flat five-column table.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//! │  CSV File   │────▶│   Parser    │────▶│  Identifier │────▶│  CSV Output │
//! │  (ISO/UTF8) │     │ (de-quote)  │     │   (split)   │     │ (5 columns) │
//! └─────────────┘     └─────────────┘     └─────────────┘     └─────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use expression_reformat::{reformat_file, ReformatOptions};
//!
//! let summary = reformat_file(&ReformatOptions::new("many_example.csv", "test_many.tsv")).unwrap();
//! println!("Wrote {} rows", summary.rows_written);
//! ```
//!
//! ## Modules
//!
//! - [`error`] - Hierarchical error types
//! - [`models`] - Input, identifier and output rows
//! - [`parser`] - Decoding, quote stripping and row reading
//! - [`transform`] - Identifier splitting and the pipeline
//! - [`logs`] - Leveled progress logging

// Core modules
pub mod error;
pub mod models;

// Parsing
pub mod parser;

// Transformation
pub mod transform;

// Logging
pub mod logs;

// =============================================================================
// Re-exports - Error types
// =============================================================================

pub use error::{IdentifierError, ParseError, ReformatError, RowError};

// =============================================================================
// Re-exports - Models
// =============================================================================

pub use models::{InputRow, OutputRow, ParsedIdentifier, OUTPUT_HEADER};

// =============================================================================
// Re-exports - Parsing
// =============================================================================

pub use parser::{
    decode_content,
    decode_input,
    detect_encoding,
    read_rows,
    strip_quotes,
    DecodedInput,
    QuoteStrip,
    Rows,
};

// =============================================================================
// Re-exports - Pipeline
// =============================================================================

pub use transform::{
    parse_file,
    parse_identifier,
    reformat,
    reformat_file,
    ReformatOptions,
    ReformatSummary,
};
