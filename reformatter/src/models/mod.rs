//! Domain models for the reformatter.
//!
//! - [`InputRow`] - raw fields of one input row, quote-stripped
//! - [`ParsedIdentifier`] - the pieces of a composite identifier
//! - [`OutputRow`] - one row of the reformatted table
//! - [`OUTPUT_HEADER`] - the fixed output column names

use serde::{Deserialize, Serialize};

use crate::error::RowError;
use crate::transform::identifier::parse_identifier;

/// Column names of the output table, in output order.
pub const OUTPUT_HEADER: [&str; 5] = [
    "Probe",
    "Sample_Type",
    "Disease_State",
    "Sample_ID",
    "Expression_Value",
];

// =============================================================================
// Input
// =============================================================================

/// One row read from the input file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputRow {
    /// 1-based position of the row in the input (the header is row 1).
    pub row: usize,
    /// Field values after quote stripping; empty for a blank line.
    pub fields: Vec<String>,
}

impl InputRow {
    pub fn new(row: usize, fields: Vec<String>) -> Self {
        Self { row, fields }
    }

    /// The composite identifier (field 0).
    pub fn identifier(&self) -> Option<&str> {
        self.fields.first().map(String::as_str)
    }

    /// The expression value (field 1), passed through as text.
    pub fn value(&self) -> Option<&str> {
        self.fields.get(1).map(String::as_str)
    }
}

// =============================================================================
// Identifier
// =============================================================================

/// A composite identifier split into its parts.
///
/// `"P1 - TypeA_Disease1_S_001"` becomes probe `P1`, sample type `TypeA`,
/// disease state `Disease1` and sample ID `S 001`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedIdentifier {
    pub probe: String,
    pub sample_type: String,
    pub disease_state: String,
    pub sample_id: String,
}

// =============================================================================
// Output
// =============================================================================

/// One row of the reformatted table.
///
/// Serializes with the output column names so JSON previews line up with
/// the CSV header.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputRow {
    #[serde(rename = "Probe")]
    pub probe: String,
    #[serde(rename = "Sample_Type")]
    pub sample_type: String,
    #[serde(rename = "Disease_State")]
    pub disease_state: String,
    #[serde(rename = "Sample_ID")]
    pub sample_id: String,
    #[serde(rename = "Expression_Value")]
    pub expression_value: String,
}

impl OutputRow {
    /// Derive the output row for a data row.
    ///
    /// Fields beyond the second are ignored.
    pub fn from_input(input: &InputRow) -> Result<Self, RowError> {
        let (identifier, value) = match (input.identifier(), input.value()) {
            (Some(identifier), Some(value)) => (identifier, value),
            _ => {
                return Err(RowError::TooFewFields {
                    row: input.row,
                    found: input.fields.len(),
                })
            }
        };

        let parsed = parse_identifier(identifier).map_err(|source| RowError::Identifier {
            row: input.row,
            source,
        })?;

        Ok(Self::from_parts(parsed, value))
    }

    pub fn from_parts(parsed: ParsedIdentifier, expression_value: impl Into<String>) -> Self {
        Self {
            probe: parsed.probe,
            sample_type: parsed.sample_type,
            disease_state: parsed.disease_state,
            sample_id: parsed.sample_id,
            expression_value: expression_value.into(),
        }
    }

    /// Field values in [`OUTPUT_HEADER`] order.
    pub fn as_record(&self) -> [&str; 5] {
        [
            self.probe.as_str(),
            self.sample_type.as_str(),
            self.disease_state.as_str(),
            self.sample_id.as_str(),
            self.expression_value.as_str(),
        ]
    }
}
