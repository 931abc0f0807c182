//! Composite identifier splitting.
//!
//! ```text
//! "P1 - TypeA_Disease1_S_001"
//!  └┬┘   └─┬─┘ └──┬───┘ └─┬─┘
//!  probe  type  disease  sample id ("S 001")
//! ```

use crate::error::{IdentifierError, IdentifierResult};
use crate::models::ParsedIdentifier;

/// Separator between the probe name and the sample descriptor.
pub const PROBE_SEPARATOR: &str = " - ";

/// Separator between the descriptor parts.
pub const DESCRIPTOR_SEPARATOR: char = '_';

/// Minimum number of descriptor parts: type, disease state and a two-part sample ID.
pub const MIN_DESCRIPTOR_PARTS: usize = 4;

/// Split a composite identifier into probe, sample type, disease state and sample ID.
///
/// Only the first two `" - "` parts and the first four `_` parts are used;
/// anything after them is ignored.
///
/// # Example
/// ```
/// use expression_reformat::parse_identifier;
///
/// let parsed = parse_identifier("P1 - TypeA_Disease1_S_001").unwrap();
/// assert_eq!(parsed.probe, "P1");
/// assert_eq!(parsed.sample_id, "S 001");
/// ```
pub fn parse_identifier(identifier: &str) -> IdentifierResult<ParsedIdentifier> {
    let mut halves = identifier.split(PROBE_SEPARATOR);
    let probe = halves.next().unwrap_or_default();
    let descriptor = halves
        .next()
        .ok_or_else(|| IdentifierError::MissingSeparator(identifier.to_string()))?;

    let parts: Vec<&str> = descriptor.split(DESCRIPTOR_SEPARATOR).collect();
    if parts.len() < MIN_DESCRIPTOR_PARTS {
        return Err(IdentifierError::TooFewDescriptorParts {
            descriptor: descriptor.to_string(),
            found: parts.len(),
        });
    }

    Ok(ParsedIdentifier {
        probe: probe.to_string(),
        sample_type: parts[0].to_string(),
        disease_state: parts[1].to_string(),
        sample_id: format!("{} {}", parts[2], parts[3]),
    })
}
