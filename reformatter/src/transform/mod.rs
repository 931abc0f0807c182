//! Transformation module.
//!
//! - Identifier: composite identifier splitting
//! - Pipeline: read, derive and write a whole dataset

pub mod identifier;
pub mod pipeline;

pub use identifier::parse_identifier;
pub use pipeline::*;
