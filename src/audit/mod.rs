//! Compliance audit reporting.
//!
//! Submodules:
//! - `report`: period selection, findings, recommendations, compliance score.
//! - `regulations`: regulation citations scanned out of avertable-factor text.

pub mod regulations;
pub mod report;
