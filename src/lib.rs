//! Hazard analytics and compliance auditing over mining-accident records.
//!
//! Accident collections arrive as a JSON object of year buckets, each a list
//! of records in either the fatal-accident or the historical-register schema.
//! `ingest` normalizes them into `AccidentRecord`s; `analysis` finds recurring
//! hazard patterns and geographic risk clusters; `audit` produces compliance
//! reports for a year and state.

pub mod analysis;
pub mod audit;
pub mod config;
pub mod ingest;
pub mod logging;
pub mod model;
pub mod search;
pub mod thresholds;
pub mod verify;

pub use analysis::{AnalysisDepth, HazardAnalysis, analyze_patterns, deep_analyze_patterns};
pub use audit::report::{AuditReport, generate_audit_report};
pub use ingest::accidents::{load_records, normalize_collection};
pub use model::{AccidentRecord, EngineError};
