/// Hazard analysis over normalized accident records.
///
/// Every function here is a pure transformation of its input records: no
/// caching, no shared state, safe to call concurrently.
///
/// Submodules:
/// - `patterns`: recurring hazard patterns by cause category.
/// - `clusters`: geographic risk clusters by district and state.
/// - `rules`: keyword-ordered recommendation tables.
/// - `stats`: dashboard statistics with year/state filters.

pub mod clusters;
pub mod patterns;
pub mod rules;
pub mod stats;

use serde::Serialize;

use crate::logging::{self, Component};
use crate::model::AccidentRecord;

use clusters::{RiskCluster, build_risk_clusters};
use patterns::{CausePattern, aggregate_cause_patterns};

/// How thorough an analysis pass is.
///
/// Deep analysis uses richer narrative text, urgent recommendation wording,
/// and is the only depth that classifies a pattern as `Decreasing`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AnalysisDepth {
    Standard,
    Deep,
}

/// Result of one hazard analysis pass.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HazardAnalysis {
    pub patterns: Vec<CausePattern>,
    pub clusters: Vec<RiskCluster>,
}

/// Runs pattern aggregation and cluster building at the given depth.
pub fn analyze(records: &[AccidentRecord], depth: AnalysisDepth) -> HazardAnalysis {
    let analysis = HazardAnalysis {
        patterns: aggregate_cause_patterns(records, depth),
        clusters: build_risk_clusters(records, depth),
    };

    logging::info(
        Component::Patterns,
        None,
        &format!(
            "{:?} analysis of {} records: {} patterns, {} clusters",
            depth,
            records.len(),
            analysis.patterns.len(),
            analysis.clusters.len()
        ),
    );

    analysis
}

/// Standard-depth hazard analysis.
pub fn analyze_patterns(records: &[AccidentRecord]) -> HazardAnalysis {
    analyze(records, AnalysisDepth::Standard)
}

/// Deep hazard analysis.
pub fn deep_analyze_patterns(records: &[AccidentRecord]) -> HazardAnalysis {
    analyze(records, AnalysisDepth::Deep)
}
