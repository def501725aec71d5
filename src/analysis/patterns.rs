/// Recurring hazard patterns by cause category.
///
/// Groups normalized accident records by `cause_category` and grades each
/// category by frequency: severity band, trend, the states it was seen in,
/// and a predicted-risk heuristic.

use std::collections::HashMap;

use serde::Serialize;

use crate::analysis::AnalysisDepth;
use crate::logging::{self, Component};
use crate::model::AccidentRecord;
use crate::thresholds::{PatternSeverity, Trend};

/// Patterns returned per analysis, most frequent first.
pub const MAX_PATTERNS: usize = 10;

/// States reported per pattern.
pub const MAX_AFFECTED_REGIONS: usize = 5;

/// Multiplier applied to a category's share of all incidents.
pub const RISK_AMPLIFICATION: f64 = 5.0;

/// A recurring hazard pattern for one cause category.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CausePattern {
    /// `pattern-<category slug>`
    pub id: String,
    /// The cause category.
    #[serde(rename = "type")]
    pub cause_type: String,
    pub severity: PatternSeverity,
    pub description: String,
    /// Up to five distinct states. Treat as unordered.
    pub affected_regions: Vec<String>,
    pub frequency: usize,
    pub trend: Trend,
    /// Heuristic in [0, 100]; an amplified share of incidents, not a probability.
    pub predicted_risk: f64,
}

/// Per-category accumulator, kept in first-appearance order.
#[derive(Debug)]
struct CauseTally<'a> {
    cause: &'a str,
    frequency: usize,
    states: Vec<&'a str>,
}

fn tally_causes(records: &[AccidentRecord]) -> Vec<CauseTally<'_>> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut tallies: Vec<CauseTally> = Vec::new();

    for rec in records {
        let slot = *index.entry(rec.cause_category.as_str()).or_insert_with(|| {
            tallies.push(CauseTally {
                cause: rec.cause_category.as_str(),
                frequency: 0,
                states: Vec::new(),
            });
            tallies.len() - 1
        });

        let tally = &mut tallies[slot];
        tally.frequency += 1;
        if !tally.states.contains(&rec.state.as_str()) {
            tally.states.push(rec.state.as_str());
        }
    }

    tallies
}

/// `min(100, frequency / total * 100 * 5)`, or 0 when there are no incidents.
pub fn predicted_risk(frequency: usize, total_accidents: usize) -> f64 {
    if total_accidents == 0 {
        return 0.0;
    }
    let share = frequency as f64 / total_accidents as f64;
    (share * 100.0 * RISK_AMPLIFICATION).min(100.0)
}

/// Stable identifier for a category: lowercased, whitespace runs become `-`.
pub fn pattern_id(cause: &str) -> String {
    let slug = cause
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("-");
    format!("pattern-{}", slug)
}

fn describe(
    cause: &str,
    frequency: usize,
    state_count: usize,
    severity: PatternSeverity,
    depth: AnalysisDepth,
) -> String {
    let critical = severity == PatternSeverity::Critical;
    match depth {
        AnalysisDepth::Standard => format!(
            "{} incidents of {} identified across multiple regions. \
             Pattern analysis shows {} risk requiring attention.",
            frequency,
            cause,
            if critical { "immediate" } else { "ongoing" }
        ),
        AnalysisDepth::Deep => format!(
            "Deep analysis: {} incidents of {} across {} states. \
             AI prediction shows {} risk trajectory.",
            frequency,
            cause,
            state_count,
            if critical { "critical" } else { "elevated" }
        ),
    }
}

/// Builds the cause patterns for a record set.
///
/// The result is sorted by frequency, descending, ties in first-appearance
/// order, and holds at most `MAX_PATTERNS` entries. Trend classification
/// depends on `depth`: only deep analysis reports `Decreasing`.
pub fn aggregate_cause_patterns(
    records: &[AccidentRecord],
    depth: AnalysisDepth,
) -> Vec<CausePattern> {
    let total = records.len();

    let mut patterns: Vec<CausePattern> = tally_causes(records)
        .into_iter()
        .map(|tally| {
            let severity = PatternSeverity::from_frequency(tally.frequency);
            let trend = match depth {
                AnalysisDepth::Standard => Trend::standard(tally.frequency),
                AnalysisDepth::Deep => Trend::deep(tally.frequency),
            };

            CausePattern {
                id: pattern_id(tally.cause),
                cause_type: tally.cause.to_string(),
                severity,
                description: describe(
                    tally.cause,
                    tally.frequency,
                    tally.states.len(),
                    severity,
                    depth,
                ),
                affected_regions: tally
                    .states
                    .iter()
                    .take(MAX_AFFECTED_REGIONS)
                    .map(|s| s.to_string())
                    .collect(),
                frequency: tally.frequency,
                trend,
                predicted_risk: predicted_risk(tally.frequency, total),
            }
        })
        .collect();

    let categories = patterns.len();
    patterns.sort_by(|a, b| b.frequency.cmp(&a.frequency));
    patterns.truncate(MAX_PATTERNS);

    logging::debug(
        Component::Patterns,
        None,
        &format!(
            "{} categories over {} records, reporting {}",
            categories,
            total,
            patterns.len()
        ),
    );

    patterns
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
