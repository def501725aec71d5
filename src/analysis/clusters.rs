/// Geographic risk clusters.
///
/// Groups accident records by district within a state, scores each region on
/// a linear scale that saturates at ten incidents, names its dominant
/// hazards, and attaches a rule-based recommendation (see `analysis::rules`).

use std::collections::HashMap;

use serde::Serialize;

use crate::analysis::AnalysisDepth;
use crate::analysis::rules::cluster_recommendation;
use crate::logging::{self, Component};
use crate::model::AccidentRecord;

/// Regions need more than this many accidents to be reported.
pub const CLUSTER_ACCIDENTS_ABOVE: usize = 2;

/// Clusters returned per analysis, highest risk first.
pub const MAX_CLUSTERS: usize = 10;

/// Hazards named per cluster.
pub const MAX_PRIMARY_HAZARDS: usize = 3;

/// Accident count at which the risk score reaches 100.
pub const RISK_SATURATION_COUNT: f64 = 10.0;

/// A district with a concentration of accidents.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RiskCluster {
    /// District name.
    pub region: String,
    pub state: String,
    /// Integer in [0, 100].
    pub risk_score: u32,
    /// At most three cause categories, most frequent in the region first.
    pub primary_hazards: Vec<String>,
    pub accident_count: usize,
    pub recommendation: String,
}

/// Grouping key for a region: `"{district}, {state}"`.
pub fn region_key(district: &str, state: &str) -> String {
    format!("{}, {}", district, state)
}

/// `min(100, count / 10 * 100)`, rounded to the nearest integer.
pub fn cluster_risk_score(accident_count: usize) -> u32 {
    let score = (accident_count as f64 / RISK_SATURATION_COUNT) * 100.0;
    score.min(100.0).round() as u32
}

/// Per-region accumulator, kept in first-appearance order.
#[derive(Debug)]
struct RegionTally<'a> {
    district: &'a str,
    state: &'a str,
    accident_count: usize,
    /// Distinct cause categories with their counts, in first-appearance order.
    hazards: Vec<(&'a str, usize)>,
}

impl<'a> RegionTally<'a> {
    fn record_hazard(&mut self, cause: &'a str) {
        match self.hazards.iter_mut().find(|(h, _)| *h == cause) {
            Some((_, count)) => *count += 1,
            None => self.hazards.push((cause, 1)),
        }
    }

    fn hazard_names(&self) -> Vec<&'a str> {
        self.hazards.iter().map(|(h, _)| *h).collect()
    }

    fn primary_hazards(&self) -> Vec<String> {
        let mut ranked = self.hazards.clone();
        ranked.sort_by(|a, b| b.1.cmp(&a.1));
        ranked
            .into_iter()
            .take(MAX_PRIMARY_HAZARDS)
            .map(|(h, _)| h.to_string())
            .collect()
    }
}

fn tally_regions(records: &[AccidentRecord]) -> Vec<RegionTally<'_>> {
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut regions: Vec<RegionTally> = Vec::new();

    for rec in records {
        let key = region_key(&rec.district, &rec.state);
        let slot = *index.entry(key).or_insert_with(|| {
            regions.push(RegionTally {
                district: rec.district.as_str(),
                state: rec.state.as_str(),
                accident_count: 0,
                hazards: Vec::new(),
            });
            regions.len() - 1
        });

        let region = &mut regions[slot];
        region.accident_count += 1;
        region.record_hazard(rec.cause_category.as_str());
    }

    regions
}

/// Builds the risk clusters for a record set.
///
/// Regions with `CLUSTER_ACCIDENTS_ABOVE` or fewer accidents are dropped. The
/// rest are sorted by risk score, descending, and capped at `MAX_CLUSTERS`.
/// The recommendation is chosen from every hazard seen in the region, not
/// only the reported primary hazards.
pub fn build_risk_clusters(records: &[AccidentRecord], depth: AnalysisDepth) -> Vec<RiskCluster> {
    let regions = tally_regions(records);
    let region_count = regions.len();

    let mut clusters: Vec<RiskCluster> = regions
        .iter()
        .filter(|r| r.accident_count > CLUSTER_ACCIDENTS_ABOVE)
        .map(|r| RiskCluster {
            region: r.district.to_string(),
            state: r.state.to_string(),
            risk_score: cluster_risk_score(r.accident_count),
            primary_hazards: r.primary_hazards(),
            accident_count: r.accident_count,
            recommendation: cluster_recommendation(&r.hazard_names(), depth).to_string(),
        })
        .collect();

    clusters.sort_by(|a, b| b.risk_score.cmp(&a.risk_score));
    clusters.truncate(MAX_CLUSTERS);

    logging::debug(
        Component::Clusters,
        None,
        &format!("{} regions, {} clusters reported", region_count, clusters.len()),
    );

    clusters
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
