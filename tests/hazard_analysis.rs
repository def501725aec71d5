//! Hazard Analysis Integration Tests
//!
//! Runs raw year-bucket collections through normalization and both analysis
//! depths, checking the pattern and cluster contracts end to end.

use minesafe_service::analysis::{AnalysisDepth, analyze};
use minesafe_service::{analyze_patterns, deep_analyze_patterns, normalize_collection};
use serde_json::{Value, json};

fn accident(state: &str, district: &str, cause: &str) -> Value {
    json!({
        "accident_number": "1",
        "mine_name": format!("{} Colliery", district),
        "date": "14/02/15",
        "location": {"state": state, "district": district},
        "cause_category": cause,
        "victims": [{"name": "A", "role": "Miner", "age": "40"}]
    })
}

fn accidents(state: &str, district: &str, cause: &str, n: usize) -> Vec<Value> {
    (0..n).map(|_| accident(state, district, cause)).collect()
}

/// 100 records, 25 of them Ground Movement spread over three states.
fn hundred_accidents() -> Value {
    let mut records = Vec::new();
    for (i, state) in ["Jharkhand", "Odisha", "Chhattisgarh"].iter().cycle().take(25).enumerate() {
        records.push(accident(state, &format!("District {}", i % 4), "Ground Movement"));
    }
    records.extend(accidents("Telangana", "Karimnagar", "Machinery", 20));
    records.extend(accidents("Telangana", "Karimnagar", "Transport", 20));
    records.extend(accidents("West Bengal", "Asansol", "Electrical", 15));
    records.extend(accidents("Madhya Pradesh", "Shahdol", "Explosives", 10));
    records.extend(accidents("Maharashtra", "Nagpur", "Fall of Persons", 10));
    json!({ "fatal_accidents_2015": records })
}

#[test]
fn test_dominant_category_is_critical_with_capped_risk() {
    let records = normalize_collection(&hundred_accidents()).expect("collection is well formed");
    assert_eq!(records.len(), 100);

    let analysis = analyze_patterns(&records);
    let top = &analysis.patterns[0];
    assert_eq!(top.cause_type, "Ground Movement");
    assert_eq!(top.frequency, 25);
    assert_eq!(top.severity.as_str(), "critical");
    assert_eq!(top.predicted_risk, 100.0, "25% share amplified 5x caps at 100");
    assert_eq!(top.affected_regions.len(), 3);
}

#[test]
fn test_exactly_twenty_is_high_not_critical() {
    let records = normalize_collection(&hundred_accidents()).expect("collection is well formed");
    let analysis = analyze_patterns(&records);

    let machinery = analysis
        .patterns
        .iter()
        .find(|p| p.cause_type == "Machinery")
        .expect("machinery pattern present");
    assert_eq!(machinery.frequency, 20);
    assert_eq!(machinery.severity.as_str(), "high");
    assert_eq!(machinery.predicted_risk, 100.0);

    let explosives = analysis
        .patterns
        .iter()
        .find(|p| p.cause_type == "Explosives")
        .expect("explosives pattern present");
    assert_eq!(explosives.severity.as_str(), "medium");
    assert_eq!(explosives.predicted_risk, 50.0);
}

#[test]
fn test_patterns_sorted_and_bounded() {
    let mut records = Vec::new();
    for i in 0..14 {
        records.extend(accidents("Odisha", "Talcher", &format!("Cause {}", i), i + 1));
    }
    let records = normalize_collection(&json!({ "2016": records })).expect("well formed");

    for depth in [AnalysisDepth::Standard, AnalysisDepth::Deep] {
        let analysis = analyze(&records, depth);
        assert_eq!(analysis.patterns.len(), 10, "{:?} patterns capped at 10", depth);
        assert!(
            analysis.patterns.windows(2).all(|w| w[0].frequency >= w[1].frequency),
            "{:?} patterns must be sorted by frequency",
            depth
        );
        assert!(analysis.patterns.iter().all(|p| (0.0..=100.0).contains(&p.predicted_risk)));
        assert_eq!(analysis.patterns[0].cause_type, "Cause 13");
    }
}

#[test]
fn test_three_accident_district_forms_cluster() {
    let mut records = accidents("Jharkhand", "Dhanbad", "Ground Movement", 2);
    records.push(accident("Jharkhand", "Dhanbad", "Machinery"));
    records.extend(accidents("Jharkhand", "Bokaro", "Ground Movement", 2));
    let records = normalize_collection(&json!({ "2015": records })).expect("well formed");

    let analysis = analyze_patterns(&records);
    assert_eq!(analysis.clusters.len(), 1, "two-accident districts are not clusters");

    let cluster = &analysis.clusters[0];
    assert_eq!(cluster.region, "Dhanbad");
    assert_eq!(cluster.state, "Jharkhand");
    assert_eq!(cluster.accident_count, 3);
    assert_eq!(cluster.risk_score, 30);
    assert_eq!(cluster.primary_hazards, vec!["Ground Movement", "Machinery"]);
    assert!(
        cluster.recommendation.contains("geological surveys"),
        "got: {}",
        cluster.recommendation
    );

    let deep = deep_analyze_patterns(&records);
    assert!(deep.clusters[0].recommendation.starts_with("URGENT"));
}

#[test]
fn test_clusters_sorted_and_bounded() {
    let mut records = Vec::new();
    for i in 0..15 {
        records.extend(accidents("Chhattisgarh", &format!("District {}", i), "Transport", 3 + i));
    }
    let records = normalize_collection(&json!({ "2017": records })).expect("well formed");

    let clusters = analyze_patterns(&records).clusters;
    assert_eq!(clusters.len(), 10);
    assert!(clusters.iter().all(|c| c.accident_count > 2 && c.risk_score <= 100));
    assert!(clusters.windows(2).all(|w| w[0].risk_score >= w[1].risk_score));
    assert_eq!(clusters[0].risk_score, 100);
}

#[test]
fn test_only_deep_analysis_reports_decreasing() {
    let records =
        normalize_collection(&json!({ "2015": accidents("Goa", "North Goa", "Inundation", 3) }))
            .expect("well formed");

    let standard = serde_json::to_value(analyze_patterns(&records)).expect("serializable");
    let deep = serde_json::to_value(deep_analyze_patterns(&records)).expect("serializable");

    assert_eq!(standard["patterns"][0]["trend"], "stable");
    assert_eq!(deep["patterns"][0]["trend"], "decreasing");
    assert!(
        deep["patterns"][0]["description"]
            .as_str()
            .unwrap_or_default()
            .starts_with("Deep analysis: 3 incidents of Inundation across 1 states."),
        "got: {}",
        deep["patterns"][0]["description"]
    );
}

#[test]
fn test_serialized_pattern_shape() {
    let records =
        normalize_collection(&json!({ "2015": accidents("Odisha", "Talcher", "Roof Fall", 6) }))
            .expect("well formed");
    let value = serde_json::to_value(analyze_patterns(&records)).expect("serializable");
    let pattern = &value["patterns"][0];

    assert_eq!(pattern["id"], "pattern-roof-fall");
    assert_eq!(pattern["type"], "Roof Fall");
    assert_eq!(pattern["severity"], "medium");
    assert_eq!(pattern["affectedRegions"], json!(["Odisha"]));
    assert_eq!(pattern["predictedRisk"], 100.0);
    assert_eq!(value["clusters"][0]["riskScore"], 60);
    assert_eq!(value["clusters"][0]["primaryHazards"], json!(["Roof Fall"]));
}

#[test]
fn test_analysis_is_idempotent() {
    let collection = hundred_accidents();
    let first = normalize_collection(&collection).expect("well formed");
    let second = normalize_collection(&collection).expect("well formed");
    assert_eq!(first, second);
    assert_eq!(analyze_patterns(&first), analyze_patterns(&second));
    assert_eq!(deep_analyze_patterns(&first), deep_analyze_patterns(&first));
}

#[test]
fn test_empty_collection_yields_empty_analysis() {
    let records = normalize_collection(&json!({})).expect("empty object is valid");
    let analysis = deep_analyze_patterns(&records);
    assert!(analysis.patterns.is_empty());
    assert!(analysis.clusters.is_empty());
}
