//! Record Normalization Integration Tests
//!
//! Mixed-schema collections as they arrive from the data pipeline: fatal
//! reports, the historical register, malformed entries, and files on disk.

use std::io::Write;

use minesafe_service::model::{SchemaKind, UNKNOWN, Victims};
use minesafe_service::{
    EngineError, analyze_patterns, generate_audit_report, load_records, normalize_collection,
};
use serde_json::json;

fn mixed_collection() -> serde_json::Value {
    json!({
        "fatal_accidents_2005": [{
            "accident_number": "05-17",
            "mine_name": "Jitpur Colliery",
            "owner": "SAIL",
            "location": {"state": "Jharkhand", "district": "Dhanbad"},
            "date": "18/03/05",
            "time": "14:30",
            "cause_category": "Inundation",
            "cause_specific": "Inrush of water",
            "victims": [
                {"role": "Miner", "name": "R. Mahato", "age": 35},
                {"role": "Loader", "name": "S. Das", "age": "41"}
            ],
            "description": "Water inrush from old workings.",
            "avertable_factors": "Breach of Regulation 127"
        }],
        "major_accidents_1901_2015": [
            {"sl_no": 1, "mine_name": "Chasnala", "date": "27/12/75", "cause": "Inundation", "killed": 375},
            {"sl_no": 2, "mine_name": "Dhori", "date": "27/05/65", "cause": "Explosion", "killed": "268", "seriously_injured": 3}
        ],
        "corrupt": [42, {"victims": "many", "location": 7}]
    })
}

#[test]
fn test_two_digit_years_expand_with_pivot() {
    let records = normalize_collection(&mixed_collection()).expect("well formed");

    let years: Vec<Option<i32>> = records.iter().map(|r| r.date.map(|d| d.year)).collect();
    assert_eq!(years, vec![Some(2005), Some(1975), Some(1965), None, None]);
}

#[test]
fn test_fatal_record_fields() {
    let records = normalize_collection(&mixed_collection()).expect("well formed");
    let rec = &records[0];

    assert_eq!(rec.schema, SchemaKind::Fatal);
    assert_eq!(rec.state, "Jharkhand");
    assert_eq!(rec.district, "Dhanbad");
    assert_eq!(rec.cause_specific, "Inrush of water");
    assert_eq!(rec.victims.count(), 2);
    assert_eq!(rec.month_name(), "Mar");
    assert_eq!(rec.source_year_key, "fatal_accidents_2005");
}

#[test]
fn test_historical_records_keep_casualty_counts() {
    let records = normalize_collection(&mixed_collection()).expect("well formed");
    let dhori = &records[2];

    assert_eq!(dhori.schema, SchemaKind::Historical);
    assert_eq!(dhori.cause_category, UNKNOWN);
    assert_eq!(dhori.cause_specific, "Explosion");
    assert_eq!(dhori.state, UNKNOWN);
    assert_eq!(dhori.victims, Victims::Counted { killed: 268, seriously_injured: 3 });
}

#[test]
fn test_malformed_records_are_defaulted_not_dropped() {
    let records = normalize_collection(&mixed_collection()).expect("well formed");
    assert_eq!(records.len(), 5);

    let not_an_object = &records[3];
    assert_eq!(not_an_object.schema, SchemaKind::Unrecognized);
    assert_eq!(not_an_object.cause_category, UNKNOWN);
    assert_eq!(not_an_object.year_label(), UNKNOWN);
    assert_eq!(not_an_object.source_year_key, "corrupt");

    let mistyped = &records[4];
    assert_eq!(mistyped.schema, SchemaKind::Fatal);
    assert_eq!(mistyped.state, UNKNOWN);
    assert_eq!(mistyped.victims.count(), 0);
    assert_eq!(mistyped.source_year_key, "corrupt");
}

#[test]
fn test_bad_victim_fields_keep_accidents_in_their_district() {
    let collection = json!({
        "fatal_accidents_2015": [
            {"mine_name": "Bagdigi Colliery", "date": "04/03/15",
             "location": {"state": "Jharkhand", "district": "Dhanbad"},
             "cause_category": "Ground Movement", "victims": ["R. Kumar"]},
            {"mine_name": "Bagdigi Colliery", "date": "11/06/15",
             "location": {"state": "Jharkhand", "district": "Dhanbad"},
             "cause_category": "Ground Movement", "victims": 2},
            {"mine_name": "Bagdigi Colliery", "date": "19/09/15",
             "location": {"state": "Jharkhand", "district": "Dhanbad"},
             "cause_category": "Ground Movement", "victims": [{"age": {"years": 40}}]}
        ]
    });
    let records = normalize_collection(&collection).expect("well formed");
    assert!(records.iter().all(|r| r.schema == SchemaKind::Fatal));

    let analysis = analyze_patterns(&records);
    assert_eq!(analysis.patterns[0].cause_type, "Ground Movement");
    assert_eq!(analysis.patterns[0].frequency, 3);
    assert_eq!(analysis.clusters[0].region, "Dhanbad");
    assert!(
        analysis.clusters[0].recommendation.contains("geological surveys"),
        "got: {}",
        analysis.clusters[0].recommendation
    );

    let audit = generate_audit_report(&records, "2015", "Jharkhand");
    assert_eq!(audit.summary.total_accidents, 3);
}

#[test]
fn test_non_object_collection_is_an_error() {
    for input in [json!([1, 2]), json!("accidents"), json!(null)] {
        let result = normalize_collection(&input);
        assert!(
            matches!(result, Err(EngineError::MalformedCollection(_))),
            "{} should be rejected",
            input
        );
    }
}

#[test]
fn test_load_records_from_file() {
    let mut file = tempfile::NamedTempFile::new().expect("temp file");
    write!(file, "{}", mixed_collection()).expect("write collection");

    let records = load_records(file.path()).expect("file loads");
    assert_eq!(records.len(), 5);

    let value = serde_json::to_value(&records[1]).expect("serializable");
    assert_eq!(value["mineName"], "Chasnala");
    assert_eq!(value["victims"], json!({"kind": "counted", "killed": 375, "seriouslyInjured": 0}));
}

#[test]
fn test_load_records_reports_bad_files() {
    let dir = tempfile::tempdir().expect("temp dir");
    let missing = load_records(dir.path().join("none.json"));
    assert!(matches!(missing, Err(EngineError::Io(_))));

    let mut file = tempfile::NamedTempFile::new().expect("temp file");
    write!(file, "{{not json").expect("write");
    assert!(matches!(load_records(file.path()), Err(EngineError::Parse(_))));
}
