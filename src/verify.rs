//! Dataset Verification Module
//!
//! Checks an accident collection bucket by bucket before it is handed to the
//! analysis pipeline: which schemas each bucket uses, how many records had to
//! be defaulted, and whether the bucket is usable at all.
//!
//! Run this against a new data drop before trusting its analysis output.

use chrono::Utc;
use serde::Serialize;
use serde_json::Value;

use crate::ingest::accidents::{json_kind, normalize_record};
use crate::model::{EngineError, SchemaKind};

// ============================================================================
// Verification Results
// ============================================================================

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VerificationReport {
    pub timestamp: String,
    pub buckets: Vec<BucketVerification>,
    pub summary: VerificationSummary,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VerificationSummary {
    pub buckets_total: usize,
    pub buckets_working: usize,
    pub buckets_failed: usize,
    pub records_total: usize,
    pub records_defaulted: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BucketVerification {
    pub bucket: String,
    pub status: VerificationStatus,
    /// Schemas seen in the bucket, in order of first appearance.
    pub schema_kinds: Vec<SchemaKind>,
    pub record_count: usize,
    pub undated: usize,
    pub unknown_location: usize,
    pub unrecognized: usize,
    /// Records that are undated or unrecognized.
    pub defaulted: usize,
    pub error_message: Option<String>,
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq)]
pub enum VerificationStatus {
    Success,
    PartialSuccess,
    Failed,
}

// ============================================================================
// Bucket Verification
// ============================================================================

fn failed_bucket(bucket: &str, message: String) -> BucketVerification {
    BucketVerification {
        bucket: bucket.to_string(),
        status: VerificationStatus::Failed,
        schema_kinds: Vec::new(),
        record_count: 0,
        undated: 0,
        unknown_location: 0,
        unrecognized: 0,
        defaulted: 0,
        error_message: Some(message),
    }
}

/// Verifies one bucket.
///
/// A bucket that is not a list, or an empty list, fails. Undated or
/// unrecognized records make it a partial success. Unknown locations are
/// reported but do not affect status, since the historical register never
/// carries one.
pub fn verify_bucket(bucket: &str, value: &Value) -> BucketVerification {
    let Some(items) = value.as_array() else {
        return failed_bucket(bucket, format!("bucket is {}, expected a list", json_kind(value)));
    };

    if items.is_empty() {
        return failed_bucket(bucket, "bucket contains no records".to_string());
    }

    let mut result = BucketVerification {
        bucket: bucket.to_string(),
        status: VerificationStatus::Success,
        schema_kinds: Vec::new(),
        record_count: items.len(),
        undated: 0,
        unknown_location: 0,
        unrecognized: 0,
        defaulted: 0,
        error_message: None,
    };

    for item in items {
        let rec = normalize_record(bucket, item);

        if !result.schema_kinds.contains(&rec.schema) {
            result.schema_kinds.push(rec.schema);
        }
        if rec.date.is_none() {
            result.undated += 1;
        }
        if !rec.has_known_location() {
            result.unknown_location += 1;
        }
        if rec.schema == SchemaKind::Unrecognized {
            result.unrecognized += 1;
        }
        if rec.date.is_none() || rec.schema == SchemaKind::Unrecognized {
            result.defaulted += 1;
        }
    }

    if result.defaulted > 0 {
        result.status = VerificationStatus::PartialSuccess;
        result.error_message = Some(format!(
            "{} undated, {} unrecognized of {} records",
            result.undated, result.unrecognized, result.record_count
        ));
    }

    result
}

// ============================================================================
// Full Verification Runner
// ============================================================================

pub fn verify_collection(collection: &Value) -> Result<VerificationReport, EngineError> {
    let buckets = collection.as_object().ok_or_else(|| {
        EngineError::MalformedCollection(format!(
            "expected an object of year buckets, found {}",
            json_kind(collection)
        ))
    })?;

    let mut report = VerificationReport {
        timestamp: Utc::now().to_rfc3339(),
        buckets: Vec::new(),
        summary: VerificationSummary::default(),
    };

    for (key, value) in buckets {
        let result = verify_bucket(key, value);

        report.summary.buckets_total += 1;
        report.summary.records_total += result.record_count;
        report.summary.records_defaulted += result.defaulted;
        match result.status {
            VerificationStatus::Success | VerificationStatus::PartialSuccess => {
                report.summary.buckets_working += 1
            }
            VerificationStatus::Failed => report.summary.buckets_failed += 1,
        }

        report.buckets.push(result);
    }

    Ok(report)
}

pub fn print_summary(report: &VerificationReport) {
    println!("\n═══════════════════════════════════════════════════════════");
    println!("📊 DATASET VERIFICATION SUMMARY");
    println!("═══════════════════════════════════════════════════════════");
    println!();

    for bucket in &report.buckets {
        match bucket.status {
            VerificationStatus::Success => {
                println!("  ✓ {} ({} records)", bucket.bucket, bucket.record_count)
            }
            VerificationStatus::PartialSuccess => println!(
                "  ⚠ {}: {}",
                bucket.bucket,
                bucket.error_message.as_deref().unwrap_or("partially defaulted")
            ),
            VerificationStatus::Failed => println!(
                "  ✗ {} FAILED: {}",
                bucket.bucket,
                bucket.error_message.as_deref().unwrap_or("Unknown")
            ),
        }
    }

    println!();
    println!(
        "Buckets:  {}/{} working  ({} failed)",
        report.summary.buckets_working, report.summary.buckets_total, report.summary.buckets_failed
    );
    println!(
        "Records:  {} total, {} defaulted",
        report.summary.records_total, report.summary.records_defaulted
    );

    let success_rate = if report.summary.buckets_total > 0 {
        (report.summary.buckets_working as f64 / report.summary.buckets_total as f64) * 100.0
    } else {
        0.0
    };

    println!(
        "Overall Success Rate: {:.1}% ({}/{})",
        success_rate, report.summary.buckets_working, report.summary.buckets_total
    );
    println!("═══════════════════════════════════════════════════════════");
}
