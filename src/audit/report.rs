/// Periodic compliance audit reports.
///
/// An audit covers the records of one year bucket, optionally scoped to a
/// state. It lists findings per cause category, derives prioritized
/// recommendations for the five largest findings, and scores compliance
/// with a penalty per finding.
///
/// # Period selection
/// A record belongs to the period when its `source_year_key` *contains* the
/// requested year. This is substring containment on the bucket label, so a
/// year of `"22"` also matches buckets such as `"1922"` or `"2022_special"`.
/// Integrators should pass full four-digit years.
///
/// # Clock injection
/// `generate_audit_report_at` takes `now` explicitly so reports are
/// deterministic in tests; `generate_audit_report` uses the real clock.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::analysis::rules::audit_action;
use crate::audit::regulations::period_regulation;
use crate::logging::{self, Component};
use crate::model::AccidentRecord;
use crate::thresholds::{FindingSeverity, Priority};

/// State filter value meaning "every state".
pub const ALL_STATES: &str = "all";

/// Recommendations derived per report, from the largest findings.
pub const MAX_RECOMMENDATIONS: usize = 5;

/// Mines listed per recommendation.
pub const MAX_AFFECTED_MINES: usize = 5;

/// Compliance points lost per critical finding.
pub const CRITICAL_FINDING_PENALTY: i64 = 10;

/// Compliance points lost per finding of any severity.
pub const FINDING_PENALTY: i64 = 2;

// ---------------------------------------------------------------------------
// Report types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditFinding {
    pub category: String,
    pub severity: FindingSeverity,
    pub count: usize,
    pub description: String,
    pub regulation: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditRecommendation {
    pub priority: Priority,
    pub action: String,
    pub regulation: String,
    pub affected_mines: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditSummary {
    pub total_accidents: usize,
    pub critical_violations: usize,
    /// In [0, 100].
    pub compliance_score: u32,
    /// Categories of the critical findings.
    pub high_risk_areas: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditReport {
    pub id: String,
    pub generated_at: DateTime<Utc>,
    pub period: String,
    pub summary: AuditSummary,
    /// Largest count first.
    pub findings: Vec<AuditFinding>,
    pub recommendations: Vec<AuditRecommendation>,
}

// ---------------------------------------------------------------------------
// Period selection
// ---------------------------------------------------------------------------

/// True when `rec` falls inside the audit period for `year` and `state`.
pub fn in_audit_period(rec: &AccidentRecord, year: &str, state: &str) -> bool {
    let year_match = rec.source_year_key.contains(year);
    let state_match = state == ALL_STATES || rec.state == state;
    year_match && state_match
}

/// Human-readable period: `"2015"` or `"2015 - Jharkhand"`.
pub fn period_label(year: &str, state: &str) -> String {
    if state == ALL_STATES {
        year.to_string()
    } else {
        format!("{} - {}", year, state)
    }
}

// ---------------------------------------------------------------------------
// Scoring helpers
// ---------------------------------------------------------------------------

/// Share of `total` as a percentage; 0 when `total` is 0.
pub fn percentage_of(count: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    count as f64 / total as f64 * 100.0
}

/// One decimal place, halves rounded away from zero.
fn format_percentage(pct: f64) -> String {
    format!("{:.1}", (pct * 10.0).round() / 10.0)
}

/// `max(0, 100 - critical * 10 - findings * 2)`.
pub fn compliance_score(critical_violations: usize, total_findings: usize) -> u32 {
    let critical = i64::try_from(critical_violations).unwrap_or(i64::MAX);
    let total = i64::try_from(total_findings).unwrap_or(i64::MAX);
    let penalty = critical
        .saturating_mul(CRITICAL_FINDING_PENALTY)
        .saturating_add(total.saturating_mul(FINDING_PENALTY));
    100_i64.saturating_sub(penalty).clamp(0, 100) as u32
}

// ---------------------------------------------------------------------------
// Findings and recommendations
// ---------------------------------------------------------------------------

fn count_by_category<'a>(records: &[&'a AccidentRecord]) -> Vec<(&'a str, usize)> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut counts: Vec<(&str, usize)> = Vec::new();

    for &rec in records {
        let category = rec.cause_category.as_str();
        match index.get(category) {
            Some(&slot) => counts[slot].1 += 1,
            None => {
                index.insert(category, counts.len());
                counts.push((category, 1));
            }
        }
    }

    counts
}

/// First `MAX_AFFECTED_MINES` distinct mine names, in record order.
fn affected_mines(records: &[&AccidentRecord]) -> Vec<String> {
    let mut mines: Vec<String> = Vec::new();
    for rec in records {
        if mines.len() == MAX_AFFECTED_MINES {
            break;
        }
        if !rec.mine_name.is_empty() && !mines.contains(&rec.mine_name) {
            mines.push(rec.mine_name.clone());
        }
    }
    mines
}

fn build_findings(
    records: &[&AccidentRecord],
    year: &str,
    state: &str,
    regulation: &str,
) -> Vec<AuditFinding> {
    let total = records.len();
    let scope = if state == ALL_STATES {
        String::new()
    } else {
        format!(" in {}", state)
    };

    let mut findings: Vec<AuditFinding> = count_by_category(records)
        .into_iter()
        .map(|(category, count)| AuditFinding {
            category: category.to_string(),
            severity: FindingSeverity::from_count(count),
            count,
            description: format!(
                "{} incidents of {} recorded in {}{}. This represents {}% of total accidents.",
                count,
                category,
                year,
                scope,
                format_percentage(percentage_of(count, total))
            ),
            regulation: regulation.to_string(),
        })
        .collect();

    findings.sort_by(|a, b| b.count.cmp(&a.count));
    findings
}

fn build_recommendations(findings: &[AuditFinding], mines: &[String]) -> Vec<AuditRecommendation> {
    findings
        .iter()
        .take(MAX_RECOMMENDATIONS)
        .map(|finding| {
            let (action, priority) = audit_action(&finding.category, finding.severity);
            AuditRecommendation {
                priority,
                action,
                regulation: finding.regulation.clone(),
                affected_mines: mines.to_vec(),
            }
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Report generation
// ---------------------------------------------------------------------------

/// Generates an audit report for `year` and `state` (or `"all"`), stamped
/// with `now`.
///
/// An empty period is not an error: the report has zero accidents, no
/// findings, no recommendations, and a compliance score of 100.
pub fn generate_audit_report_at(
    records: &[AccidentRecord],
    year: &str,
    state: &str,
    now: DateTime<Utc>,
) -> AuditReport {
    let period: Vec<&AccidentRecord> = records
        .iter()
        .filter(|rec| in_audit_period(rec, year, state))
        .collect();

    let regulation = period_regulation(period.iter().copied());
    let findings = build_findings(&period, year, state, &regulation);
    let recommendations = build_recommendations(&findings, &affected_mines(&period));

    let high_risk_areas: Vec<String> = findings
        .iter()
        .filter(|f| f.severity == FindingSeverity::Critical)
        .map(|f| f.category.clone())
        .collect();
    let critical_violations = high_risk_areas.len();

    let label = period_label(year, state);
    if period.is_empty() {
        logging::warn(Component::Audit, Some(&label), "no accidents recorded for audit period");
    }

    let report = AuditReport {
        id: format!("AUDIT-{}-{}", year, now.timestamp_millis()),
        generated_at: now,
        period: label,
        summary: AuditSummary {
            total_accidents: period.len(),
            critical_violations,
            compliance_score: compliance_score(critical_violations, findings.len()),
            high_risk_areas,
        },
        findings,
        recommendations,
    };

    logging::info(
        Component::Audit,
        Some(&report.period),
        &format!(
            "report {}: {} accidents, {} findings, compliance {}",
            report.id,
            report.summary.total_accidents,
            report.findings.len(),
            report.summary.compliance_score
        ),
    );

    report
}

/// Generates an audit report stamped with the current time.
pub fn generate_audit_report(records: &[AccidentRecord], year: &str, state: &str) -> AuditReport {
    generate_audit_report_at(records, year, state, Utc::now())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
