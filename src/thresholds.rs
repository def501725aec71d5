//! Frequency thresholds and the discrete bands derived from them.
//!
//! Two banding schemes exist. Hazard-pattern analysis grades a cause
//! category on four levels; audit findings use a coarser three-level scale
//! with a lower critical threshold. All thresholds are strict: a count equal
//! to a threshold falls into the lower band.

use serde::Serialize;

/// Frequency above which a cause pattern is critical.
pub const PATTERN_CRITICAL_ABOVE: usize = 20;
/// Frequency above which a cause pattern is high.
pub const PATTERN_HIGH_ABOVE: usize = 10;
/// Frequency above which a cause pattern is medium.
pub const PATTERN_MEDIUM_ABOVE: usize = 5;

/// Frequency above which a cause pattern is trending upward.
pub const TREND_INCREASING_ABOVE: usize = 15;
/// Frequency below which deep analysis calls a pattern decreasing.
pub const TREND_DECREASING_BELOW: usize = 5;

/// Count above which an audit finding is critical.
pub const FINDING_CRITICAL_ABOVE: usize = 10;
/// Count above which an audit finding is major.
pub const FINDING_MAJOR_ABOVE: usize = 5;

// ---------------------------------------------------------------------------
// Pattern severity
// ---------------------------------------------------------------------------

/// Severity of a recurring cause pattern, in ascending order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PatternSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl PatternSeverity {
    /// Bands a cause-category frequency.
    pub fn from_frequency(frequency: usize) -> Self {
        if frequency > PATTERN_CRITICAL_ABOVE {
            PatternSeverity::Critical
        } else if frequency > PATTERN_HIGH_ABOVE {
            PatternSeverity::High
        } else if frequency > PATTERN_MEDIUM_ABOVE {
            PatternSeverity::Medium
        } else {
            PatternSeverity::Low
        }
    }

    /// Reads a severity label. Unrecognized labels fail closed to `Low`.
    pub fn from_label(label: &str) -> Self {
        match label.trim().to_ascii_lowercase().as_str() {
            "critical" => PatternSeverity::Critical,
            "high" => PatternSeverity::High,
            "medium" => PatternSeverity::Medium,
            _ => PatternSeverity::Low,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PatternSeverity::Low => "low",
            PatternSeverity::Medium => "medium",
            PatternSeverity::High => "high",
            PatternSeverity::Critical => "critical",
        }
    }
}

// ---------------------------------------------------------------------------
// Trend
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    Increasing,
    Stable,
    Decreasing,
}

impl Trend {
    /// Trend used by standard analysis. Never reports `Decreasing`.
    pub fn standard(frequency: usize) -> Self {
        if frequency > TREND_INCREASING_ABOVE {
            Trend::Increasing
        } else {
            Trend::Stable
        }
    }

    /// Trend used by deep analysis, which also recognizes `Decreasing`.
    pub fn deep(frequency: usize) -> Self {
        if frequency > TREND_INCREASING_ABOVE {
            Trend::Increasing
        } else if frequency < TREND_DECREASING_BELOW {
            Trend::Decreasing
        } else {
            Trend::Stable
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Trend::Increasing => "increasing",
            Trend::Stable => "stable",
            Trend::Decreasing => "decreasing",
        }
    }
}

// ---------------------------------------------------------------------------
// Audit finding severity and recommendation priority
// ---------------------------------------------------------------------------

/// Severity of an audit finding, in ascending order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FindingSeverity {
    Minor,
    Major,
    Critical,
}

impl FindingSeverity {
    /// Bands a per-category accident count within an audit period.
    pub fn from_count(count: usize) -> Self {
        if count > FINDING_CRITICAL_ABOVE {
            FindingSeverity::Critical
        } else if count > FINDING_MAJOR_ABOVE {
            FindingSeverity::Major
        } else {
            FindingSeverity::Minor
        }
    }

    /// Reads a severity label. Unrecognized labels fail closed to `Minor`.
    pub fn from_label(label: &str) -> Self {
        match label.trim().to_ascii_lowercase().as_str() {
            "critical" => FindingSeverity::Critical,
            "major" => FindingSeverity::Major,
            _ => FindingSeverity::Minor,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            FindingSeverity::Minor => "minor",
            FindingSeverity::Major => "major",
            FindingSeverity::Critical => "critical",
        }
    }
}

/// Priority of an audit recommendation, in ascending order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    Medium,
    High,
}

impl Priority {
    /// Reads a priority label. Unrecognized labels fail closed to `Low`.
    pub fn from_label(label: &str) -> Self {
        match label.trim().to_ascii_lowercase().as_str() {
            "high" => Priority::High,
            "medium" => Priority::Medium,
            _ => Priority::Low,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Low => "low",
            Priority::Medium => "medium",
            Priority::High => "high",
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
