/// Core data types for the mine-safety hazard analytics service.
///
/// This module defines the shared domain model imported by all other modules:
/// the normalized accident record every analysis consumes, and the error type
/// reported back to callers. It contains no analysis logic and no I/O.

use serde::Serialize;

/// Literal used wherever a location or cause field is absent.
pub const UNKNOWN: &str = "Unknown";

const MONTH_NAMES: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

// ---------------------------------------------------------------------------
// Dates
// ---------------------------------------------------------------------------

/// Calendar date of an accident as written in the source register.
///
/// The source dates are `DD/MM/YY` or `DD/MM/YYYY`. Components are kept as
/// parsed rather than validated into a real calendar date; all-zero means the
/// date could not be read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct AccidentDate {
    pub day: u32,
    pub month: u32,
    pub year: i32,
}

impl AccidentDate {
    pub const UNKNOWN: AccidentDate = AccidentDate { day: 0, month: 0, year: 0 };

    /// True when at least the year was readable.
    pub fn is_known(&self) -> bool {
        self.year > 0
    }

    /// Four-digit year, or `"Unknown"`.
    pub fn year_label(&self) -> String {
        if self.year > 0 {
            self.year.to_string()
        } else {
            UNKNOWN.to_string()
        }
    }

    /// Three-letter month name, or `"Unknown"` when the month is outside 1..=12.
    pub fn month_name(&self) -> &'static str {
        match self.month {
            1..=12 => MONTH_NAMES[(self.month - 1) as usize],
            _ => UNKNOWN,
        }
    }
}

// ---------------------------------------------------------------------------
// Victims
// ---------------------------------------------------------------------------

/// One named casualty from a fatal-accident report.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Victim {
    pub name: String,
    pub role: String,
    pub age: Option<String>,
}

/// Casualty information, whose shape depends on the source schema.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase", tag = "kind")]
pub enum Victims {
    /// Fatal-accident reports list each victim.
    Listed { victims: Vec<Victim> },
    /// The historical register only carries counts.
    Counted {
        killed: u32,
        #[serde(rename = "seriouslyInjured")]
        seriously_injured: u32,
    },
}

impl Victims {
    /// Number of people the record accounts for: listed victims, or killed.
    pub fn count(&self) -> u32 {
        match self {
            Victims::Listed { victims } => victims.len() as u32,
            Victims::Counted { killed, .. } => *killed,
        }
    }
}

impl Default for Victims {
    fn default() -> Self {
        Victims::Listed { victims: Vec::new() }
    }
}

// ---------------------------------------------------------------------------
// Accident record
// ---------------------------------------------------------------------------

/// Which incoming schema a record was read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SchemaKind {
    /// Per-accident fatal report: location, cause category, victim list.
    Fatal,
    /// Major historical accident register: free-text cause, casualty counts.
    Historical,
    /// The record was not a JSON object; it was fully defaulted.
    Unrecognized,
}

/// A normalized accident record.
///
/// Produced by `ingest::accidents::normalize_collection`. `state`,
/// `district`, `cause_category` and `cause_specific` are never empty: missing
/// values are replaced with `"Unknown"` during normalization.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AccidentRecord {
    /// `None` when the source date was missing or unreadable.
    pub date: Option<AccidentDate>,
    pub mine_name: String,
    pub owner: String,
    pub state: String,
    pub district: String,
    pub cause_category: String,
    pub cause_specific: String,
    pub description: String,
    /// Free text; may cite regulations ("Regulation 112").
    pub avertable_factors: String,
    pub victims: Victims,
    /// Label of the bucket the record came from, e.g. `"fatal_accidents_2015"`.
    pub source_year_key: String,
    pub schema: SchemaKind,
}

impl AccidentRecord {
    /// An all-default record for the given bucket. Normalization fills
    /// fields in from here.
    pub fn unknown(source_year_key: &str, schema: SchemaKind) -> Self {
        AccidentRecord {
            date: None,
            mine_name: String::new(),
            owner: String::new(),
            state: UNKNOWN.to_string(),
            district: UNKNOWN.to_string(),
            cause_category: UNKNOWN.to_string(),
            cause_specific: UNKNOWN.to_string(),
            description: String::new(),
            avertable_factors: String::new(),
            victims: Victims::default(),
            source_year_key: source_year_key.to_string(),
            schema,
        }
    }

    /// Year label derived from the accident date (`"Unknown"` if undated).
    pub fn year_label(&self) -> String {
        self.date.unwrap_or(AccidentDate::UNKNOWN).year_label()
    }

    /// Month name derived from the accident date (`"Unknown"` if undated).
    pub fn month_name(&self) -> &'static str {
        self.date.unwrap_or(AccidentDate::UNKNOWN).month_name()
    }

    pub fn has_known_location(&self) -> bool {
        self.state != UNKNOWN && self.district != UNKNOWN
    }
}

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Errors reported to callers of the engine.
///
/// Individual malformed records never produce an error; they are defaulted
/// during normalization. These variants cover failures of the whole call.
#[derive(Debug, PartialEq)]
pub enum EngineError {
    /// The input was not a mapping of bucket labels to record lists.
    MalformedCollection(String),
    /// The record collection or a config file could not be read.
    Io(String),
    /// A document could not be deserialized.
    Parse(String),
    /// Configuration was present but invalid.
    Config(String),
    /// The external snippet search service failed.
    Search(String),
}

impl std::fmt::Display for EngineError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EngineError::MalformedCollection(msg) => write!(f, "Malformed collection: {}", msg),
            EngineError::Io(msg) => write!(f, "I/O error: {}", msg),
            EngineError::Parse(msg) => write!(f, "Parse error: {}", msg),
            EngineError::Config(msg) => write!(f, "Config error: {}", msg),
            EngineError::Search(msg) => write!(f, "Search error: {}", msg),
        }
    }
}

impl std::error::Error for EngineError {}

impl From<std::io::Error> for EngineError {
    fn from(err: std::io::Error) -> Self {
        EngineError::Io(err.to_string())
    }
}

impl From<serde_json::Error> for EngineError {
    fn from(err: serde_json::Error) -> Self {
        EngineError::Parse(err.to_string())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_month_name_in_range() {
        let date = AccidentDate { day: 14, month: 3, year: 2015 };
        assert_eq!(date.month_name(), "Mar");
        assert_eq!(date.year_label(), "2015");
    }

    #[test]
    fn test_month_name_out_of_range_is_unknown() {
        assert_eq!(AccidentDate { day: 1, month: 13, year: 2015 }.month_name(), "Unknown");
        assert_eq!(AccidentDate { day: 1, month: 0, year: 2015 }.month_name(), "Unknown");
    }

    #[test]
    fn test_unknown_date_labels() {
        assert!(!AccidentDate::UNKNOWN.is_known());
        assert_eq!(AccidentDate::UNKNOWN.year_label(), "Unknown");
        assert_eq!(AccidentDate::UNKNOWN.month_name(), "Unknown");
    }

    #[test]
    fn test_victim_count_by_schema() {
        let listed = Victims::Listed {
            victims: vec![
                Victim { name: "A".into(), role: "Miner".into(), age: Some("34".into()) },
                Victim { name: "B".into(), role: "Driller".into(), age: None },
            ],
        };
        assert_eq!(listed.count(), 2);

        let counted = Victims::Counted { killed: 375, seriously_injured: 0 };
        assert_eq!(counted.count(), 375);
    }

    #[test]
    fn test_unknown_record_defaults() {
        let rec = AccidentRecord::unknown("fatal_accidents_2015", SchemaKind::Fatal);
        assert_eq!(rec.state, UNKNOWN);
        assert_eq!(rec.district, UNKNOWN);
        assert_eq!(rec.cause_category, UNKNOWN);
        assert_eq!(rec.cause_specific, UNKNOWN);
        assert_eq!(rec.year_label(), "Unknown");
        assert!(!rec.has_known_location());
    }

    #[test]
    fn test_error_display() {
        let err = EngineError::MalformedCollection("top level is an array".into());
        assert_eq!(err.to_string(), "Malformed collection: top level is an array");
    }
}
