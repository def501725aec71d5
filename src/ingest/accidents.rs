/// Accident register ingestion and normalization.
///
/// The accident collection is a JSON object mapping a year-bucket label
/// (e.g. `"fatal_accidents_2015"`, `"major_accidents_1901_2015"`) to a list
/// of records. Two record schemas occur:
///
/// - **fatal**: one report per fatal accident, with a nested `location`,
///   a cause category, and a list of named victims.
/// - **historical**: the register of major accidents, with a free-text
///   `cause` and `killed` / `seriously_injured` counts.
///
/// The schema of each record is resolved once, here, into `RawAccident`.
/// Everything downstream works on the uniform `AccidentRecord`.
///
/// Normalization never fails the batch because of one bad record, and never
/// discards a record's good fields because of one bad field: missing or
/// mistyped fields default to `"Unknown"`, unreadable dates to
/// `AccidentDate::UNKNOWN`. Only records that are not JSON objects at all are
/// fully defaulted.

use std::path::Path;

use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::logging::{self, Component};
use crate::model::{
    AccidentDate, AccidentRecord, EngineError, SchemaKind, UNKNOWN, Victim, Victims,
};

// ============================================================================
// Raw Record Structures
// ============================================================================

/// Location block of a fatal-accident report.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct RawLocation {
    #[serde(deserialize_with = "lenient_string")]
    pub state: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub district: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct RawVictim {
    #[serde(deserialize_with = "lenient_string")]
    pub name: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub role: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub age: Option<String>,
}

/// A record from a fatal-accident bucket.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct FatalAccident {
    #[serde(deserialize_with = "lenient_string")]
    pub accident_number: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub date: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub time: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub mine_name: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub owner: Option<String>,
    #[serde(deserialize_with = "lenient_location")]
    pub location: Option<RawLocation>,
    #[serde(deserialize_with = "lenient_string")]
    pub cause_category: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub cause_specific: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub cause_code: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub description: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub avertable_factors: Option<String>,
    #[serde(deserialize_with = "lenient_victims")]
    pub victims: Option<Vec<RawVictim>>,
}

/// A record from the major historical accident register.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct HistoricalAccident {
    #[serde(deserialize_with = "lenient_string")]
    pub sl_no: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub date: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub mine_name: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub cause: Option<String>,
    #[serde(deserialize_with = "lenient_count")]
    pub killed: Option<u32>,
    #[serde(deserialize_with = "lenient_count")]
    pub seriously_injured: Option<u32>,
}

/// A raw record with its schema resolved.
#[derive(Debug)]
pub enum RawAccident {
    Fatal(FatalAccident),
    Historical(HistoricalAccident),
    /// The record is not a JSON object.
    Unrecognized(String),
}

// ============================================================================
// Lenient Field Deserializers
// ============================================================================

// Each field is read on its own: a value of the wrong type becomes `None`
// (logged at warn) and never fails the enclosing record.

fn ignored_field(expected: &str, found: &Value) {
    logging::warn(
        Component::Ingest,
        None,
        &format!("ignoring field value: expected {}, found {}", expected, json_kind(found)),
    );
}

fn scalar_text(value: Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) if s.trim().is_empty() => None,
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        other => {
            ignored_field("a scalar", &other);
            None
        }
    }
}

/// Accepts strings, numbers and booleans as text. Empty strings, `null`,
/// arrays and objects become `None`.
fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(scalar_text(Value::deserialize(deserializer)?))
}

/// A `location` object; any other value becomes `None`.
fn lenient_location<'de, D>(deserializer: D) -> Result<Option<RawLocation>, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::Null => Ok(None),
        value @ Value::Object(_) => Ok(RawLocation::deserialize(&value).ok()),
        other => {
            ignored_field("a location object", &other);
            Ok(None)
        }
    }
}

/// A victim list. Object entries are read leniently, bare strings are taken
/// as victim names, and other entries are skipped. A non-list becomes `None`.
fn lenient_victims<'de, D>(deserializer: D) -> Result<Option<Vec<RawVictim>>, D::Error>
where
    D: Deserializer<'de>,
{
    let items = match Value::deserialize(deserializer)? {
        Value::Null => return Ok(None),
        Value::Array(items) => items,
        other => {
            ignored_field("a victim list", &other);
            return Ok(None);
        }
    };

    let victims = items
        .into_iter()
        .filter_map(|item| match item {
            Value::Object(_) => RawVictim::deserialize(&item).ok(),
            Value::String(_) => Some(RawVictim {
                name: scalar_text(item),
                ..RawVictim::default()
            }),
            other => {
                ignored_field("a victim entry", &other);
                None
            }
        })
        .collect();

    Ok(Some(victims))
}

/// Accepts non-negative integers or numeric strings. Anything unreadable as a
/// count becomes `None` rather than an error.
fn lenient_count<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    let count = match Value::deserialize(deserializer)? {
        Value::Number(n) => n.as_u64().and_then(|v| u32::try_from(v).ok()),
        Value::String(s) => s.trim().parse::<u32>().ok(),
        _ => None,
    };
    Ok(count)
}

pub(crate) fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

// ============================================================================
// Schema Resolution
// ============================================================================

/// Decides which schema a raw JSON record follows.
///
/// Fatal-report markers take precedence; a record with neither set of
/// markers is read as a (sparse) fatal report. Non-object records are
/// `Unrecognized`; mistyped fields never change the schema.
pub fn classify_schema(value: &Value) -> SchemaKind {
    let Some(obj) = value.as_object() else {
        return SchemaKind::Unrecognized;
    };

    let fatal_markers = ["victims", "location", "cause_category"];
    let historical_markers = ["killed", "seriously_injured", "cause"];

    if fatal_markers.iter().any(|k| obj.contains_key(*k)) {
        SchemaKind::Fatal
    } else if historical_markers.iter().any(|k| obj.contains_key(*k)) {
        SchemaKind::Historical
    } else {
        SchemaKind::Fatal
    }
}

/// Reads a raw JSON record into its schema-specific structure.
pub fn parse_raw_accident(value: &Value) -> RawAccident {
    match classify_schema(value) {
        SchemaKind::Fatal => match FatalAccident::deserialize(value) {
            Ok(acc) => RawAccident::Fatal(acc),
            Err(e) => RawAccident::Unrecognized(e.to_string()),
        },
        SchemaKind::Historical => match HistoricalAccident::deserialize(value) {
            Ok(acc) => RawAccident::Historical(acc),
            Err(e) => RawAccident::Unrecognized(e.to_string()),
        },
        SchemaKind::Unrecognized => {
            RawAccident::Unrecognized(format!("record is {}", json_kind(value)))
        }
    }
}

// ============================================================================
// Date Parsing
// ============================================================================

/// Parses a `DD/MM/YY` or `DD/MM/YYYY` date.
///
/// The text must split on `/` into exactly three components. Each component
/// is read from its leading digits, so trailing noise is tolerated
/// (`"14/03/2015."`, `"14/03/15 (night)"`). A component with no leading digit
/// makes the whole date `AccidentDate::UNKNOWN`. Two-digit years pivot at 50:
/// `05` → 2005, `75` → 1975.
pub fn parse_accident_date(raw: &str) -> AccidentDate {
    let parts: Vec<&str> = raw.trim().split('/').collect();
    if parts.len() != 3 {
        return AccidentDate::UNKNOWN;
    }

    match (
        leading_number::<u32>(parts[0]),
        leading_number::<u32>(parts[1]),
        leading_number::<i32>(parts[2]),
    ) {
        (Some(day), Some(month), Some(year)) => AccidentDate {
            day,
            month,
            year: expand_two_digit_year(year),
        },
        _ => AccidentDate::UNKNOWN,
    }
}

/// The run of ASCII digits at the start of `text` (after whitespace).
fn leading_number<T: std::str::FromStr>(text: &str) -> Option<T> {
    let text = text.trim_start();
    let end = text
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(text.len());
    text[..end].parse().ok()
}

/// Expands a two-digit year using a pivot of 50. Longer years pass through.
pub fn expand_two_digit_year(year: i32) -> i32 {
    match year {
        0..=49 => 2000 + year,
        50..=99 => 1900 + year,
        _ => year,
    }
}

// ============================================================================
// Normalization
// ============================================================================

fn or_unknown(value: Option<String>) -> String {
    value.unwrap_or_else(|| UNKNOWN.to_string())
}

fn known_date(raw: Option<&str>) -> Option<AccidentDate> {
    raw.map(parse_accident_date).filter(|d| d.is_known())
}

/// Normalizes one raw JSON record from the bucket `source_year_key`.
pub fn normalize_record(source_year_key: &str, value: &Value) -> AccidentRecord {
    match parse_raw_accident(value) {
        RawAccident::Fatal(acc) => {
            let location = acc.location.unwrap_or_default();
            let victims = acc
                .victims
                .unwrap_or_default()
                .into_iter()
                .map(|v| Victim {
                    name: v.name.unwrap_or_default(),
                    role: v.role.unwrap_or_default(),
                    age: v.age,
                })
                .collect();

            AccidentRecord {
                date: known_date(acc.date.as_deref()),
                mine_name: acc.mine_name.unwrap_or_default(),
                owner: acc.owner.unwrap_or_default(),
                state: or_unknown(location.state),
                district: or_unknown(location.district),
                cause_category: or_unknown(acc.cause_category),
                cause_specific: or_unknown(acc.cause_specific),
                description: acc.description.unwrap_or_default(),
                avertable_factors: acc.avertable_factors.unwrap_or_default(),
                victims: Victims::Listed { victims },
                source_year_key: source_year_key.to_string(),
                schema: SchemaKind::Fatal,
            }
        }
        RawAccident::Historical(acc) => {
            let mut record = AccidentRecord::unknown(source_year_key, SchemaKind::Historical);
            record.date = known_date(acc.date.as_deref());
            record.mine_name = acc.mine_name.unwrap_or_default();
            record.cause_specific = or_unknown(acc.cause);
            record.victims = Victims::Counted {
                killed: acc.killed.unwrap_or(0),
                seriously_injured: acc.seriously_injured.unwrap_or(0),
            };
            record
        }
        RawAccident::Unrecognized(reason) => {
            logging::warn(
                Component::Ingest,
                Some(source_year_key),
                &format!("record defaulted: {}", reason),
            );
            AccidentRecord::unknown(source_year_key, SchemaKind::Unrecognized)
        }
    }
}

/// Flattens a bucket→records collection into normalized records.
///
/// Buckets are visited in document order and records keep their order within
/// each bucket. Bucket values that are not lists are skipped. Fails only when
/// the collection itself is not a JSON object.
pub fn normalize_collection(collection: &Value) -> Result<Vec<AccidentRecord>, EngineError> {
    let buckets = collection.as_object().ok_or_else(|| {
        EngineError::MalformedCollection(format!(
            "expected an object of year buckets, found {}",
            json_kind(collection)
        ))
    })?;

    let mut records = Vec::new();
    let mut skipped_buckets = 0;

    for (key, bucket) in buckets {
        let Some(items) = bucket.as_array() else {
            logging::debug(
                Component::Ingest,
                Some(key),
                &format!("skipping bucket: value is {}", json_kind(bucket)),
            );
            skipped_buckets += 1;
            continue;
        };

        for item in items {
            records.push(normalize_record(key, item));
        }
    }

    let defaulted = records
        .iter()
        .filter(|r| r.schema == SchemaKind::Unrecognized)
        .count();
    logging::log_ingest_summary(records.len(), defaulted, skipped_buckets);

    Ok(records)
}

/// Reads a record collection from a JSON file.
pub fn load_collection(path: impl AsRef<Path>) -> Result<Value, EngineError> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path)
        .map_err(|e| EngineError::Io(format!("{}: {}", path.display(), e)))?;
    let value = serde_json::from_str(&text)?;
    Ok(value)
}

/// Reads and normalizes a record collection from a JSON file.
pub fn load_records(path: impl AsRef<Path>) -> Result<Vec<AccidentRecord>, EngineError> {
    normalize_collection(&load_collection(path)?)
}

// ============================================================================
// Tests
// ============================================================================
