/// Summary statistics over the accident register.
///
/// Backs the overview dashboard: totals, per-category, per-month and
/// per-state breakdowns for an optional year and state. Unlike the audit
/// generator, the year here is matched exactly against the year derived from
/// each accident's date, not against the bucket label.

use std::collections::HashMap;

use serde::Serialize;

use crate::model::AccidentRecord;

/// Filter value meaning "do not filter on this field".
pub const ALL: &str = "all";

/// States reported in `AccidentStats::top_states`.
pub const MAX_TOP_STATES: usize = 10;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatsFilter {
    pub year: String,
    pub state: String,
}

impl StatsFilter {
    pub fn new(year: &str, state: &str) -> Self {
        StatsFilter {
            year: year.to_string(),
            state: state.to_string(),
        }
    }

    pub fn all() -> Self {
        StatsFilter::new(ALL, ALL)
    }

    pub fn matches(&self, rec: &AccidentRecord) -> bool {
        let year_match = self.year == ALL || rec.year_label() == self.year;
        let state_match = self.state == ALL || rec.state == self.state;
        year_match && state_match
    }
}

impl Default for StatsFilter {
    fn default() -> Self {
        StatsFilter::all()
    }
}

/// A label with its record count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LabelCount {
    pub label: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AccidentStats {
    pub total_accidents: usize,
    /// Listed victims plus killed counts from the historical register.
    pub total_victims: u64,
    pub by_category: Vec<LabelCount>,
    pub by_month: Vec<LabelCount>,
    /// Busiest states first, at most `MAX_TOP_STATES`.
    pub top_states: Vec<LabelCount>,
    /// Distinct year labels across the whole register, for filter pickers.
    pub years: Vec<String>,
    /// Distinct states across the whole register, for filter pickers.
    pub states: Vec<String>,
}

/// Counts labels in first-appearance order.
fn count_labels<'a>(labels: impl Iterator<Item = &'a str>) -> Vec<LabelCount> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut counts: Vec<LabelCount> = Vec::new();

    for label in labels {
        match index.get(label) {
            Some(&slot) => counts[slot].count += 1,
            None => {
                index.insert(label, counts.len());
                counts.push(LabelCount {
                    label: label.to_string(),
                    count: 1,
                });
            }
        }
    }

    counts
}

fn distinct(labels: impl Iterator<Item = String>) -> Vec<String> {
    let mut seen: Vec<String> = Vec::new();
    for label in labels {
        if !seen.contains(&label) {
            seen.push(label);
        }
    }
    seen
}

/// Computes dashboard statistics for the records matching `filter`.
pub fn accident_stats(records: &[AccidentRecord], filter: &StatsFilter) -> AccidentStats {
    let filtered: Vec<&AccidentRecord> = records.iter().filter(|r| filter.matches(r)).collect();

    let total_victims = filtered.iter().map(|r| u64::from(r.victims.count())).sum();

    let by_category = count_labels(filtered.iter().map(|r| r.cause_category.as_str()));
    let by_month = count_labels(filtered.iter().map(|r| r.month_name()));

    let mut top_states = count_labels(filtered.iter().map(|r| r.state.as_str()));
    top_states.sort_by(|a, b| b.count.cmp(&a.count));
    top_states.truncate(MAX_TOP_STATES);

    AccidentStats {
        total_accidents: filtered.len(),
        total_victims,
        by_category,
        by_month,
        top_states,
        years: distinct(records.iter().map(|r| r.year_label())),
        states: distinct(records.iter().map(|r| r.state.clone())),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{AccidentDate, SchemaKind, Victim, Victims};

    fn record(state: &str, cause: &str, date: Option<AccidentDate>, victims: usize) -> AccidentRecord {
        let mut rec = AccidentRecord::unknown("fatal_accidents_2015", SchemaKind::Fatal);
        rec.state = state.to_string();
        rec.cause_category = cause.to_string();
        rec.date = date;
        rec.victims = Victims::Listed {
            victims: (0..victims)
                .map(|i| Victim { name: format!("V{}", i), role: "Miner".into(), age: None })
                .collect(),
        };
        rec
    }

    fn date(month: u32, year: i32) -> Option<AccidentDate> {
        Some(AccidentDate { day: 1, month, year })
    }

    #[test]
    fn test_unfiltered_totals() {
        let records = vec![
            record("Jharkhand", "Ground Movement", date(1, 2015), 2),
            record("Odisha", "Machinery", date(1, 2015), 1),
            record("Jharkhand", "Ground Movement", date(3, 2016), 1),
        ];
        let stats = accident_stats(&records, &StatsFilter::all());
        assert_eq!(stats.total_accidents, 3);
        assert_eq!(stats.total_victims, 4);
        assert_eq!(
            stats.by_category,
            vec![
                LabelCount { label: "Ground Movement".into(), count: 2 },
                LabelCount { label: "Machinery".into(), count: 1 },
            ]
        );
        assert_eq!(stats.by_month[0], LabelCount { label: "Jan".into(), count: 2 });
        assert_eq!(stats.top_states[0].label, "Jharkhand");
        assert_eq!(stats.years, vec!["2015", "2016"]);
    }

    #[test]
    fn test_year_and_state_filters_match_exactly() {
        let records = vec![
            record("Jharkhand", "Ground Movement", date(1, 2015), 1),
            record("Odisha", "Machinery", date(1, 2015), 1),
            record("Jharkhand", "Transport", date(2, 2016), 1),
        ];
        let stats = accident_stats(&records, &StatsFilter::new("2015", "Jharkhand"));
        assert_eq!(stats.total_accidents, 1);
        assert_eq!(stats.by_category[0].label, "Ground Movement");

        let stats = accident_stats(&records, &StatsFilter::new("15", ALL));
        assert_eq!(stats.total_accidents, 0, "year filter is not a substring match");
        assert_eq!(stats.states.len(), 2, "filter pickers list the whole register");
    }

    #[test]
    fn test_undated_records_fall_under_unknown() {
        let records = vec![record("Goa", "Transport", None, 0)];
        let stats = accident_stats(&records, &StatsFilter::new("Unknown", ALL));
        assert_eq!(stats.total_accidents, 1);
        assert_eq!(stats.by_month[0].label, "Unknown");
    }

    #[test]
    fn test_historical_victims_count_killed() {
        let mut rec = record("Unknown", "Unknown", date(12, 1975), 0);
        rec.victims = Victims::Counted { killed: 375, seriously_injured: 0 };
        let stats = accident_stats(&[rec], &StatsFilter::all());
        assert_eq!(stats.total_victims, 375);
    }
}
