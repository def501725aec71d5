//! Regulation citations scanned out of avertable-factor text.
//!
//! Accident reports note which rule was breached in free text, e.g.
//! "Violation of Regulation 112 of MMR 1961". Audit findings cite a
//! regulation; the current policy is a single citation for the whole audit
//! period, chosen by `period_regulation`.

use std::sync::OnceLock;

use regex::Regex;

use crate::model::AccidentRecord;

/// Cited when no record in the period names a regulation.
pub const FALLBACK_REGULATION: &str = "MMR 1961 General Safety";

/// All citations in one piece of text, in order of appearance.
pub fn regulation_citations(text: &str) -> Vec<&str> {
    static REGULATION_RE: OnceLock<Regex> = OnceLock::new();
    let regex = REGULATION_RE
        .get_or_init(|| Regex::new(r"Regulation \d+").expect("regulation regex compiles"));
    regex.find_iter(text).map(|m| m.as_str()).collect()
}

/// Every regulation cited across `records` with its number of citations,
/// in order of first citation.
pub fn cited_regulations<'a, I>(records: I) -> Vec<(String, usize)>
where
    I: IntoIterator<Item = &'a AccidentRecord>,
{
    let mut cited: Vec<(String, usize)> = Vec::new();
    for rec in records {
        for citation in regulation_citations(&rec.avertable_factors) {
            match cited.iter_mut().find(|(reg, _)| reg == citation) {
                Some((_, count)) => *count += 1,
                None => cited.push((citation.to_string(), 1)),
            }
        }
    }
    cited
}

/// The regulation attached to every finding of an audit period: the first
/// citation found in record order, or `FALLBACK_REGULATION`.
pub fn period_regulation<'a, I>(records: I) -> String
where
    I: IntoIterator<Item = &'a AccidentRecord>,
{
    records
        .into_iter()
        .flat_map(|rec| regulation_citations(&rec.avertable_factors).into_iter().next())
        .next()
        .map(str::to_string)
        .unwrap_or_else(|| FALLBACK_REGULATION.to_string())
}
