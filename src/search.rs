/// Client boundary for the external semantic snippet search service.
///
/// The conversational assistant answers questions from accident reports
/// retrieved by an external embedding index. This module defines the
/// interface the rest of the system consumes (`SnippetSearch`), an HTTP
/// client for it, and the text block each accident contributes to the
/// index. None of the analytical operations depend on search.
///
/// Expected endpoint contract:
///   POST {endpoint}  {"query": "...", "k": 5, "min_score": 0.5}
///   200 OK           {"results": [{"content": "...", "score": 0.83}, ...]}

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::logging::{self, Component};
use crate::model::{AccidentRecord, EngineError, SchemaKind, UNKNOWN, Victims};

/// Default request timeout for the search service.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

// ============================================================================
// Interface
// ============================================================================

/// One retrieved passage with its similarity score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedSnippet {
    pub content: String,
    pub score: f64,
}

/// Ranked retrieval of accident-report passages.
pub trait SnippetSearch {
    /// Returns at most `k` snippets scoring at least `min_score`, best first.
    fn search(&self, query: &str, k: usize, min_score: f64)
    -> Result<Vec<RankedSnippet>, EngineError>;
}

/// Applies the `k` / `min_score` contract to a raw result list.
pub fn rank_snippets(mut snippets: Vec<RankedSnippet>, k: usize, min_score: f64) -> Vec<RankedSnippet> {
    snippets.retain(|s| s.score >= min_score);
    snippets.sort_by(|a, b| b.score.total_cmp(&a.score));
    snippets.truncate(k);
    snippets
}

// ============================================================================
// HTTP Client
// ============================================================================

#[derive(Debug, Serialize)]
struct SearchRequest<'a> {
    query: &'a str,
    k: usize,
    min_score: f64,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    results: Vec<RankedSnippet>,
}

/// Parses a search service response body.
pub fn parse_search_response(body: &str) -> Result<Vec<RankedSnippet>, EngineError> {
    let response: SearchResponse = serde_json::from_str(body)
        .map_err(|e| EngineError::Search(format!("invalid response: {}", e)))?;
    Ok(response.results)
}

/// `SnippetSearch` backed by an HTTP endpoint.
pub struct HttpSnippetSearch {
    client: reqwest::blocking::Client,
    endpoint: String,
}

impl HttpSnippetSearch {
    pub fn new(endpoint: &str, timeout: Duration) -> Result<Self, EngineError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| EngineError::Search(format!("client setup failed: {}", e)))?;

        Ok(HttpSnippetSearch {
            client,
            endpoint: endpoint.to_string(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

impl SnippetSearch for HttpSnippetSearch {
    fn search(
        &self,
        query: &str,
        k: usize,
        min_score: f64,
    ) -> Result<Vec<RankedSnippet>, EngineError> {
        let request = SearchRequest { query, k, min_score };

        let response = self
            .client
            .post(&self.endpoint)
            .header("Accept", "application/json")
            .json(&request)
            .send()
            .map_err(|e| EngineError::Search(format!("request failed: {}", e)))?;

        if !response.status().is_success() {
            let message = format!("HTTP {}", response.status());
            logging::error(Component::Search, Some(&self.endpoint), &message);
            return Err(EngineError::Search(message));
        }

        let body = response
            .text()
            .map_err(|e| EngineError::Search(format!("failed to read response: {}", e)))?;
        let results = rank_snippets(parse_search_response(&body)?, k, min_score);

        logging::debug(
            Component::Search,
            Some(&self.endpoint),
            &format!("{} snippets for '{}'", results.len(), query),
        );

        Ok(results)
    }
}

// ============================================================================
// Index Documents
// ============================================================================

fn or_placeholder<'a>(value: &'a str, placeholder: &'a str) -> &'a str {
    if value.is_empty() { placeholder } else { value }
}

/// The historical register has no category; its free-text cause stands in.
fn cause_category(rec: &AccidentRecord) -> &str {
    if rec.schema == SchemaKind::Historical && rec.cause_category == UNKNOWN {
        &rec.cause_specific
    } else {
        &rec.cause_category
    }
}

/// The text block an accident contributes to the search index.
pub fn search_document(rec: &AccidentRecord) -> String {
    let date = rec
        .date
        .map(|d| format!("{:02}/{:02}/{}", d.day, d.month, d.year))
        .unwrap_or_else(|| "Unknown".to_string());

    let casualties = match &rec.victims {
        Victims::Listed { victims } => format!("Victims: {} person(s)", victims.len()),
        Victims::Counted { killed, seriously_injured } => format!(
            "Casualties: {} killed, {} seriously injured",
            killed, seriously_injured
        ),
    };

    [
        "Mining Accident Report:".to_string(),
        format!("Date: {}", date),
        format!("Mine: {}", or_placeholder(&rec.mine_name, "Unknown")),
        format!("Location: {}, {}", rec.district, rec.state),
        format!("Cause Category: {}", cause_category(rec)),
        format!("Cause Specific: {}", rec.cause_specific),
        format!("Description: {}", or_placeholder(&rec.description, "No description")),
        format!(
            "Avertable Factors: {}",
            or_placeholder(&rec.avertable_factors, "Not specified")
        ),
        casualties,
        format!("Owner: {}", or_placeholder(&rec.owner, "Unknown")),
    ]
    .join("\n")
}

// ============================================================================
// Tests
// ============================================================================
