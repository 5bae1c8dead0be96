//! Location search suggestions.

use serde_json::Value;
use tracing::error;

use crate::ai::{CompletionRequest, CompletionService};

/// Queries shorter than this return no suggestions.
pub const MIN_QUERY_CHARS: usize = 3;

/// Most suggestions returned from a successful search.
pub const MAX_SUGGESTIONS: usize = 5;

/// Most suggestions synthesized when the search fails.
const MAX_FALLBACK_SUGGESTIONS: usize = 3;

/// Up to five place names matching `query`.
pub async fn suggest_locations(service: &dyn CompletionService, query: &str) -> Vec<String> {
    let query = query.trim();
    if query.chars().count() < MIN_QUERY_CHARS {
        return Vec::new();
    }

    match service.complete(CompletionRequest::location_search(query)).await {
        Ok(value) => match value.get("locations") {
            Some(Value::Array(items)) => items
                .iter()
                .filter_map(Value::as_str)
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .take(MAX_SUGGESTIONS)
                .map(str::to_string)
                .collect(),
            _ => Vec::new(),
        },
        Err(e) => {
            error!(query = %query, error = %e, "Location search failed");
            fallback_suggestions(query)
        }
    }
}

/// Guesses built from the query itself: the query suffixed with the first
/// few common US states.
pub fn fallback_suggestions(query: &str) -> Vec<String> {
    ["CA", "NY", "TX"]
        .iter()
        .take(MAX_FALLBACK_SUGGESTIONS)
        .map(|state| format!("{}, {}, USA", query, state))
        .collect()
}
