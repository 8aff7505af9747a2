use crate::error::BooliError;
use crate::model::SearchResult;

/// Parse a listings response body into the typed result. A payload missing a
/// required field is a typed error, never partial data.
pub fn parse_response(body: &str) -> Result<SearchResult, BooliError> {
    serde_json::from_str(body).map_err(|e| BooliError::Parse(e.to_string()))
}
