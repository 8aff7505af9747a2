pub mod error;
pub mod fetch;
pub mod mcp;
pub mod model;
pub mod parse;
pub mod query;
pub mod sign;
pub mod table;

use error::BooliError;
use fetch::{Endpoint, FetchOptions};
use model::SearchResult;
use query::Query;
use sign::Credentials;

pub async fn search(
    query: Query,
    credentials: &Credentials,
    options: FetchOptions,
) -> Result<SearchResult, BooliError> {
    query.validate()?;
    let params = query.build_params(credentials);
    let body = fetch::fetch_json(&params, &options).await?;
    parse::parse_response(&body)
}

/// A ready-to-open signed URL for the given query. Signed URLs are
/// single-use: the signature embeds a fresh token and timestamp.
pub fn signed_url(query: &Query, credentials: &Credentials, endpoint: Endpoint) -> String {
    endpoint.url_for(&query.build_params(credentials))
}
