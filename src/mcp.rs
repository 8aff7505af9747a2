use rmcp::handler::server::tool::ToolRouter;
use rmcp::handler::server::wrapper::Parameters;
use rmcp::model::*;
use rmcp::schemars;
use rmcp::{tool, tool_handler, tool_router, ErrorData as McpError, ServerHandler, ServiceExt};
use serde::Deserialize;

use crate::error::BooliError;
use crate::fetch::{Endpoint, FetchOptions};
use crate::model::SearchResult;
use crate::query::{Interval, ObjectType, Query};
use crate::sign::Credentials;

#[derive(Debug, Deserialize, schemars::JsonSchema)]
struct SearchArgs {
    #[schemars(description = "Free-text search: address, area or city name. Example: Södermalm")]
    query: Option<String>,
    #[schemars(
        description = "Search origin as \"LAT,LON\" decimal degrees. Example: 59.3145,18.0736"
    )]
    center: Option<String>,
    #[schemars(description = "Search radius/bounding dimension, used together with center")]
    dim: Option<String>,
    #[schemars(description = "Predefined Booli area id. Example: 115341")]
    area_id: Option<String>,
    #[schemars(description = "Minimum list price in SEK")]
    min_price: Option<f64>,
    #[schemars(description = "Maximum list price in SEK")]
    max_price: Option<f64>,
    #[schemars(description = "Minimum number of rooms")]
    min_rooms: Option<f64>,
    #[schemars(description = "Maximum number of rooms")]
    max_rooms: Option<f64>,
    #[schemars(description = "Minimum price per square meter in SEK")]
    min_sqm_price: Option<f64>,
    #[schemars(description = "Maximum price per square meter in SEK")]
    max_sqm_price: Option<f64>,
    #[schemars(description = "Minimum living area in square meters")]
    min_living_area: Option<f64>,
    #[schemars(description = "Maximum living area in square meters")]
    max_living_area: Option<f64>,
    #[schemars(description = "Minimum plot area in square meters")]
    min_plot_area: Option<f64>,
    #[schemars(description = "Maximum plot area in square meters")]
    max_plot_area: Option<f64>,
    #[schemars(description = "Earliest construction year")]
    min_year: Option<u32>,
    #[schemars(description = "Latest construction year")]
    max_year: Option<u32>,
    #[schemars(
        description = "Comma-separated property types. Valid tokens: villa, lägenhet, gård, \
            tomt-mark, fritidshus, parhus, radhus, kedjehus"
    )]
    object_type: Option<String>,
    #[schemars(description = "Only listings whose price has decreased. Default: false")]
    price_decreased: Option<bool>,
    #[schemars(description = "Only new-construction listings. Default: false")]
    new_construction: Option<bool>,
    #[schemars(description = "Maximum number of listings to return")]
    limit: Option<u32>,
    #[schemars(description = "Pagination offset")]
    offset: Option<u32>,
    #[schemars(description = "Return only the N cheapest listings")]
    top: Option<usize>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
struct OpenUrlArgs {
    #[schemars(description = "URL to open. Must start with http:// or https://")]
    url: String,
}

fn tool_error(msg: impl Into<String>) -> Result<CallToolResult, McpError> {
    Ok(CallToolResult::error(vec![Content::text(msg.into())]))
}

fn apply_top(result: &mut SearchResult, n: usize) {
    result
        .listings
        .sort_by_key(|l| l.list_price.unwrap_or(i64::MAX));
    result.listings.truncate(n);
}

fn interval<T>(min: Option<T>, max: Option<T>) -> Option<Interval<T>> {
    if min.is_none() && max.is_none() {
        None
    } else {
        Some(Interval { min, max })
    }
}

fn parse_center(s: &str) -> Result<(f64, f64), BooliError> {
    let (lat, lon) = s
        .split_once(',')
        .ok_or_else(|| BooliError::InvalidCoordinate(format!("\"{s}\" is not LAT,LON")))?;
    let lat = lat
        .trim()
        .parse()
        .map_err(|_| BooliError::InvalidCoordinate(format!("\"{lat}\" is not a number")))?;
    let lon = lon
        .trim()
        .parse()
        .map_err(|_| BooliError::InvalidCoordinate(format!("\"{lon}\" is not a number")))?;
    Ok((lat, lon))
}

fn build_query(args: &SearchArgs) -> Result<Query, BooliError> {
    let center = args.center.as_deref().map(parse_center).transpose()?;

    let object_type = args
        .object_type
        .as_deref()
        .map(|s| {
            s.split(',')
                .map(str::trim)
                .filter(|t| !t.is_empty())
                .map(ObjectType::from_str_loose)
                .collect::<Result<Vec<_>, _>>()
        })
        .transpose()?;

    let query = Query {
        query: args.query.clone(),
        center,
        dim: args.dim.clone(),
        area_id: args.area_id.clone(),
        price_interval: None,
        rooms: interval(args.min_rooms, args.max_rooms),
        price: interval(args.min_price, args.max_price),
        price_sqm: interval(args.min_sqm_price, args.max_sqm_price),
        living_area: interval(args.min_living_area, args.max_living_area),
        plot_area: interval(args.min_plot_area, args.max_plot_area),
        construction_year: interval(args.min_year, args.max_year),
        object_type,
        only_price_decreased: args.price_decreased.unwrap_or(false),
        is_new_construction: args.new_construction.unwrap_or(false).then_some(true),
        limit: args.limit,
        offset: args.offset,
    };

    query.validate()?;
    Ok(query)
}

#[derive(Debug, Clone)]
struct BoolrMcp {
    tool_router: ToolRouter<Self>,
}

#[tool_router]
impl BoolrMcp {
    fn new() -> Self {
        Self {
            tool_router: Self::tool_router(),
        }
    }

    #[tool(
        description = "Search Booli property listings and return results as JSON. All filters \
            are optional; omitted filters match everything. Returns listings with address, \
            price, rooms, living area, construction year and the booli.se URL. Requires \
            BOOLI_CALLER_ID and BOOLI_KEY in the server environment."
    )]
    async fn booli_search(
        &self,
        Parameters(args): Parameters<SearchArgs>,
    ) -> Result<CallToolResult, McpError> {
        let credentials = match Credentials::from_env() {
            Ok(c) => c,
            Err(e) => return tool_error(e.to_string()),
        };

        let query = match build_query(&args) {
            Ok(q) => q,
            Err(e) => return tool_error(e.to_string()),
        };

        match crate::search(query, &credentials, FetchOptions::default()).await {
            Ok(mut result) => {
                if let Some(n) = args.top {
                    apply_top(&mut result, n);
                }
                let json = serde_json::to_string_pretty(&result).unwrap();
                Ok(CallToolResult::success(vec![Content::text(json)]))
            }
            Err(e) => tool_error(e.to_string()),
        }
    }

    #[tool(
        description = "Generate a signed Booli listings URL for the given search parameters. \
            This is the ONLY way to get a valid URL: every request needs a fresh signature \
            block that only this tool can compute. The URL is single-use. NEVER construct \
            Booli API URLs manually -- always use this tool, then open_url."
    )]
    async fn booli_get_url(
        &self,
        Parameters(args): Parameters<SearchArgs>,
    ) -> Result<CallToolResult, McpError> {
        let credentials = match Credentials::from_env() {
            Ok(c) => c,
            Err(e) => return tool_error(e.to_string()),
        };

        let query = match build_query(&args) {
            Ok(q) => q,
            Err(e) => return tool_error(e.to_string()),
        };

        let url = crate::signed_url(&query, &credentials, Endpoint::BrowserProxy);
        Ok(CallToolResult::success(vec![Content::text(url)]))
    }

    #[tool(description = "Open a URL in the default web browser. IMPORTANT: To open search \
        results, you MUST call booli_get_url first to get a signed URL, then pass that URL \
        here. NEVER construct Booli URLs yourself -- they require a signature that only \
        booli_get_url can produce.")]
    async fn open_url(
        &self,
        Parameters(args): Parameters<OpenUrlArgs>,
    ) -> Result<CallToolResult, McpError> {
        if !args.url.starts_with("http://") && !args.url.starts_with("https://") {
            return tool_error("URL must start with http:// or https://");
        }

        match open::that(&args.url) {
            Ok(()) => Ok(CallToolResult::success(vec![Content::text(format!(
                "Opened: {}",
                args.url
            ))])),
            Err(e) => tool_error(format!("failed to open browser: {e}")),
        }
    }
}

#[tool_handler]
impl ServerHandler for BoolrMcp {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::V_2024_11_05,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: "boolr".into(),
                version: env!("CARGO_PKG_VERSION").into(),
                ..Default::default()
            },
            instructions: Some(
                "Booli property search tool. Workflow: (1) booli_search to find listings. \
                 (2) To open results in a browser: call booli_get_url with the same params \
                 to get a signed URL, then call open_url with that URL. NEVER construct \
                 Booli API URLs yourself -- they require a per-request signature."
                    .into(),
            ),
        }
    }
}

pub async fn run() {
    let service = BoolrMcp::new()
        .serve(rmcp::transport::stdio())
        .await
        .expect("failed to start MCP server");
    service.waiting().await.expect("MCP server error");
}

#[cfg(test)]
mod tests {
    use super::*;

    fn empty_args() -> SearchArgs {
        serde_json::from_str("{}").unwrap()
    }

    #[test]
    fn empty_args_build_empty_query() {
        let query = build_query(&empty_args()).unwrap();
        assert!(query.query.is_none());
        assert!(query.rooms.is_none());
        assert!(!query.only_price_decreased);
        assert!(query.is_new_construction.is_none());
    }

    #[test]
    fn range_args_become_intervals() {
        let mut args = empty_args();
        args.min_rooms = Some(3.0);
        args.max_price = Some(6_000_000.0);
        let query = build_query(&args).unwrap();
        assert_eq!(query.rooms, Some(Interval::min(3.0)));
        assert_eq!(query.price, Some(Interval::max(6_000_000.0)));
    }

    #[test]
    fn bad_object_type_is_rejected() {
        let mut args = empty_args();
        args.object_type = Some("villa,slott".into());
        assert!(build_query(&args).is_err());
    }

    #[test]
    fn bad_center_is_rejected() {
        let mut args = empty_args();
        args.center = Some("59.3;18.0".into());
        assert!(build_query(&args).is_err());
    }
}
