use std::process;

use clap::Parser;

use boolr::error::BooliError;
use boolr::fetch::{Endpoint, FetchOptions};
use boolr::model::SearchResult;
use boolr::query::{Interval, ObjectType, Query};
use boolr::sign::Credentials;
use boolr::table;

#[derive(Parser)]
#[command(
    name = "boolr",
    about = "Search Booli property listings from the terminal",
    version,
    after_help = "\
Examples:
  boolr search -q Södermalm --limit 10
  boolr search --area-id 115341 --min-rooms 3 --max-price 6000000
  boolr search -q Nacka -t villa,radhus --json --pretty
  boolr search --center 59.3145,18.0736 --dim 1000 --price-decreased

Credentials:
  Set BOOLI_CALLER_ID and BOOLI_KEY (https://www.booli.se/p/api).

Agent-optimized:
  boolr search -q Nacka --compact --top 5"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Subcommand)]
enum Commands {
    #[command(
        about = "Search for listings",
        long_about = "Search Booli for property listings matching the given filters.\n\
            All filters are optional; omitted filters match everything.\n\
            For AI agents: use --compact --top N for minimal output.",
        after_help = "\
Examples:
  Free text:     boolr search -q Södermalm --limit 10
  Area + range:  boolr search --area-id 115341 --min-rooms 3 --max-price 6000000
  Object types:  boolr search -q Nacka -t villa,radhus
  Radius:        boolr search --center 59.3145,18.0736 --dim 1000
  JSON output:   boolr search -q Nacka --json --pretty
  Signed URL:    boolr search -q Nacka --url"
    )]
    Search(SearchArgs),
    #[command(about = "Start MCP server for AI agents (stdio transport)")]
    Mcp,
}

#[derive(clap::Args)]
struct SearchArgs {
    #[arg(
        short,
        long,
        value_name = "TEXT",
        help = "Free-text search (address, area or city name)"
    )]
    query: Option<String>,

    #[arg(
        long,
        value_name = "LAT,LON",
        help = "Search origin coordinate",
        long_help = "Search origin as decimal degrees, e.g. 59.3145,18.0736. \
            Combine with --dim to bound the search."
    )]
    center: Option<String>,

    #[arg(
        long,
        value_name = "DIM",
        help = "Search radius/bounding dimension (used with --center)"
    )]
    dim: Option<String>,

    #[arg(long, value_name = "ID", help = "Predefined Booli area id")]
    area_id: Option<String>,

    #[arg(long, value_name = "KR", help = "Minimum list price")]
    min_price: Option<f64>,

    #[arg(long, value_name = "KR", help = "Maximum list price")]
    max_price: Option<f64>,

    #[arg(long, value_name = "N", help = "Minimum number of rooms")]
    min_rooms: Option<f64>,

    #[arg(long, value_name = "N", help = "Maximum number of rooms")]
    max_rooms: Option<f64>,

    #[arg(long, value_name = "KR", help = "Minimum price per square meter")]
    min_sqm_price: Option<f64>,

    #[arg(long, value_name = "KR", help = "Maximum price per square meter")]
    max_sqm_price: Option<f64>,

    #[arg(long, value_name = "M2", help = "Minimum living area")]
    min_living_area: Option<f64>,

    #[arg(long, value_name = "M2", help = "Maximum living area")]
    max_living_area: Option<f64>,

    #[arg(long, value_name = "M2", help = "Minimum plot area")]
    min_plot_area: Option<f64>,

    #[arg(long, value_name = "M2", help = "Maximum plot area")]
    max_plot_area: Option<f64>,

    #[arg(long, value_name = "YEAR", help = "Earliest construction year")]
    min_year: Option<u32>,

    #[arg(long, value_name = "YEAR", help = "Latest construction year")]
    max_year: Option<u32>,

    #[arg(
        short = 't',
        long,
        value_name = "TYPE,...",
        help = "Property types (comma-separated)",
        long_help = "Property types as a comma-separated list of Booli's tokens: \
            villa, lägenhet, gård, tomt-mark, fritidshus, parhus, radhus, kedjehus."
    )]
    object_type: Option<String>,

    #[arg(long, help = "Only listings whose price has decreased")]
    price_decreased: bool,

    #[arg(long, help = "Only new-construction listings")]
    new_construction: bool,

    #[arg(long, value_name = "N", help = "Maximum number of listings to return")]
    limit: Option<u32>,

    #[arg(long, value_name = "N", help = "Pagination offset")]
    offset: Option<u32>,

    #[arg(long, value_name = "N", help = "Show only the N cheapest results")]
    top: Option<usize>,

    #[arg(long, help = "One-line-per-listing output (recommended for scripts and AI agents)")]
    compact: bool,

    #[arg(long, help = "Output as JSON")]
    json: bool,

    #[arg(long, help = "Output as pretty-printed JSON")]
    pretty: bool,

    #[arg(long, help = "Print the signed request URL and exit (no request made)")]
    url: bool,

    #[arg(long, help = "Open the signed request URL in the browser")]
    open: bool,

    #[arg(long, help = "Go through the booli.se browser proxy endpoint")]
    browser_proxy: bool,

    #[arg(long, value_name = "URL", help = "HTTP or SOCKS5 proxy")]
    proxy: Option<String>,

    #[arg(long, default_value = "30", value_name = "SECS", help = "Request timeout")]
    timeout: u64,
}

fn is_json(args: &SearchArgs) -> bool {
    args.json || args.pretty
}

fn apply_top(result: &mut SearchResult, n: usize) {
    result
        .listings
        .sort_by_key(|l| l.list_price.unwrap_or(i64::MAX));
    result.listings.truncate(n);
}

fn error_code(err: &BooliError) -> i32 {
    match err {
        BooliError::MissingCredential(_)
        | BooliError::InvalidObjectType(_)
        | BooliError::InvalidCoordinate(_)
        | BooliError::Validation(_) => 2,
        BooliError::Timeout
        | BooliError::ConnectionFailed(_)
        | BooliError::DnsResolution(_)
        | BooliError::TlsError(_)
        | BooliError::ProxyError(_) => 3,
        BooliError::RateLimited | BooliError::Blocked(_) => 4,
        BooliError::HttpStatus(_) => 5,
        BooliError::Parse(_) => 6,
    }
}

fn error_kind(err: &BooliError) -> &'static str {
    match err {
        BooliError::MissingCredential(_) => "config_error",
        BooliError::InvalidObjectType(_) => "invalid_object_type",
        BooliError::InvalidCoordinate(_) => "invalid_coordinate",
        BooliError::Validation(_) => "validation_error",
        BooliError::Timeout => "timeout",
        BooliError::ConnectionFailed(_) => "connection_failed",
        BooliError::DnsResolution(_) => "dns_error",
        BooliError::TlsError(_) => "tls_error",
        BooliError::ProxyError(_) => "proxy_error",
        BooliError::RateLimited => "rate_limited",
        BooliError::Blocked(_) => "blocked",
        BooliError::HttpStatus(_) => "http_error",
        BooliError::Parse(_) => "parse_error",
    }
}

fn die(err: &BooliError, json_mode: bool) -> ! {
    if json_mode {
        let json = serde_json::json!({
            "error": {
                "kind": error_kind(err),
                "message": err.to_string(),
            }
        });
        println!("{}", serde_json::to_string(&json).unwrap());
    } else {
        eprintln!("error: {err}");
    }
    process::exit(error_code(err));
}

fn parse_center(s: &str) -> Result<(f64, f64), BooliError> {
    let (lat, lon) = s
        .split_once(',')
        .ok_or_else(|| BooliError::InvalidCoordinate(format!("\"{s}\" is not LAT,LON")))?;
    let lat: f64 = lat
        .trim()
        .parse()
        .map_err(|_| BooliError::InvalidCoordinate(format!("\"{lat}\" is not a number")))?;
    let lon: f64 = lon
        .trim()
        .parse()
        .map_err(|_| BooliError::InvalidCoordinate(format!("\"{lon}\" is not a number")))?;
    Ok((lat, lon))
}

fn parse_object_types(s: &str) -> Result<Vec<ObjectType>, BooliError> {
    s.split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(ObjectType::from_str_loose)
        .collect()
}

fn interval<T>(min: Option<T>, max: Option<T>) -> Option<Interval<T>> {
    if min.is_none() && max.is_none() {
        None
    } else {
        Some(Interval { min, max })
    }
}

fn build_query(args: &SearchArgs) -> Result<Query, BooliError> {
    let center = args.center.as_deref().map(parse_center).transpose()?;
    let object_type = args
        .object_type
        .as_deref()
        .map(parse_object_types)
        .transpose()?;

    Ok(Query {
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
        only_price_decreased: args.price_decreased,
        is_new_construction: args.new_construction.then_some(true),
        limit: args.limit,
        offset: args.offset,
    })
}

fn print_compact(result: &SearchResult) {
    for listing in &result.listings {
        let price = table::format_price(listing.list_price);
        let address = table::format_address(listing);
        let area = table::format_area(listing);
        println!(
            "{price} | {address} | {area} | {} | {} rum | {} m² | {}",
            listing.object_type, listing.rooms, listing.living_area, listing.url
        );
    }
}

fn print_result(result: &SearchResult, args: &SearchArgs) {
    if args.compact {
        if result.listings.is_empty() {
            println!("No listings found.");
            return;
        }
        print_compact(result);
    } else if is_json(args) {
        let output = if args.pretty {
            serde_json::to_string_pretty(result).unwrap()
        } else {
            serde_json::to_string(result).unwrap()
        };
        println!("{output}");
    } else {
        if result.listings.is_empty() {
            println!("No listings found.");
            return;
        }
        println!("{}", table::render(result));
        println!(
            "{} of {} listings (offset {})",
            result.count, result.total_count, result.offset
        );
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    match cli.command {
        Commands::Mcp => boolr::mcp::run().await,
        Commands::Search(args) => {
            let json_mode = is_json(&args);

            let credentials = match Credentials::from_env() {
                Ok(c) => c,
                Err(e) => die(&e, json_mode),
            };

            let query = match build_query(&args) {
                Ok(q) => q,
                Err(e) => die(&e, json_mode),
            };

            if let Err(e) = query.validate() {
                die(&e, json_mode);
            }

            let endpoint = if args.browser_proxy {
                Endpoint::BrowserProxy
            } else {
                Endpoint::Api
            };

            if args.url || args.open {
                let url = boolr::signed_url(&query, &credentials, endpoint);
                if args.url {
                    println!("{url}");
                } else {
                    println!("Opening: {url}");
                    if let Err(e) = open::that(&url) {
                        die(
                            &BooliError::Validation(format!("failed to open browser: {e}")),
                            json_mode,
                        );
                    }
                }
                return;
            }

            let fetch_options = FetchOptions {
                endpoint,
                proxy: args.proxy.clone(),
                timeout: args.timeout,
            };

            match boolr::search(query, &credentials, fetch_options).await {
                Ok(mut result) => {
                    if let Some(n) = args.top {
                        apply_top(&mut result, n);
                    }
                    print_result(&result, &args);
                }
                Err(e) => die(&e, json_mode),
            }
        }
    }
}
