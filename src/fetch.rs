use std::time::Duration;

use wreq::Client;
use wreq_util::Emulation;

use crate::error::{self, BooliError};

const LISTINGS_URL: &str = "https://api.booli.se/listings";
const PROXY_LISTINGS_URL: &str = "https://www.booli.se/api/proxy?url=/listings";

/// Which upstream base to hit: the API host directly, or the browser proxy
/// the booli.se frontend itself goes through.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Endpoint {
    #[default]
    Api,
    BrowserProxy,
}

impl Endpoint {
    /// Full request URL for an already-built query string. The proxy base
    /// carries its own `?url=` query, so params join with `&` there.
    pub fn url_for(&self, params: &str) -> String {
        match self {
            Self::Api => format!("{LISTINGS_URL}?{params}"),
            Self::BrowserProxy => format!("{PROXY_LISTINGS_URL}&{params}"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct FetchOptions {
    pub endpoint: Endpoint,
    pub proxy: Option<String>,
    pub timeout: u64,
}

impl Default for FetchOptions {
    fn default() -> Self {
        Self {
            endpoint: Endpoint::Api,
            proxy: None,
            timeout: 30,
        }
    }
}

pub async fn fetch_json(params: &str, options: &FetchOptions) -> Result<String, BooliError> {
    let mut builder = Client::builder()
        .emulation(Emulation::Chrome137)
        .timeout(Duration::from_secs(options.timeout));

    if let Some(ref proxy) = options.proxy {
        builder = builder.proxy(wreq::Proxy::all(proxy).map_err(error::from_http_error)?);
    }

    let client = builder.build().map_err(error::from_http_error)?;

    let response = client
        .get(options.endpoint.url_for(params))
        .send()
        .await
        .map_err(error::from_http_error)?;

    let status = response.status().as_u16();
    match status {
        200 => {}
        429 => return Err(BooliError::RateLimited),
        403 | 503 => return Err(BooliError::Blocked(status)),
        _ if status >= 400 => return Err(BooliError::HttpStatus(status)),
        _ => {}
    }

    response.text().await.map_err(error::from_http_error)
}
