use std::fmt;

#[derive(Debug)]
pub enum BooliError {
    MissingCredential(&'static str),
    InvalidObjectType(String),
    InvalidCoordinate(String),
    Validation(String),
    Timeout,
    ConnectionFailed(String),
    DnsResolution(String),
    ProxyError(String),
    RateLimited,
    Blocked(u16),
    HttpStatus(u16),
    TlsError(String),
    Parse(String),
}

impl fmt::Display for BooliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingCredential(var) => write!(
                f,
                "missing API credential — set the {var} environment variable. \
                 Credentials can be requested at https://www.booli.se/p/api"
            ),
            Self::InvalidObjectType(token) => write!(
                f,
                "unknown object type \"{token}\" — must be one of: villa, lägenhet, gård, \
                 tomt-mark, fritidshus, parhus, radhus, kedjehus"
            ),
            Self::InvalidCoordinate(detail) => write!(
                f,
                "invalid center coordinate — {detail}. \
                 Expected decimal degrees, e.g. 59.3293,18.0686"
            ),
            Self::Validation(msg) => write!(f, "{msg}"),
            Self::Timeout => write!(
                f,
                "request timed out — Booli may be slow or unreachable. \
                 Try increasing --timeout or check your connection"
            ),
            Self::ConnectionFailed(detail) => write!(
                f,
                "connection failed — check your internet connection ({detail})"
            ),
            Self::DnsResolution(host) => write!(
                f,
                "DNS resolution failed for {host} — check your internet connection"
            ),
            Self::ProxyError(detail) => write!(
                f,
                "proxy error — check your --proxy URL is correct ({detail})"
            ),
            Self::RateLimited => write!(
                f,
                "rate limited by Booli (HTTP 429) — wait a few minutes before retrying"
            ),
            Self::Blocked(status) => write!(
                f,
                "request blocked by Booli (HTTP {status}) — this usually means an \
                 invalid signature or revoked credentials. Check BOOLI_CALLER_ID and BOOLI_KEY"
            ),
            Self::HttpStatus(status) => {
                write!(f, "unexpected HTTP status {status} from the Booli API")
            }
            Self::TlsError(detail) => write!(
                f,
                "TLS/SSL error — connection to Booli failed ({detail})"
            ),
            Self::Parse(detail) => write!(
                f,
                "failed to parse the Booli API response — {detail}. \
                 This may indicate an upstream schema change"
            ),
        }
    }
}

impl std::error::Error for BooliError {}

pub fn from_http_error(err: wreq::Error) -> BooliError {
    let msg = err.to_string();
    let lower = msg.to_lowercase();

    if err.is_timeout() {
        return BooliError::Timeout;
    }

    if err.is_connect() {
        if lower.contains("dns") || lower.contains("resolve") || lower.contains("getaddrinfo") {
            return BooliError::DnsResolution(msg);
        }
        return BooliError::ConnectionFailed(msg);
    }

    if lower.contains("proxy") || lower.contains("socks") {
        return BooliError::ProxyError(msg);
    }

    if lower.contains("tls") || lower.contains("ssl") || lower.contains("certificate") {
        return BooliError::TlsError(msg);
    }

    if lower.contains("builder error") && lower.contains("uri") {
        return BooliError::ProxyError(msg);
    }

    BooliError::ConnectionFailed(msg)
}
