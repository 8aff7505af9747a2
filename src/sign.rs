use std::time::{SystemTime, UNIX_EPOCH};

use rand::distributions::Alphanumeric;
use rand::Rng;
use sha1::{Digest, Sha1};

use crate::error::BooliError;

pub const CALLER_ID_VAR: &str = "BOOLI_CALLER_ID";
pub const API_KEY_VAR: &str = "BOOLI_KEY";

const TOKEN_LEN: usize = 16;

/// API credentials issued by Booli. Both values are required for signing;
/// construction fails rather than ever signing with an empty value.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub caller_id: String,
    pub api_key: String,
}

impl Credentials {
    pub fn new(
        caller_id: impl Into<String>,
        api_key: impl Into<String>,
    ) -> Result<Self, BooliError> {
        let caller_id = caller_id.into();
        let api_key = api_key.into();
        if caller_id.is_empty() {
            return Err(BooliError::MissingCredential(CALLER_ID_VAR));
        }
        if api_key.is_empty() {
            return Err(BooliError::MissingCredential(API_KEY_VAR));
        }
        Ok(Self { caller_id, api_key })
    }

    pub fn from_env() -> Result<Self, BooliError> {
        let caller_id = std::env::var(CALLER_ID_VAR)
            .map_err(|_| BooliError::MissingCredential(CALLER_ID_VAR))?;
        let api_key =
            std::env::var(API_KEY_VAR).map_err(|_| BooliError::MissingCredential(API_KEY_VAR))?;
        Self::new(caller_id, api_key)
    }
}

/// The callerId/time/unique/hash block that proves request authenticity.
/// Every block is single-use: the upstream verifier rejects replays, so a
/// fresh token and timestamp are captured per request.
#[derive(Debug, Clone)]
pub struct Signature {
    pub caller_id: String,
    pub time: u64,
    pub unique: String,
    pub hash: String,
}

impl Signature {
    pub fn generate(credentials: &Credentials) -> Self {
        let unique = random_token();
        let time = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0);
        Self::at(credentials, time, unique)
    }

    /// Deterministic inner constructor; `generate` supplies the clock and RNG.
    pub fn at(credentials: &Credentials, time: u64, unique: String) -> Self {
        let hash = sign(credentials, time, &unique);
        Self {
            caller_id: credentials.caller_id.clone(),
            time,
            unique,
            hash,
        }
    }

    pub fn append_to(&self, params: &mut String) {
        params.push_str(&format!(
            "&callerId={}&time={}&unique={}&hash={}",
            self.caller_id, self.time, self.unique, self.hash
        ));
    }
}

/// SHA-1 over the raw byte concatenation callerId + time + apiKey + token.
/// The verifier is order-sensitive and uses no delimiters.
pub fn sign(credentials: &Credentials, time: u64, unique: &str) -> String {
    let mut hasher = Sha1::new();
    hasher.update(credentials.caller_id.as_bytes());
    hasher.update(time.to_string().as_bytes());
    hasher.update(credentials.api_key.as_bytes());
    hasher.update(unique.as_bytes());
    hex_string(hasher.finalize().as_slice())
}

fn random_token() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(TOKEN_LEN)
        .map(char::from)
        .collect()
}

fn hex_string(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn creds() -> Credentials {
        Credentials::new("caller-test", "supersecret").unwrap()
    }

    #[test]
    fn sign_matches_known_vector() {
        // sha1("caller-test" + "1700000000" + "supersecret" + "aaaabbbbccccdddd")
        let hash = sign(&creds(), 1_700_000_000, "aaaabbbbccccdddd");
        assert_eq!(hash, "cd4a00e95b1a3522a808083cc6de917af8269f81");
    }

    #[test]
    fn signature_at_is_deterministic() {
        let a = Signature::at(&creds(), 1_700_000_000, "aaaabbbbccccdddd".into());
        let b = Signature::at(&creds(), 1_700_000_000, "aaaabbbbccccdddd".into());
        assert_eq!(a.hash, b.hash);
    }

    #[test]
    fn generated_tokens_are_unique() {
        let a = Signature::generate(&creds());
        let b = Signature::generate(&creds());
        assert_eq!(a.unique.len(), 16);
        assert_eq!(b.unique.len(), 16);
        assert_ne!(a.unique, b.unique);
        assert_ne!(a.hash, b.hash);
    }

    #[test]
    fn hash_is_lower_hex_sha1() {
        let s = Signature::generate(&creds());
        assert_eq!(s.hash.len(), 40);
        assert!(s.hash.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    }

    #[test]
    fn empty_credentials_rejected() {
        assert!(Credentials::new("", "key").is_err());
        assert!(Credentials::new("caller", "").is_err());
    }
}
