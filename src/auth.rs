//! Shared-password edit gate and signed session tokens
//!
//! A correct password grants "edit allowed" for the session. The grant is
//! carried in a cookie holding `<expiry>.<hmac>`, where the HMAC-SHA256 is
//! computed over `edit:<expiry>` with the configured signing secret.

use chrono::{DateTime, Utc};
use hmac::{Hmac, Mac};
use sha2::{Digest, Sha256};

use crate::config::AppConfig;

type HmacSha256 = Hmac<Sha256>;

/// Cookie carrying the edit grant
pub const SESSION_COOKIE: &str = "bet_tracker_session";

/// Default lifetime of an edit grant
pub const DEFAULT_SESSION_TTL_SECS: i64 = 7 * 24 * 60 * 60;

#[derive(Clone)]
pub struct AuthGate {
    password_digest: [u8; 32],
    secret: Vec<u8>,
    ttl_secs: i64,
}

impl std::fmt::Debug for AuthGate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthGate")
            .field("ttl_secs", &self.ttl_secs)
            .finish_non_exhaustive()
    }
}

impl AuthGate {
    pub fn new(password: &str, secret: &str) -> Self {
        Self {
            password_digest: digest(password),
            secret: secret.as_bytes().to_vec(),
            ttl_secs: DEFAULT_SESSION_TTL_SECS,
        }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(&config.password, config.signing_secret())
    }

    pub fn with_ttl(mut self, ttl_secs: i64) -> Self {
        self.ttl_secs = ttl_secs;
        self
    }

    pub fn ttl_secs(&self) -> i64 {
        self.ttl_secs
    }

    /// Compare user input against the shared password
    pub fn check_password(&self, input: &str) -> bool {
        digests_match(&digest(input), &self.password_digest)
    }

    /// Issue a signed edit grant valid for the configured TTL
    pub fn issue_token(&self, now: DateTime<Utc>) -> String {
        let expiry = now.timestamp() + self.ttl_secs;
        format!("{}.{}", expiry, hex::encode(self.sign(expiry)))
    }

    /// Check signature and expiry of an edit grant
    pub fn verify_token(&self, token: &str, now: DateTime<Utc>) -> bool {
        let Some((expiry, signature)) = token.trim().split_once('.') else {
            return false;
        };
        let Ok(expiry) = expiry.parse::<i64>() else {
            return false;
        };
        if expiry <= now.timestamp() {
            return false;
        }
        let Ok(signature) = hex::decode(signature) else {
            return false;
        };

        match self.mac(expiry) {
            Some(mac) => mac.verify_slice(&signature).is_ok(),
            None => false,
        }
    }

    fn sign(&self, expiry: i64) -> Vec<u8> {
        self.mac(expiry)
            .map(|mac| mac.finalize().into_bytes().to_vec())
            .unwrap_or_default()
    }

    /// MAC primed with the grant payload for `expiry`
    fn mac(&self, expiry: i64) -> Option<HmacSha256> {
        // HMAC takes keys of any length, so this only fails in theory
        let mut mac = <HmacSha256 as Mac>::new_from_slice(&self.secret).ok()?;
        mac.update(format!("edit:{}", expiry).as_bytes());
        Some(mac)
    }
}

fn digest(input: &str) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(input.as_bytes());
    hasher.finalize().into()
}

/// Equal-length digests compared without early exit
fn digests_match(a: &[u8; 32], b: &[u8; 32]) -> bool {
    a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn gate() -> AuthGate {
        AuthGate::new("secret123", "signing-key")
    }

    #[test]
    fn test_check_password() {
        let gate = gate();
        assert!(gate.check_password("secret123"));
        assert!(!gate.check_password("secret124"));
        assert!(!gate.check_password(""));
    }

    #[test]
    fn test_token_roundtrip() {
        let gate = gate();
        let now = Utc::now();
        let token = gate.issue_token(now);
        assert!(gate.verify_token(&token, now));
        assert!(gate.verify_token(&token, now + Duration::days(6)));
    }

    #[test]
    fn test_token_expires() {
        let gate = gate().with_ttl(60);
        let now = Utc::now();
        let token = gate.issue_token(now);
        assert!(!gate.verify_token(&token, now + Duration::seconds(61)));
    }

    #[test]
    fn test_token_tampered() {
        let gate = gate();
        let now = Utc::now();
        let token = gate.issue_token(now);
        let (expiry, signature) = token.split_once('.').unwrap();

        // Extending the expiry invalidates the signature
        let forged = format!("{}.{}", expiry.parse::<i64>().unwrap() + 1000, signature);
        assert!(!gate.verify_token(&forged, now));

        assert!(!gate.verify_token("garbage", now));
        assert!(!gate.verify_token("123.zz", now));
        assert!(!gate.verify_token("", now));
    }

    #[test]
    fn test_token_truncated_signature_rejected() {
        let gate = gate();
        let now = Utc::now();
        let token = gate.issue_token(now);

        // Dropping trailing bytes of the MAC must not pass verification
        let short = &token[..token.len() - 2];
        assert!(!gate.verify_token(short, now));

        let (expiry, _) = token.split_once('.').unwrap();
        assert!(!gate.verify_token(&format!("{}.", expiry), now));
    }

    #[test]
    fn test_token_rejected_with_other_secret() {
        let now = Utc::now();
        let token = gate().issue_token(now);
        let other = AuthGate::new("secret123", "different-key");
        assert!(!other.verify_token(&token, now));
    }

    #[test]
    fn test_debug_hides_secrets() {
        let printed = format!("{:?}", gate());
        assert!(!printed.contains("signing-key"));
    }
}
