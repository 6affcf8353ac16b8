//! Self-issued bearer token: `userId:email:issuedAtMillis`, base64-encoded.
//!
//! The encoding is reversible, carries no signature and no expiry; the only
//! check at resolve time is that the named user id still exists. Clients
//! hold it as a fallback credential for contexts where the session cookie
//! is not delivered. Known weakness, kept as documented behavior.

use base64ct::{Base64, Encoding};
use time::OffsetDateTime;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BearerToken {
    pub user_id: Uuid,
    pub email: String,
    pub issued_at_ms: i64,
}

pub fn issue(user_id: Uuid, email: &str) -> String {
    issue_at(user_id, email, OffsetDateTime::now_utc())
}

pub fn issue_at(user_id: Uuid, email: &str, issued_at: OffsetDateTime) -> String {
    let millis = (issued_at.unix_timestamp_nanos() / 1_000_000) as i64;
    Base64::encode_string(format!("{}:{}:{}", user_id, email, millis).as_bytes())
}

/// Decode a bearer token. Returns `None` for anything that is not a
/// well-formed `userId:email:millis` tuple; age is never checked.
pub fn decode(raw: &str) -> Option<BearerToken> {
    let bytes = Base64::decode_vec(raw.trim()).ok()?;
    let text = String::from_utf8(bytes).ok()?;
    let mut parts = text.splitn(3, ':');
    let user_id = Uuid::parse_str(parts.next()?).ok()?;
    let email = parts.next()?.to_string();
    let issued_at_ms = parts.next()?.parse().ok()?;
    Some(BearerToken {
        user_id,
        email,
        issued_at_ms,
    })
}
