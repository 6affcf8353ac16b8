//! Request identity resolution: a prioritized chain of resolvers, first
//! match wins. Order matters — the verified session path is tried before
//! the two weaker fallbacks.

use async_trait::async_trait;
use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts},
};
use tracing::{debug, warn};
use uuid::Uuid;

use crate::auth::{repo::User, session, token};
use crate::error::ApiError;
use crate::state::AppState;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdentitySource {
    Session,
    LegacySession,
    BearerToken,
}

/// The acting user for a request.
#[derive(Debug, Clone)]
pub struct Identity {
    pub user_id: Uuid,
    pub email: Option<String>,
    pub is_admin: bool,
    pub source: IdentitySource,
}

#[async_trait]
trait IdentityResolver: Send + Sync {
    fn name(&self) -> &'static str;
    async fn resolve(&self, parts: &Parts, state: &AppState)
        -> anyhow::Result<Option<Identity>>;
}

/// A session row whose user_id resolves to a real user.
struct SessionResolver;

#[async_trait]
impl IdentityResolver for SessionResolver {
    fn name(&self) -> &'static str {
        "session"
    }

    async fn resolve(
        &self,
        parts: &Parts,
        state: &AppState,
    ) -> anyhow::Result<Option<Identity>> {
        let Some(sid) =
            session::session_id_from_headers(&parts.headers, &state.config.session_cookie)
        else {
            return Ok(None);
        };
        let Some(session) = session::find(&state.db, sid).await? else {
            return Ok(None);
        };
        let Some(user_id) = session.user_id else {
            return Ok(None);
        };
        let Some(user) = User::find_by_id(&state.db, user_id).await? else {
            return Ok(None);
        };
        Ok(Some(Identity {
            user_id: user.id,
            email: Some(user.email),
            is_admin: user.is_admin,
            source: IdentitySource::Session,
        }))
    }
}

/// Backward-compatible path: a session row whose JSON payload still carries
/// a bare "userId". The id is trusted without a user lookup — a weaker
/// contract inherited from older clients; such identities never carry the
/// admin flag.
struct LegacySessionResolver;

#[async_trait]
impl IdentityResolver for LegacySessionResolver {
    fn name(&self) -> &'static str {
        "legacy-session"
    }

    async fn resolve(
        &self,
        parts: &Parts,
        state: &AppState,
    ) -> anyhow::Result<Option<Identity>> {
        let Some(sid) =
            session::session_id_from_headers(&parts.headers, &state.config.session_cookie)
        else {
            return Ok(None);
        };
        let Some(session) = session::find(&state.db, sid).await? else {
            return Ok(None);
        };
        let Some(user_id) = session.data.as_ref().and_then(legacy_user_id) else {
            return Ok(None);
        };
        Ok(Some(Identity {
            user_id,
            email: None,
            is_admin: false,
            source: IdentitySource::LegacySession,
        }))
    }
}

/// `Authorization: Bearer` with the self-issued token. Decodes the tuple and
/// checks only that the named user id exists — no signature, no expiry.
struct BearerTokenResolver;

#[async_trait]
impl IdentityResolver for BearerTokenResolver {
    fn name(&self) -> &'static str {
        "bearer-token"
    }

    async fn resolve(
        &self,
        parts: &Parts,
        state: &AppState,
    ) -> anyhow::Result<Option<Identity>> {
        let Some(raw) = bearer_from_headers(&parts.headers) else {
            return Ok(None);
        };
        let Some(tok) = token::decode(raw) else {
            warn!("malformed bearer token");
            return Ok(None);
        };
        let Some(user) = User::find_by_id(&state.db, tok.user_id).await? else {
            return Ok(None);
        };
        if user.email != tok.email {
            warn!(user_id = %user.id, "bearer token email differs from current account email");
        }
        debug!(user_id = %user.id, issued_at_ms = tok.issued_at_ms, "bearer token accepted");
        Ok(Some(Identity {
            user_id: user.id,
            email: Some(user.email),
            is_admin: user.is_admin,
            source: IdentitySource::BearerToken,
        }))
    }
}

fn bearer_from_headers(headers: &axum::http::HeaderMap) -> Option<&str> {
    let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    value
        .strip_prefix("Bearer ")
        .or_else(|| value.strip_prefix("bearer "))
}

fn legacy_user_id(data: &serde_json::Value) -> Option<Uuid> {
    data.get("userId")
        .and_then(|v| v.as_str())
        .and_then(|s| Uuid::parse_str(s).ok())
}

pub async fn resolve_identity(
    parts: &Parts,
    state: &AppState,
) -> anyhow::Result<Option<Identity>> {
    let resolvers: [&dyn IdentityResolver; 3] =
        [&SessionResolver, &LegacySessionResolver, &BearerTokenResolver];
    for resolver in resolvers {
        if let Some(identity) = resolver.resolve(parts, state).await? {
            debug!(resolver = resolver.name(), user_id = %identity.user_id, "identity resolved");
            return Ok(Some(identity));
        }
    }
    Ok(None)
}

/// Requires a resolved identity; rejects with 401 otherwise.
pub struct AuthUser(pub Identity);

#[axum::async_trait]
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        match resolve_identity(parts, state).await {
            Ok(Some(identity)) => Ok(AuthUser(identity)),
            Ok(None) => Err(ApiError::unauthorized("Not authenticated")),
            Err(e) => Err(ApiError::Internal(e)),
        }
    }
}

/// Requires a resolved identity with the admin flag; anonymous and
/// non-admin requests both get 403.
pub struct AdminUser(pub Identity);

#[axum::async_trait]
impl FromRequestParts<AppState> for AdminUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        match resolve_identity(parts, state).await {
            Ok(Some(identity)) if identity.is_admin => Ok(AdminUser(identity)),
            Ok(_) => Err(ApiError::forbidden("Administrator access required")),
            Err(e) => Err(ApiError::Internal(e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::{HeaderMap, HeaderValue};
    use serde_json::json;

    #[test]
    fn bearer_header_parsing() {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer abc123"));
        assert_eq!(bearer_from_headers(&headers), Some("abc123"));

        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("bearer xyz"));
        assert_eq!(bearer_from_headers(&headers), Some("xyz"));

        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Basic abc"));
        assert_eq!(bearer_from_headers(&headers), None);

        assert_eq!(bearer_from_headers(&HeaderMap::new()), None);
    }

    #[test]
    fn legacy_payload_extraction() {
        let id = Uuid::new_v4();
        assert_eq!(
            legacy_user_id(&json!({ "userId": id.to_string() })),
            Some(id)
        );
        assert_eq!(legacy_user_id(&json!({ "userId": "not-a-uuid" })), None);
        assert_eq!(legacy_user_id(&json!({ "user_id": id.to_string() })), None);
        assert_eq!(legacy_user_id(&json!({})), None);
        assert_eq!(legacy_user_id(&json!(null)), None);
    }
}
