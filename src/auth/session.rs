use axum::http::{header, HeaderMap};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

/// Server-side session row. Rows written by the current stack set `user_id`;
/// rows left behind by older clients carry only a bare `userId` inside `data`.
#[derive(Debug, Clone, FromRow)]
pub struct Session {
    pub id: Uuid,
    pub user_id: Option<Uuid>,
    pub data: Option<serde_json::Value>,
}

pub async fn create(db: &PgPool, user_id: Uuid) -> anyhow::Result<Session> {
    let session = sqlx::query_as::<_, Session>(
        r#"
        INSERT INTO sessions (id, user_id)
        VALUES ($1, $2)
        RETURNING id, user_id, data
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(user_id)
    .fetch_one(db)
    .await?;
    Ok(session)
}

pub async fn find(db: &PgPool, id: Uuid) -> anyhow::Result<Option<Session>> {
    let session = sqlx::query_as::<_, Session>(
        r#"
        SELECT id, user_id, data
        FROM sessions
        WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(db)
    .await?;
    Ok(session)
}

pub async fn delete(db: &PgPool, id: Uuid) -> anyhow::Result<()> {
    sqlx::query("DELETE FROM sessions WHERE id = $1")
        .bind(id)
        .execute(db)
        .await?;
    Ok(())
}

/// Pull the session id out of the Cookie header, if any.
pub fn session_id_from_headers(headers: &HeaderMap, cookie_name: &str) -> Option<Uuid> {
    let raw = headers.get(header::COOKIE)?.to_str().ok()?;
    for pair in raw.split(';') {
        if let Some((name, value)) = pair.trim().split_once('=') {
            if name == cookie_name {
                return Uuid::parse_str(value).ok();
            }
        }
    }
    None
}

/// Session cookie for Set-Cookie. Not HttpOnly: browser clients read the
/// session id from script.
pub fn build_cookie(name: &str, value: &str) -> String {
    format!("{}={}; Path=/; SameSite=Lax", name, value)
}

pub fn clear_cookie(name: &str) -> String {
    format!("{}=; Path=/; Max-Age=0; SameSite=Lax", name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers_with_cookie(raw: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::COOKIE, HeaderValue::from_str(raw).unwrap());
        headers
    }

    #[test]
    fn finds_session_id_among_cookies() {
        let sid = Uuid::new_v4();
        let headers = headers_with_cookie(&format!("theme=dark; sid={}; lang=de", sid));
        assert_eq!(session_id_from_headers(&headers, "sid"), Some(sid));
    }

    #[test]
    fn missing_or_malformed_cookie_yields_none() {
        assert_eq!(
            session_id_from_headers(&HeaderMap::new(), "sid"),
            None
        );
        let headers = headers_with_cookie("sid=not-a-uuid");
        assert_eq!(session_id_from_headers(&headers, "sid"), None);
        let headers = headers_with_cookie("other=value");
        assert_eq!(session_id_from_headers(&headers, "sid"), None);
    }

    #[test]
    fn cookie_name_must_match_exactly() {
        let sid = Uuid::new_v4();
        let headers = headers_with_cookie(&format!("sid2={}", sid));
        assert_eq!(session_id_from_headers(&headers, "sid"), None);
    }

    #[test]
    fn built_cookie_is_script_readable() {
        let cookie = build_cookie("sid", "abc");
        assert!(cookie.starts_with("sid=abc"));
        assert!(!cookie.contains("HttpOnly"));
    }

    #[test]
    fn clear_cookie_expires_immediately() {
        assert!(clear_cookie("sid").contains("Max-Age=0"));
    }
}
