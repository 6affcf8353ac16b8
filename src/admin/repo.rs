use anyhow::Context;
use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::auth::repo::UserStatus;

#[derive(Debug, Clone, FromRow)]
pub struct BannedEmail {
    pub email: String,
    pub reason: String,
    pub banned_by: Option<Uuid>,
    pub created_at: OffsetDateTime,
}

pub async fn email_is_banned(db: &PgPool, email: &str) -> anyhow::Result<bool> {
    let hit: Option<(String,)> =
        sqlx::query_as("SELECT email FROM banned_emails WHERE email = $1")
            .bind(email)
            .fetch_optional(db)
            .await
            .context("check banned email")?;
    Ok(hit.is_some())
}

/// Returns false when the email is already on the denylist.
pub async fn ban_email(
    db: &PgPool,
    email: &str,
    reason: &str,
    banned_by: Option<Uuid>,
) -> anyhow::Result<bool> {
    let res = sqlx::query(
        r#"
        INSERT INTO banned_emails (email, reason, banned_by)
        VALUES ($1, $2, $3)
        ON CONFLICT (email) DO NOTHING
        "#,
    )
    .bind(email)
    .bind(reason)
    .bind(banned_by)
    .execute(db)
    .await
    .context("ban email")?;
    Ok(res.rows_affected() > 0)
}

pub async fn unban_email(db: &PgPool, email: &str) -> anyhow::Result<bool> {
    let res = sqlx::query("DELETE FROM banned_emails WHERE email = $1")
        .bind(email)
        .execute(db)
        .await?;
    Ok(res.rows_affected() > 0)
}

pub async fn list_banned_emails(db: &PgPool) -> anyhow::Result<Vec<BannedEmail>> {
    let rows = sqlx::query_as::<_, BannedEmail>(
        r#"
        SELECT email, reason, banned_by, created_at
        FROM banned_emails
        ORDER BY created_at DESC
        "#,
    )
    .fetch_all(db)
    .await?;
    Ok(rows)
}

/// What a profile cascade removed, for post-commit storage cleanup.
#[derive(Debug)]
pub struct DeletedProfile {
    pub image_key: Option<String>,
}

/// Delete a profile together with its reviews and bookmarks, atomically.
/// Returns None when no such profile exists.
pub async fn delete_profile_cascade(
    db: &PgPool,
    profile_id: Uuid,
) -> anyhow::Result<Option<DeletedProfile>> {
    let mut tx = db.begin().await.context("begin tx")?;

    let row: Option<(Option<String>,)> =
        sqlx::query_as("SELECT image_key FROM profiles WHERE id = $1 FOR UPDATE")
            .bind(profile_id)
            .fetch_optional(&mut *tx)
            .await?;
    let Some((image_key,)) = row else {
        return Ok(None);
    };

    sqlx::query("DELETE FROM reviews WHERE profile_id = $1")
        .bind(profile_id)
        .execute(&mut *tx)
        .await?;
    sqlx::query("DELETE FROM favorites WHERE profile_id = $1")
        .bind(profile_id)
        .execute(&mut *tx)
        .await?;
    sqlx::query("DELETE FROM profiles WHERE id = $1")
        .bind(profile_id)
        .execute(&mut *tx)
        .await?;

    tx.commit().await.context("commit tx")?;
    Ok(Some(DeletedProfile { image_key }))
}

/// Soft-delete a user: tombstone the row, purge sessions, cascade away the
/// profile (if any), optionally putting the email on the denylist. One
/// transaction end to end. Returns false when no such user exists.
pub async fn delete_user_cascade(
    db: &PgPool,
    user_id: Uuid,
    ban_email: bool,
    reason: &str,
    admin_id: Uuid,
) -> anyhow::Result<bool> {
    let mut tx = db.begin().await.context("begin tx")?;

    let email: Option<(String,)> =
        sqlx::query_as("SELECT email FROM users WHERE id = $1 FOR UPDATE")
            .bind(user_id)
            .fetch_optional(&mut *tx)
            .await?;
    let Some((email,)) = email else {
        return Ok(false);
    };

    if ban_email {
        sqlx::query(
            r#"
            INSERT INTO banned_emails (email, reason, banned_by)
            VALUES ($1, $2, $3)
            ON CONFLICT (email) DO NOTHING
            "#,
        )
        .bind(&email)
        .bind(reason)
        .bind(admin_id)
        .execute(&mut *tx)
        .await?;
    }

    let profile_id: Option<(Uuid,)> =
        sqlx::query_as("SELECT id FROM profiles WHERE user_id = $1")
            .bind(user_id)
            .fetch_optional(&mut *tx)
            .await?;
    if let Some((profile_id,)) = profile_id {
        sqlx::query("DELETE FROM reviews WHERE profile_id = $1")
            .bind(profile_id)
            .execute(&mut *tx)
            .await?;
        sqlx::query("DELETE FROM favorites WHERE profile_id = $1")
            .bind(profile_id)
            .execute(&mut *tx)
            .await?;
        sqlx::query("DELETE FROM profiles WHERE id = $1")
            .bind(profile_id)
            .execute(&mut *tx)
            .await?;
    }

    sqlx::query("DELETE FROM favorites WHERE user_id = $1")
        .bind(user_id)
        .execute(&mut *tx)
        .await?;
    sqlx::query("UPDATE users SET status = $1 WHERE id = $2")
        .bind(UserStatus::Deleted.as_str())
        .bind(user_id)
        .execute(&mut *tx)
        .await?;
    sqlx::query("DELETE FROM sessions WHERE user_id = $1")
        .bind(user_id)
        .execute(&mut *tx)
        .await?;

    tx.commit().await.context("commit tx")?;
    Ok(true)
}
