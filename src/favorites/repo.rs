use anyhow::Context;
use sqlx::PgPool;
use uuid::Uuid;

use crate::profiles::repo::ProfileRow;

/// Bookmark a profile. Idempotent: the pair is unique and repeats are
/// swallowed.
pub async fn add(db: &PgPool, user_id: Uuid, profile_id: Uuid) -> anyhow::Result<()> {
    sqlx::query(
        r#"
        INSERT INTO favorites (user_id, profile_id)
        VALUES ($1, $2)
        ON CONFLICT (user_id, profile_id) DO NOTHING
        "#,
    )
    .bind(user_id)
    .bind(profile_id)
    .execute(db)
    .await
    .context("add favorite")?;
    Ok(())
}

pub async fn remove(db: &PgPool, user_id: Uuid, profile_id: Uuid) -> anyhow::Result<bool> {
    let res = sqlx::query("DELETE FROM favorites WHERE user_id = $1 AND profile_id = $2")
        .bind(user_id)
        .bind(profile_id)
        .execute(db)
        .await?;
    Ok(res.rows_affected() > 0)
}

/// The bookmarked profiles, most recently saved first.
pub async fn list_profiles(db: &PgPool, user_id: Uuid) -> anyhow::Result<Vec<ProfileRow>> {
    let rows = sqlx::query_as::<_, ProfileRow>(
        r#"
        SELECT p.id, p.user_id, p.first_name, p.last_name, p.description, p.services,
               p.custom_services, p.regions, p.availability, p.phone, p.contact_email,
               p.social_media, p.available, p.image_key, p.created_at
        FROM favorites f
        JOIN profiles p ON p.id = f.profile_id
        WHERE f.user_id = $1
        ORDER BY f.created_at DESC
        "#,
    )
    .bind(user_id)
    .fetch_all(db)
    .await
    .context("list favorites")?;
    Ok(rows)
}
