use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;
use uuid::Uuid;

#[derive(Debug, Clone, FromRow)]
pub struct Review {
    pub id: Uuid,
    pub profile_id: Uuid,
    pub reviewer_id: Uuid,
    pub rating: i32,
    pub comment: String,
    pub created_at: OffsetDateTime,
}

pub async fn list_by_profile(db: &PgPool, profile_id: Uuid) -> anyhow::Result<Vec<Review>> {
    let rows = sqlx::query_as::<_, Review>(
        r#"
        SELECT id, profile_id, reviewer_id, rating, comment, created_at
        FROM reviews
        WHERE profile_id = $1
        ORDER BY created_at DESC
        "#,
    )
    .bind(profile_id)
    .fetch_all(db)
    .await?;
    Ok(rows)
}

pub async fn create(
    db: &PgPool,
    profile_id: Uuid,
    reviewer_id: Uuid,
    rating: i32,
    comment: &str,
) -> anyhow::Result<Review> {
    let review = sqlx::query_as::<_, Review>(
        r#"
        INSERT INTO reviews (profile_id, reviewer_id, rating, comment)
        VALUES ($1, $2, $3, $4)
        RETURNING id, profile_id, reviewer_id, rating, comment, created_at
        "#,
    )
    .bind(profile_id)
    .bind(reviewer_id)
    .bind(rating)
    .bind(comment)
    .fetch_one(db)
    .await?;
    Ok(review)
}

/// Returns false when no such review exists.
pub async fn delete(db: &PgPool, id: Uuid) -> anyhow::Result<bool> {
    let res = sqlx::query("DELETE FROM reviews WHERE id = $1")
        .bind(id)
        .execute(db)
        .await?;
    Ok(res.rows_affected() > 0)
}
