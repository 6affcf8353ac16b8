use anyhow::Context;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use time::{Date, OffsetDateTime};
use uuid::Uuid;

use crate::db::{decode_list, encode_list};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    Active,
    Completed,
    Cancelled,
}

impl JobStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            JobStatus::Active => "active",
            JobStatus::Completed => "completed",
            JobStatus::Cancelled => "cancelled",
        }
    }

    pub fn parse(s: &str) -> Option<JobStatus> {
        match s {
            "active" => Some(JobStatus::Active),
            "completed" => Some(JobStatus::Completed),
            "cancelled" => Some(JobStatus::Cancelled),
            _ => None,
        }
    }
}

/// Job listing as stored; image_keys is a JSON-encoded TEXT list.
#[derive(Debug, Clone, FromRow)]
pub struct JobRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub description: String,
    pub location: String,
    pub job_date: Date,
    pub category: String,
    pub contact_info: String,
    pub image_keys: String,
    pub status: String,
    pub created_at: OffsetDateTime,
}

#[derive(Debug, Clone)]
pub struct JobListing {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub description: String,
    pub location: String,
    pub job_date: Date,
    pub category: String,
    pub contact_info: String,
    pub image_keys: Vec<String>,
    pub status: JobStatus,
    pub created_at: OffsetDateTime,
}

impl From<JobRow> for JobListing {
    fn from(row: JobRow) -> Self {
        Self {
            id: row.id,
            user_id: row.user_id,
            title: row.title,
            description: row.description,
            location: row.location,
            job_date: row.job_date,
            category: row.category,
            contact_info: row.contact_info,
            image_keys: decode_list(&row.image_keys),
            // unknown stored values read as active, mirroring the list codec
            status: JobStatus::parse(&row.status).unwrap_or(JobStatus::Active),
            created_at: row.created_at,
        }
    }
}

#[derive(Debug)]
pub struct NewJob {
    pub title: String,
    pub description: String,
    pub location: String,
    pub job_date: Date,
    pub category: String,
    pub contact_info: String,
    pub image_keys: Vec<String>,
}

#[derive(Debug)]
pub struct JobUpdate {
    pub title: String,
    pub description: String,
    pub location: String,
    pub job_date: Date,
    pub category: String,
    pub contact_info: String,
    pub image_keys: Vec<String>,
    pub status: JobStatus,
}

const SELECT_COLUMNS: &str = r#"
    SELECT id, user_id, title, description, location, job_date, category,
           contact_info, image_keys, status, created_at
    FROM job_listings
"#;

pub async fn list(
    db: &PgPool,
    category: Option<&str>,
    status: Option<JobStatus>,
) -> anyhow::Result<Vec<JobRow>> {
    let rows = sqlx::query_as::<_, JobRow>(&format!(
        r#"
        {}
        WHERE ($1::text IS NULL OR category = $1)
          AND ($2::text IS NULL OR status = $2)
        ORDER BY created_at DESC
        "#,
        SELECT_COLUMNS
    ))
    .bind(category)
    .bind(status.map(|s| s.as_str()))
    .fetch_all(db)
    .await
    .context("list job listings")?;
    Ok(rows)
}

pub async fn find_by_id(db: &PgPool, id: Uuid) -> anyhow::Result<Option<JobRow>> {
    let row = sqlx::query_as::<_, JobRow>(&format!("{} WHERE id = $1", SELECT_COLUMNS))
        .bind(id)
        .fetch_optional(db)
        .await?;
    Ok(row)
}

pub async fn create(db: &PgPool, user_id: Uuid, job: &NewJob) -> anyhow::Result<JobRow> {
    let row = sqlx::query_as::<_, JobRow>(
        r#"
        INSERT INTO job_listings (user_id, title, description, location, job_date,
                                  category, contact_info, image_keys)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
        RETURNING id, user_id, title, description, location, job_date, category,
                  contact_info, image_keys, status, created_at
        "#,
    )
    .bind(user_id)
    .bind(&job.title)
    .bind(&job.description)
    .bind(&job.location)
    .bind(job.job_date)
    .bind(&job.category)
    .bind(&job.contact_info)
    .bind(encode_list(&job.image_keys))
    .fetch_one(db)
    .await
    .context("create job listing")?;
    Ok(row)
}

pub async fn update(db: &PgPool, id: Uuid, job: &JobUpdate) -> anyhow::Result<Option<JobRow>> {
    let row = sqlx::query_as::<_, JobRow>(
        r#"
        UPDATE job_listings
        SET title = $2, description = $3, location = $4, job_date = $5,
            category = $6, contact_info = $7, image_keys = $8, status = $9
        WHERE id = $1
        RETURNING id, user_id, title, description, location, job_date, category,
                  contact_info, image_keys, status, created_at
        "#,
    )
    .bind(id)
    .bind(&job.title)
    .bind(&job.description)
    .bind(&job.location)
    .bind(job.job_date)
    .bind(&job.category)
    .bind(&job.contact_info)
    .bind(encode_list(&job.image_keys))
    .bind(job.status.as_str())
    .fetch_optional(db)
    .await
    .context("update job listing")?;
    Ok(row)
}

/// Job listings are hard-deleted. Returns false when no such row exists.
pub async fn delete(db: &PgPool, id: Uuid) -> anyhow::Result<bool> {
    let res = sqlx::query("DELETE FROM job_listings WHERE id = $1")
        .bind(id)
        .execute(db)
        .await?;
    Ok(res.rows_affected() > 0)
}
