use anyhow::Context;
use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::db::{decode_list, encode_list};

/// Profile as stored: list-valued fields are JSON-encoded TEXT.
#[derive(Debug, Clone, FromRow)]
pub struct ProfileRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub description: Option<String>,
    pub services: String,
    pub custom_services: Option<String>,
    pub regions: String,
    pub availability: String,
    pub phone: Option<String>,
    pub contact_email: Option<String>,
    pub social_media: Option<String>,
    pub available: bool,
    pub image_key: Option<String>,
    pub created_at: OffsetDateTime,
}

/// Profile with the list columns decoded.
#[derive(Debug, Clone, PartialEq)]
pub struct Profile {
    pub id: Uuid,
    pub user_id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub description: Option<String>,
    pub services: Vec<String>,
    pub custom_services: Option<String>,
    pub regions: Vec<String>,
    pub availability: Vec<String>,
    pub phone: Option<String>,
    pub contact_email: Option<String>,
    pub social_media: Option<String>,
    pub available: bool,
    pub image_key: Option<String>,
    pub created_at: OffsetDateTime,
}

impl From<ProfileRow> for Profile {
    fn from(row: ProfileRow) -> Self {
        Self {
            id: row.id,
            user_id: row.user_id,
            first_name: row.first_name,
            last_name: row.last_name,
            description: row.description,
            services: decode_list(&row.services),
            custom_services: row.custom_services,
            regions: decode_list(&row.regions),
            availability: decode_list(&row.availability),
            phone: row.phone,
            contact_email: row.contact_email,
            social_media: row.social_media,
            available: row.available,
            image_key: row.image_key,
            created_at: row.created_at,
        }
    }
}

/// Fields written on profile upsert.
#[derive(Debug)]
pub struct ProfileUpsert {
    pub first_name: String,
    pub last_name: String,
    pub description: Option<String>,
    pub services: Vec<String>,
    pub custom_services: Option<String>,
    pub regions: Vec<String>,
    pub availability: Vec<String>,
    pub phone: Option<String>,
    pub contact_email: Option<String>,
    pub social_media: Option<String>,
    pub available: bool,
    pub image_key: Option<String>,
}

const SELECT_COLUMNS: &str = r#"
    SELECT id, user_id, first_name, last_name, description, services,
           custom_services, regions, availability, phone, contact_email,
           social_media, available, image_key, created_at
    FROM profiles
"#;

/// The full candidate set. Search filters in application memory; the
/// dataset is a few hundred rows.
pub async fn list_all(db: &PgPool) -> anyhow::Result<Vec<ProfileRow>> {
    let rows = sqlx::query_as::<_, ProfileRow>(SELECT_COLUMNS)
        .fetch_all(db)
        .await
        .context("list profiles")?;
    Ok(rows)
}

pub async fn find_by_id(db: &PgPool, id: Uuid) -> anyhow::Result<Option<ProfileRow>> {
    let row = sqlx::query_as::<_, ProfileRow>(&format!("{} WHERE id = $1", SELECT_COLUMNS))
        .bind(id)
        .fetch_optional(db)
        .await?;
    Ok(row)
}

pub async fn find_by_user(db: &PgPool, user_id: Uuid) -> anyhow::Result<Option<ProfileRow>> {
    let row = sqlx::query_as::<_, ProfileRow>(&format!("{} WHERE user_id = $1", SELECT_COLUMNS))
        .bind(user_id)
        .fetch_optional(db)
        .await?;
    Ok(row)
}

/// One profile per user: insert or replace in place.
pub async fn upsert(db: &PgPool, user_id: Uuid, p: &ProfileUpsert) -> anyhow::Result<ProfileRow> {
    let row = sqlx::query_as::<_, ProfileRow>(
        r#"
        INSERT INTO profiles (user_id, first_name, last_name, description, services,
                              custom_services, regions, availability, phone,
                              contact_email, social_media, available, image_key)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
        ON CONFLICT (user_id) DO UPDATE SET
            first_name = EXCLUDED.first_name,
            last_name = EXCLUDED.last_name,
            description = EXCLUDED.description,
            services = EXCLUDED.services,
            custom_services = EXCLUDED.custom_services,
            regions = EXCLUDED.regions,
            availability = EXCLUDED.availability,
            phone = EXCLUDED.phone,
            contact_email = EXCLUDED.contact_email,
            social_media = EXCLUDED.social_media,
            available = EXCLUDED.available,
            image_key = EXCLUDED.image_key
        RETURNING id, user_id, first_name, last_name, description, services,
                  custom_services, regions, availability, phone, contact_email,
                  social_media, available, image_key, created_at
        "#,
    )
    .bind(user_id)
    .bind(&p.first_name)
    .bind(&p.last_name)
    .bind(&p.description)
    .bind(encode_list(&p.services))
    .bind(&p.custom_services)
    .bind(encode_list(&p.regions))
    .bind(encode_list(&p.availability))
    .bind(&p.phone)
    .bind(&p.contact_email)
    .bind(&p.social_media)
    .bind(p.available)
    .bind(&p.image_key)
    .fetch_one(db)
    .await
    .context("upsert profile")?;
    Ok(row)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn row_decodes_malformed_lists_to_empty() {
        let row = ProfileRow {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            first_name: "Maria".into(),
            last_name: "Huber".into(),
            description: None,
            services: "oops not json".into(),
            custom_services: None,
            regions: r#"["Wien"]"#.into(),
            availability: "".into(),
            phone: Some("+43 660 1234567".into()),
            contact_email: None,
            social_media: None,
            available: true,
            image_key: None,
            created_at: OffsetDateTime::UNIX_EPOCH,
        };
        let profile = Profile::from(row);
        assert!(profile.services.is_empty());
        assert_eq!(profile.regions, vec!["Wien".to_string()]);
        assert!(profile.availability.is_empty());
    }
}
