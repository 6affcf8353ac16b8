use serde::{Deserialize, Serialize};
use time::{Date, OffsetDateTime};
use uuid::Uuid;

use crate::jobs::repo::{JobListing, JobStatus, JobUpdate, NewJob};

time::serde::format_description!(job_date_format, Date, "[year]-[month]-[day]");

#[derive(Debug, Deserialize)]
pub struct JobListParams {
    pub category: Option<String>,
    pub status: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CreateJobRequest {
    pub title: String,
    pub description: String,
    pub location: String,
    #[serde(with = "job_date_format")]
    pub job_date: Date,
    pub category: String,
    pub contact_info: String,
    #[serde(default)]
    pub image_keys: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateJobRequest {
    pub title: String,
    pub description: String,
    pub location: String,
    #[serde(with = "job_date_format")]
    pub job_date: Date,
    pub category: String,
    pub contact_info: String,
    #[serde(default)]
    pub image_keys: Vec<String>,
    pub status: JobStatus,
}

#[derive(Debug, Serialize)]
pub struct JobResponse {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub description: String,
    pub location: String,
    #[serde(with = "job_date_format")]
    pub job_date: Date,
    pub category: String,
    pub contact_info: String,
    pub image_urls: Vec<String>,
    pub status: JobStatus,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

impl JobResponse {
    pub fn from_parts(listing: JobListing, image_urls: Vec<String>) -> Self {
        Self {
            id: listing.id,
            user_id: listing.user_id,
            title: listing.title,
            description: listing.description,
            location: listing.location,
            job_date: listing.job_date,
            category: listing.category,
            contact_info: listing.contact_info,
            image_urls,
            status: listing.status,
            created_at: listing.created_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub keys: Vec<String>,
}

impl CreateJobRequest {
    pub fn validate(&self) -> Result<(), crate::error::ApiError> {
        validate_job_fields(
            &self.title,
            &self.description,
            &self.location,
            &self.category,
            &self.contact_info,
        )
    }

    pub fn into_new_job(self) -> NewJob {
        NewJob {
            title: self.title.trim().to_string(),
            description: self.description,
            location: self.location,
            job_date: self.job_date,
            category: self.category,
            contact_info: self.contact_info,
            image_keys: self.image_keys,
        }
    }
}

impl UpdateJobRequest {
    pub fn validate(&self) -> Result<(), crate::error::ApiError> {
        validate_job_fields(
            &self.title,
            &self.description,
            &self.location,
            &self.category,
            &self.contact_info,
        )
    }

    pub fn into_update(self) -> JobUpdate {
        JobUpdate {
            title: self.title.trim().to_string(),
            description: self.description,
            location: self.location,
            job_date: self.job_date,
            category: self.category,
            contact_info: self.contact_info,
            image_keys: self.image_keys,
            status: self.status,
        }
    }
}

fn validate_job_fields(
    title: &str,
    description: &str,
    location: &str,
    category: &str,
    contact_info: &str,
) -> Result<(), crate::error::ApiError> {
    use crate::error::ApiError;

    if title.trim().is_empty() {
        return Err(ApiError::validation("Title is required"));
    }
    if description.trim().is_empty() {
        return Err(ApiError::validation("Description is required"));
    }
    if location.trim().is_empty() {
        return Err(ApiError::validation("Location is required"));
    }
    if category.trim().is_empty() {
        return Err(ApiError::validation("Category is required"));
    }
    if contact_info.trim().is_empty() {
        return Err(ApiError::validation("Contact information is required"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_request_parses_iso_date() {
        let req: CreateJobRequest = serde_json::from_str(
            r#"{
                "title": "Zaun streichen",
                "description": "Gartenzaun, ca. 20 Meter",
                "location": "Wien",
                "job_date": "2025-06-01",
                "category": "Maler",
                "contact_info": "+43 1 2345678"
            }"#,
        )
        .unwrap();
        assert_eq!(req.job_date.to_string(), "2025-06-01");
        assert!(req.image_keys.is_empty());
        assert!(req.validate().is_ok());
    }

    #[test]
    fn blank_fields_fail_validation() {
        let mut req: CreateJobRequest = serde_json::from_str(
            r#"{
                "title": "Zaun streichen",
                "description": "Gartenzaun",
                "location": "Wien",
                "job_date": "2025-06-01",
                "category": "Maler",
                "contact_info": "+43 1 2345678"
            }"#,
        )
        .unwrap();
        req.title = "  ".into();
        assert!(req.validate().is_err());
    }

    #[test]
    fn status_serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&JobStatus::Cancelled).unwrap(),
            r#""cancelled""#
        );
        let status: JobStatus = serde_json::from_str(r#""completed""#).unwrap();
        assert_eq!(status, JobStatus::Completed);
    }
}
