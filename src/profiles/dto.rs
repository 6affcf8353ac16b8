use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::auth::password::is_valid_email;
use crate::error::ApiError;
use crate::profiles::repo::{Profile, ProfileUpsert};
use crate::reviews::ReviewResponse;

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    pub service: Option<String>,
    pub region: Option<String>,
    pub name: Option<String>,
    pub sort: Option<String>,
    pub page: Option<u32>,
    #[serde(rename = "pageSize")]
    pub page_size: Option<u32>,
}

#[derive(Debug, Serialize)]
pub struct ProfileResponse {
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
    pub image_url: Option<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    pub reviews: Vec<ReviewResponse>,
}

impl ProfileResponse {
    pub fn from_parts(
        profile: Profile,
        reviews: Vec<ReviewResponse>,
        image_url: Option<String>,
    ) -> Self {
        Self {
            id: profile.id,
            user_id: profile.user_id,
            first_name: profile.first_name,
            last_name: profile.last_name,
            description: profile.description,
            services: profile.services,
            custom_services: profile.custom_services,
            regions: profile.regions,
            availability: profile.availability,
            phone: profile.phone,
            contact_email: profile.contact_email,
            social_media: profile.social_media,
            available: profile.available,
            image_url,
            created_at: profile.created_at,
            reviews,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct SearchResponse {
    pub results: Vec<ProfileResponse>,
    pub total: usize,
}

fn default_available() -> bool {
    true
}

#[derive(Debug, Deserialize)]
pub struct UpsertProfileRequest {
    pub first_name: String,
    pub last_name: String,
    pub description: Option<String>,
    #[serde(default)]
    pub services: Vec<String>,
    pub custom_services: Option<String>,
    #[serde(default)]
    pub regions: Vec<String>,
    #[serde(default)]
    pub availability: Vec<String>,
    pub phone: Option<String>,
    pub contact_email: Option<String>,
    pub social_media: Option<String>,
    #[serde(default = "default_available")]
    pub available: bool,
    pub image_key: Option<String>,
}

fn present(value: &Option<String>) -> bool {
    value.as_deref().map_or(false, |v| !v.trim().is_empty())
}

impl UpsertProfileRequest {
    /// Edge validation; the store has no constraints for any of this.
    pub fn validate(&self) -> Result<(), ApiError> {
        if self.first_name.trim().is_empty() || self.last_name.trim().is_empty() {
            return Err(ApiError::validation("First and last name are required"));
        }
        if self.services.iter().all(|s| s.trim().is_empty()) {
            return Err(ApiError::validation("At least one service is required"));
        }
        if self.regions.iter().all(|r| r.trim().is_empty()) {
            return Err(ApiError::validation("At least one region is required"));
        }
        if self.availability.iter().all(|a| a.trim().is_empty()) {
            return Err(ApiError::validation(
                "At least one availability period is required",
            ));
        }
        if !present(&self.phone) && !present(&self.contact_email) && !present(&self.social_media)
        {
            return Err(ApiError::validation(
                "At least one contact method is required",
            ));
        }
        if let Some(email) = self.contact_email.as_deref() {
            if !email.trim().is_empty() && !is_valid_email(email.trim()) {
                return Err(ApiError::validation("Invalid contact email"));
            }
        }
        Ok(())
    }

    pub fn into_upsert(self) -> ProfileUpsert {
        ProfileUpsert {
            first_name: self.first_name.trim().to_string(),
            last_name: self.last_name.trim().to_string(),
            description: self.description,
            services: self.services,
            custom_services: self.custom_services,
            regions: self.regions,
            availability: self.availability,
            phone: self.phone,
            contact_email: self.contact_email,
            social_media: self.social_media,
            available: self.available,
            image_key: self.image_key,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> UpsertProfileRequest {
        UpsertProfileRequest {
            first_name: "Maria".into(),
            last_name: "Huber".into(),
            description: Some("Elektrikerin mit 10 Jahren Erfahrung".into()),
            services: vec!["Elektriker".into()],
            custom_services: None,
            regions: vec!["Wien".into()],
            availability: vec!["Wochentags".into()],
            phone: Some("+43 660 1234567".into()),
            contact_email: None,
            social_media: None,
            available: true,
            image_key: None,
        }
    }

    #[test]
    fn complete_request_validates() {
        assert!(request().validate().is_ok());
    }

    #[test]
    fn missing_services_rejected() {
        let mut req = request();
        req.services = vec![];
        assert!(req.validate().is_err());
        req.services = vec!["   ".into()];
        assert!(req.validate().is_err());
    }

    #[test]
    fn missing_regions_or_availability_rejected() {
        let mut req = request();
        req.regions = vec![];
        assert!(req.validate().is_err());

        let mut req = request();
        req.availability = vec![];
        assert!(req.validate().is_err());
    }

    #[test]
    fn at_least_one_contact_method_required() {
        let mut req = request();
        req.phone = None;
        assert!(req.validate().is_err());

        req.contact_email = Some("maria@example.at".into());
        assert!(req.validate().is_ok());

        req.contact_email = None;
        req.social_media = Some("instagram.com/maria.macht.strom".into());
        assert!(req.validate().is_ok());
    }

    #[test]
    fn bad_contact_email_rejected() {
        let mut req = request();
        req.contact_email = Some("not-an-email".into());
        assert!(req.validate().is_err());
    }

    #[test]
    fn blank_names_rejected() {
        let mut req = request();
        req.first_name = "  ".into();
        assert!(req.validate().is_err());
    }
}
