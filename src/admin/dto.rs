use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::admin::repo::BannedEmail;

/// Body of the admin user-delete call. Both fields are optional; a bare
/// delete only tombstones the account.
#[derive(Debug, Default, Deserialize)]
pub struct DeleteUserRequest {
    #[serde(default)]
    pub ban_email: bool,
    pub reason: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct BanEmailRequest {
    pub email: String,
    pub reason: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct BannedEmailResponse {
    pub email: String,
    pub reason: String,
    pub banned_by: Option<Uuid>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

impl From<BannedEmail> for BannedEmailResponse {
    fn from(b: BannedEmail) -> Self {
        Self {
            email: b.email,
            reason: b.reason,
            banned_by: b.banned_by,
            created_at: b.created_at,
        }
    }
}
