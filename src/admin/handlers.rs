use axum::{
    extract::{Path, State},
    routing::{delete, get, post},
    Json, Router,
};
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::{
    admin::dto::{BanEmailRequest, BannedEmailResponse, DeleteUserRequest},
    admin::repo,
    auth::{
        repo::{User, UserStatus},
        AdminUser, UserResponse,
    },
    error::{ApiError, Message},
    jobs,
    reviews,
    state::AppState,
};

const DEFAULT_BAN_REASON: &str = "banned by administrator";

pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/users", get(list_users))
        .route("/users/:id/suspend", post(suspend_user))
        .route("/users/:id/reactivate", post(reactivate_user))
        .route("/users/:id", delete(delete_user))
}

pub fn denylist_routes() -> Router<AppState> {
    Router::new()
        .route("/banned-emails", get(list_banned_emails).post(ban_email))
        .route("/banned-emails/:email", delete(unban_email))
}

pub fn content_routes() -> Router<AppState> {
    Router::new()
        .route("/reviews/:id", delete(delete_review))
        .route("/profiles/:id", delete(delete_profile))
        .route("/jobs/:id", delete(delete_job))
}

#[instrument(skip(state))]
pub async fn list_users(
    State(state): State<AppState>,
    AdminUser(_admin): AdminUser,
) -> Result<Json<Vec<UserResponse>>, ApiError> {
    let users = User::list_all(&state.db).await?;
    Ok(Json(users.into_iter().map(UserResponse::from).collect()))
}

#[instrument(skip(state))]
pub async fn suspend_user(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    Path(id): Path<Uuid>,
) -> Result<Json<Message>, ApiError> {
    if !User::set_status(&state.db, id, UserStatus::Suspended).await? {
        return Err(ApiError::not_found("User not found"));
    }
    info!(user_id = %id, admin = %admin.user_id, "user suspended");
    Ok(Message::new("User suspended"))
}

#[instrument(skip(state))]
pub async fn reactivate_user(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    Path(id): Path<Uuid>,
) -> Result<Json<Message>, ApiError> {
    if !User::set_status(&state.db, id, UserStatus::Active).await? {
        return Err(ApiError::not_found("User not found"));
    }
    info!(user_id = %id, admin = %admin.user_id, "user reactivated");
    Ok(Message::new("User reactivated"))
}

#[instrument(skip(state, payload))]
pub async fn delete_user(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    Path(id): Path<Uuid>,
    payload: Option<Json<DeleteUserRequest>>,
) -> Result<Json<Message>, ApiError> {
    let req = payload.map(|Json(r)| r).unwrap_or_default();
    let reason = req
        .reason
        .as_deref()
        .unwrap_or(DEFAULT_BAN_REASON);

    let deleted =
        repo::delete_user_cascade(&state.db, id, req.ban_email, reason, admin.user_id).await?;
    if !deleted {
        return Err(ApiError::not_found("User not found"));
    }

    info!(user_id = %id, admin = %admin.user_id, ban_email = req.ban_email, "user deleted");
    Ok(Message::new("User deleted"))
}

#[instrument(skip(state, payload))]
pub async fn ban_email(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    Json(payload): Json<BanEmailRequest>,
) -> Result<Json<Message>, ApiError> {
    let email = payload.email.trim().to_lowercase();
    if email.is_empty() {
        return Err(ApiError::validation("Email is required"));
    }
    let reason = payload.reason.as_deref().unwrap_or(DEFAULT_BAN_REASON);

    if !repo::ban_email(&state.db, &email, reason, Some(admin.user_id)).await? {
        return Err(ApiError::conflict("Email is already banned"));
    }

    info!(%email, admin = %admin.user_id, "email banned");
    Ok(Message::new("Email banned"))
}

#[instrument(skip(state))]
pub async fn unban_email(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    Path(email): Path<String>,
) -> Result<Json<Message>, ApiError> {
    let email = email.trim().to_lowercase();
    if !repo::unban_email(&state.db, &email).await? {
        return Err(ApiError::not_found("Email is not banned"));
    }

    info!(%email, admin = %admin.user_id, "email unbanned");
    Ok(Message::new("Email unbanned"))
}

#[instrument(skip(state))]
pub async fn list_banned_emails(
    State(state): State<AppState>,
    AdminUser(_admin): AdminUser,
) -> Result<Json<Vec<BannedEmailResponse>>, ApiError> {
    let rows = repo::list_banned_emails(&state.db).await?;
    Ok(Json(rows.into_iter().map(BannedEmailResponse::from).collect()))
}

#[instrument(skip(state))]
pub async fn delete_review(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    Path(id): Path<Uuid>,
) -> Result<Json<Message>, ApiError> {
    if !reviews::repo::delete(&state.db, id).await? {
        return Err(ApiError::not_found("Review not found"));
    }
    info!(review_id = %id, admin = %admin.user_id, "review deleted");
    Ok(Message::new("Review deleted"))
}

#[instrument(skip(state))]
pub async fn delete_profile(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    Path(id): Path<Uuid>,
) -> Result<Json<Message>, ApiError> {
    let Some(deleted) = repo::delete_profile_cascade(&state.db, id).await? else {
        return Err(ApiError::not_found("Profile not found"));
    };

    if let Some(key) = deleted.image_key {
        if let Err(e) = state.storage.delete_object(&key).await {
            warn!(error = %e, %key, "failed to delete profile image");
        }
    }

    info!(profile_id = %id, admin = %admin.user_id, "profile deleted");
    Ok(Message::new("Profile deleted"))
}

#[instrument(skip(state))]
pub async fn delete_job(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    Path(id): Path<Uuid>,
) -> Result<Json<Message>, ApiError> {
    if !jobs::repo::delete(&state.db, id).await? {
        return Err(ApiError::not_found("Job listing not found"));
    }
    info!(job_id = %id, admin = %admin.user_id, "job listing deleted");
    Ok(Message::new("Job listing deleted"))
}
