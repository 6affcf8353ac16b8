use axum::{
    extract::{Path, State},
    routing::post,
    Json, Router,
};
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::{
    auth::AuthUser,
    error::ApiError,
    profiles,
    reviews::dto::{validate_review, CreateReviewRequest, ReviewResponse},
    reviews::repo,
    state::AppState,
};

pub fn review_routes() -> Router<AppState> {
    Router::new().route("/profiles/:id/reviews", post(create_review))
}

#[instrument(skip(state, payload))]
pub async fn create_review(
    State(state): State<AppState>,
    AuthUser(identity): AuthUser,
    Path(profile_id): Path<Uuid>,
    Json(payload): Json<CreateReviewRequest>,
) -> Result<Json<ReviewResponse>, ApiError> {
    validate_review(payload.rating, &payload.comment)?;

    let profile = profiles::repo::find_by_id(&state.db, profile_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Profile not found"))?;

    if profile.user_id == identity.user_id {
        warn!(user_id = %identity.user_id, %profile_id, "self-review rejected");
        return Err(ApiError::forbidden("You cannot review your own profile"));
    }

    let review = repo::create(
        &state.db,
        profile_id,
        identity.user_id,
        payload.rating,
        payload.comment.trim(),
    )
    .await?;

    info!(review_id = %review.id, %profile_id, reviewer = %identity.user_id, "review created");
    Ok(Json(ReviewResponse::from(review)))
}
