use axum::{
    extract::{Path, State},
    routing::{get, put},
    Json, Router,
};
use tracing::{info, instrument};
use uuid::Uuid;

use crate::{
    auth::AuthUser,
    error::{ApiError, Message},
    favorites::repo,
    profiles::{self, ProfileResponse},
    state::AppState,
};

pub fn favorite_routes() -> Router<AppState> {
    Router::new()
        .route("/favorites", get(list_favorites))
        .route(
            "/favorites/:profile_id",
            put(add_favorite).delete(remove_favorite),
        )
}

#[instrument(skip(state))]
pub async fn list_favorites(
    State(state): State<AppState>,
    AuthUser(identity): AuthUser,
) -> Result<Json<Vec<ProfileResponse>>, ApiError> {
    let rows = repo::list_profiles(&state.db, identity.user_id).await?;

    let mut results = Vec::with_capacity(rows.len());
    for row in rows {
        let profile = profiles::repo::Profile::from(row);
        results.push(profiles::handlers::enrich(&state, profile).await?);
    }
    Ok(Json(results))
}

#[instrument(skip(state))]
pub async fn add_favorite(
    State(state): State<AppState>,
    AuthUser(identity): AuthUser,
    Path(profile_id): Path<Uuid>,
) -> Result<Json<Message>, ApiError> {
    if profiles::repo::find_by_id(&state.db, profile_id)
        .await?
        .is_none()
    {
        return Err(ApiError::not_found("Profile not found"));
    }

    repo::add(&state.db, identity.user_id, profile_id).await?;

    info!(user_id = %identity.user_id, %profile_id, "favorite added");
    Ok(Message::new("Profile bookmarked"))
}

#[instrument(skip(state))]
pub async fn remove_favorite(
    State(state): State<AppState>,
    AuthUser(identity): AuthUser,
    Path(profile_id): Path<Uuid>,
) -> Result<Json<Message>, ApiError> {
    if !repo::remove(&state.db, identity.user_id, profile_id).await? {
        return Err(ApiError::not_found("Favorite not found"));
    }

    info!(user_id = %identity.user_id, %profile_id, "favorite removed");
    Ok(Message::new("Bookmark removed"))
}
