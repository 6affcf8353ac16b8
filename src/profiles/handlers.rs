use axum::{
    extract::{Path, Query, State},
    routing::get,
    Json, Router,
};
use tracing::{info, instrument};
use uuid::Uuid;

use crate::{
    auth::AuthUser,
    error::ApiError,
    profiles::{
        dto::{ProfileResponse, SearchParams, SearchResponse, UpsertProfileRequest},
        repo::{self, Profile},
        search::{search_profiles, SearchFilters},
    },
    reviews,
    state::AppState,
};

const IMAGE_URL_TTL_SECS: u64 = 30 * 60;

pub fn read_routes() -> Router<AppState> {
    Router::new()
        .route("/profiles", get(search))
        .route("/profiles/:id", get(get_profile))
}

pub fn my_profile_routes() -> Router<AppState> {
    Router::new().route("/my-profile", get(get_my_profile).put(put_my_profile))
}

/// Attach reviews and a presigned image link to a profile.
pub(crate) async fn enrich(state: &AppState, profile: Profile) -> Result<ProfileResponse, ApiError> {
    let reviews = reviews::repo::list_by_profile(&state.db, profile.id)
        .await?
        .into_iter()
        .map(Into::into)
        .collect();
    let image_url = match &profile.image_key {
        Some(key) => Some(
            state
                .storage
                .presign_get(key, IMAGE_URL_TTL_SECS)
                .await
                .map_err(ApiError::Internal)?,
        ),
        None => None,
    };
    Ok(ProfileResponse::from_parts(profile, reviews, image_url))
}

#[instrument(skip(state))]
pub async fn search(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Result<Json<SearchResponse>, ApiError> {
    let candidates: Vec<Profile> = repo::list_all(&state.db)
        .await?
        .into_iter()
        .map(Profile::from)
        .collect();

    let filters = SearchFilters {
        service: params.service,
        region: params.region,
        name: params.name,
    };
    let outcome = search_profiles(
        candidates,
        &filters,
        params.sort.as_deref(),
        params.page,
        params.page_size,
    );

    let mut results = Vec::with_capacity(outcome.results.len());
    for profile in outcome.results {
        results.push(enrich(&state, profile).await?);
    }

    Ok(Json(SearchResponse {
        results,
        total: outcome.total,
    }))
}

#[instrument(skip(state))]
pub async fn get_profile(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ProfileResponse>, ApiError> {
    let row = repo::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::not_found("Profile not found"))?;
    Ok(Json(enrich(&state, Profile::from(row)).await?))
}

#[instrument(skip(state))]
pub async fn get_my_profile(
    State(state): State<AppState>,
    AuthUser(identity): AuthUser,
) -> Result<Json<ProfileResponse>, ApiError> {
    let row = repo::find_by_user(&state.db, identity.user_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Profile not found"))?;
    Ok(Json(enrich(&state, Profile::from(row)).await?))
}

#[instrument(skip(state, payload))]
pub async fn put_my_profile(
    State(state): State<AppState>,
    AuthUser(identity): AuthUser,
    Json(payload): Json<UpsertProfileRequest>,
) -> Result<Json<ProfileResponse>, ApiError> {
    payload.validate()?;

    let row = repo::upsert(&state.db, identity.user_id, &payload.into_upsert()).await?;

    info!(user_id = %identity.user_id, profile_id = %row.id, "profile saved");
    Ok(Json(enrich(&state, Profile::from(row)).await?))
}
