use axum::{
    extract::{DefaultBodyLimit, Multipart, Path, Query, State},
    routing::{get, post},
    Json, Router,
};
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::{
    auth::{AuthUser, Identity},
    error::{ApiError, Message},
    jobs::dto::{
        CreateJobRequest, JobListParams, JobResponse, UpdateJobRequest, UploadResponse,
    },
    jobs::repo::{self, JobListing, JobRow, JobStatus},
    state::AppState,
    storage::{ext_from_mime, MAX_UPLOAD_BYTES, MAX_UPLOAD_FILES},
};

const IMAGE_URL_TTL_SECS: u64 = 30 * 60;

pub fn job_routes() -> Router<AppState> {
    Router::new()
        .route("/jobs", get(list_jobs).post(create_job))
        .route(
            "/jobs/:id",
            get(get_job).put(update_job).delete(delete_job),
        )
}

pub fn upload_routes() -> Router<AppState> {
    Router::new()
        .route("/jobs/upload", post(upload_images))
        // 5 files x 5 MB plus multipart framing
        .layer(DefaultBodyLimit::max(30 * 1024 * 1024))
}

async fn enrich(state: &AppState, listing: JobListing) -> Result<JobResponse, ApiError> {
    let mut image_urls = Vec::with_capacity(listing.image_keys.len());
    for key in &listing.image_keys {
        image_urls.push(
            state
                .storage
                .presign_get(key, IMAGE_URL_TTL_SECS)
                .await
                .map_err(ApiError::Internal)?,
        );
    }
    Ok(JobResponse::from_parts(listing, image_urls))
}

fn can_mutate(row: &JobRow, identity: &Identity) -> bool {
    row.user_id == identity.user_id || identity.is_admin
}

#[instrument(skip(state))]
pub async fn list_jobs(
    State(state): State<AppState>,
    Query(params): Query<JobListParams>,
) -> Result<Json<Vec<JobResponse>>, ApiError> {
    let status = match params.status.as_deref() {
        None => None,
        Some(raw) => Some(
            JobStatus::parse(raw)
                .ok_or_else(|| ApiError::validation("Unknown job status"))?,
        ),
    };

    let rows = repo::list(&state.db, params.category.as_deref(), status).await?;
    let mut jobs = Vec::with_capacity(rows.len());
    for row in rows {
        jobs.push(enrich(&state, JobListing::from(row)).await?);
    }
    Ok(Json(jobs))
}

#[instrument(skip(state))]
pub async fn get_job(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<JobResponse>, ApiError> {
    let row = repo::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::not_found("Job listing not found"))?;
    Ok(Json(enrich(&state, JobListing::from(row)).await?))
}

#[instrument(skip(state, payload))]
pub async fn create_job(
    State(state): State<AppState>,
    AuthUser(identity): AuthUser,
    Json(payload): Json<CreateJobRequest>,
) -> Result<Json<JobResponse>, ApiError> {
    payload.validate()?;

    let row = repo::create(&state.db, identity.user_id, &payload.into_new_job()).await?;

    info!(job_id = %row.id, user_id = %identity.user_id, "job listing created");
    Ok(Json(enrich(&state, JobListing::from(row)).await?))
}

#[instrument(skip(state, payload))]
pub async fn update_job(
    State(state): State<AppState>,
    AuthUser(identity): AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateJobRequest>,
) -> Result<Json<JobResponse>, ApiError> {
    payload.validate()?;

    let existing = repo::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::not_found("Job listing not found"))?;

    if !can_mutate(&existing, &identity) {
        warn!(job_id = %id, user_id = %identity.user_id, "job update forbidden");
        return Err(ApiError::forbidden("You may only edit your own listings"));
    }

    let row = repo::update(&state.db, id, &payload.into_update())
        .await?
        .ok_or_else(|| ApiError::not_found("Job listing not found"))?;

    info!(job_id = %id, user_id = %identity.user_id, "job listing updated");
    Ok(Json(enrich(&state, JobListing::from(row)).await?))
}

#[instrument(skip(state))]
pub async fn delete_job(
    State(state): State<AppState>,
    AuthUser(identity): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<Message>, ApiError> {
    let existing = repo::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::not_found("Job listing not found"))?;

    if !can_mutate(&existing, &identity) {
        warn!(job_id = %id, user_id = %identity.user_id, "job delete forbidden");
        return Err(ApiError::forbidden("You may only delete your own listings"));
    }

    repo::delete(&state.db, id).await?;

    // stored images go too; a failed cleanup is logged, not surfaced
    for key in crate::db::decode_list(&existing.image_keys) {
        if let Err(e) = state.storage.delete_object(&key).await {
            warn!(error = %e, %key, "failed to delete job image");
        }
    }

    info!(job_id = %id, user_id = %identity.user_id, "job listing deleted");
    Ok(Message::new("Job listing deleted"))
}

/// Multipart `files[]`: at most 5 image files, 5 MB each. Returns the
/// storage keys to reference from a job create/update.
#[instrument(skip(state, multipart))]
pub async fn upload_images(
    State(state): State<AppState>,
    AuthUser(identity): AuthUser,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>, ApiError> {
    let mut keys: Vec<String> = Vec::new();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::validation(format!("Invalid multipart body: {}", e)))?
    {
        let name = field.name().map(|s| s.to_string());
        if !matches!(name.as_deref(), Some("files") | Some("files[]")) {
            continue;
        }

        if keys.len() >= MAX_UPLOAD_FILES {
            return Err(ApiError::validation("At most 5 files per upload"));
        }

        let content_type = field
            .content_type()
            .map(|s| s.to_string())
            .unwrap_or_else(|| "application/octet-stream".into());
        let Some(ext) = ext_from_mime(&content_type) else {
            return Err(ApiError::validation("Only image uploads are allowed"));
        };

        let data = field
            .bytes()
            .await
            .map_err(|e| ApiError::validation(format!("Failed to read upload: {}", e)))?;
        if data.len() > MAX_UPLOAD_BYTES {
            return Err(ApiError::validation("Each file may be at most 5 MB"));
        }

        let key = format!("jobs/{}/{}.{}", identity.user_id, Uuid::new_v4(), ext);
        state
            .storage
            .put_object(&key, data, &content_type)
            .await
            .map_err(ApiError::Internal)?;
        keys.push(key);
    }

    if keys.is_empty() {
        return Err(ApiError::validation("files[] is required"));
    }

    info!(user_id = %identity.user_id, count = keys.len(), "job images uploaded");
    Ok(Json(UploadResponse { keys }))
}
