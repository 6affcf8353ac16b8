use axum::{
    extract::State,
    http::{header, HeaderMap},
    routing::{get, post},
    Json, Router,
};
use tracing::{info, instrument, warn};

use crate::{
    admin,
    auth::{
        dto::{AuthResponse, LoginRequest, RegisterRequest, UserResponse},
        identity::AuthUser,
        password::{hash_password, is_valid_email, verify_password, MIN_PASSWORD_LEN},
        repo::{User, UserStatus},
        session, token,
    },
    error::{ApiError, Message},
    state::AppState,
};

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/logout", post(logout))
        .route("/user", get(current_user))
}

/// Open a session for the user and issue the fallback token.
async fn start_session(
    state: &AppState,
    user: &User,
) -> Result<(String, HeaderMap), ApiError> {
    let session = session::create(&state.db, user.id).await?;
    let token = token::issue(user.id, &user.email);

    let mut headers = HeaderMap::new();
    headers.insert(
        header::SET_COOKIE,
        session::build_cookie(&state.config.session_cookie, &session.id.to_string())
            .parse()
            .unwrap(),
    );
    Ok((token, headers))
}

#[instrument(skip(state, payload))]
pub async fn register(
    State(state): State<AppState>,
    Json(mut payload): Json<RegisterRequest>,
) -> Result<(HeaderMap, Json<AuthResponse>), ApiError> {
    payload.email = payload.email.trim().to_lowercase();

    if !is_valid_email(&payload.email) {
        warn!(email = %payload.email, "invalid email");
        return Err(ApiError::validation("Invalid email"));
    }

    if payload.password.len() < MIN_PASSWORD_LEN {
        warn!("password too short");
        return Err(ApiError::validation("Password too short"));
    }

    if admin::repo::email_is_banned(&state.db, &payload.email).await? {
        warn!(email = %payload.email, "registration attempt with banned email");
        return Err(ApiError::forbidden("This email address is banned"));
    }

    if User::find_by_email(&state.db, &payload.email).await?.is_some() {
        warn!(email = %payload.email, "email already registered");
        return Err(ApiError::conflict("Email already registered"));
    }

    let hash = hash_password(&payload.password)?;
    let user = User::create(&state.db, &payload.email, &hash).await?;

    let (token, headers) = start_session(&state, &user).await?;

    info!(user_id = %user.id, email = %user.email, "user registered");
    Ok((
        headers,
        Json(AuthResponse {
            token,
            user: UserResponse::from(user),
        }),
    ))
}

#[instrument(skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    Json(mut payload): Json<LoginRequest>,
) -> Result<(HeaderMap, Json<AuthResponse>), ApiError> {
    payload.email = payload.email.trim().to_lowercase();

    if !is_valid_email(&payload.email) {
        warn!(email = %payload.email, "invalid email");
        return Err(ApiError::validation("Invalid email"));
    }

    let user = User::find_by_email(&state.db, &payload.email)
        .await?
        .ok_or_else(|| {
            warn!(email = %payload.email, "login unknown email");
            ApiError::unauthorized("Invalid credentials")
        })?;

    if !verify_password(&payload.password, &user.password_hash)? {
        warn!(email = %payload.email, user_id = %user.id, "login invalid password");
        return Err(ApiError::unauthorized("Invalid credentials"));
    }

    // deleted accounts look like unknown credentials; anything else
    // short of active is treated as suspended
    match UserStatus::parse(&user.status) {
        Some(UserStatus::Active) => {}
        Some(UserStatus::Deleted) => {
            warn!(user_id = %user.id, "login attempt on deleted account");
            return Err(ApiError::unauthorized("Invalid credentials"));
        }
        _ => {
            warn!(user_id = %user.id, status = %user.status, "login on inactive account");
            return Err(ApiError::forbidden("Account is suspended"));
        }
    }

    let (token, headers) = start_session(&state, &user).await?;

    info!(user_id = %user.id, email = %user.email, "user logged in");
    Ok((
        headers,
        Json(AuthResponse {
            token,
            user: UserResponse::from(user),
        }),
    ))
}

#[instrument(skip(state, headers))]
pub async fn logout(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<(HeaderMap, Json<Message>), ApiError> {
    if let Some(sid) =
        session::session_id_from_headers(&headers, &state.config.session_cookie)
    {
        session::delete(&state.db, sid).await?;
        info!(session_id = %sid, "session closed");
    }

    let mut response_headers = HeaderMap::new();
    response_headers.insert(
        header::SET_COOKIE,
        session::clear_cookie(&state.config.session_cookie)
            .parse()
            .unwrap(),
    );
    Ok((response_headers, Message::new("Logged out")))
}

#[instrument(skip(state))]
pub async fn current_user(
    State(state): State<AppState>,
    AuthUser(identity): AuthUser,
) -> Result<Json<UserResponse>, ApiError> {
    tracing::debug!(source = ?identity.source, "current user lookup");
    let user = User::find_by_id(&state.db, identity.user_id)
        .await?
        .ok_or_else(|| {
            warn!(user_id = %identity.user_id, "identity without user row");
            ApiError::unauthorized("User not found")
        })?;

    Ok(Json(UserResponse::from(user)))
}
