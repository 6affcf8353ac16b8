use crate::state::AppState;
use axum::Router;

mod dto;
pub mod handlers;
pub(crate) mod identity;
pub mod password;
pub mod repo;
pub(crate) mod session;
pub(crate) mod token;

pub use identity::{AdminUser, AuthUser, Identity};
pub(crate) use dto::UserResponse;

pub fn router() -> Router<AppState> {
    Router::new().merge(handlers::auth_routes())
}
