mod dto;
pub mod handlers;
pub mod repo;
pub mod search;

pub(crate) use dto::ProfileResponse;

use crate::state::AppState;
use axum::Router;

pub fn router() -> Router<AppState> {
    Router::new()
        .merge(handlers::read_routes())
        .merge(handlers::my_profile_routes())
}
