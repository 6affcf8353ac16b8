mod dto;
pub mod handlers;
pub mod repo;

pub(crate) use dto::ReviewResponse;

use crate::state::AppState;
use axum::Router;

pub fn router() -> Router<AppState> {
    Router::new().merge(handlers::review_routes())
}
