use auth::JwkSet;
use axum::extract::State;
use axum::http::header;
use axum::response::IntoResponse;
use axum::Json;

use super::DISCOVERY_CACHE_CONTROL;
use crate::domain::user::ports::UserServicePort;
use crate::inbound::http::router::AppState;

pub async fn jwks<US: UserServicePort>(State(state): State<AppState<US>>) -> impl IntoResponse {
    let keys: JwkSet = state.discovery.jwks().clone();
    (
        [(header::CACHE_CONTROL, DISCOVERY_CACHE_CONTROL)],
        Json(keys),
    )
}
