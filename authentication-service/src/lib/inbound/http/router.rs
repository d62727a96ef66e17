use std::sync::Arc;
use std::time::Duration;

use auth::TokenVerifier;
use axum::body::Body;
use axum::http::Request;
use axum::http::Response;
use axum::middleware;
use axum::routing::get;
use axum::routing::post;
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing::Span;

use super::handlers::jwks::jwks;
use super::handlers::login::login;
use super::handlers::openid_configuration::openid_configuration;
use super::handlers::register::register;
use super::handlers::status::status;
use super::middleware::identify;
use crate::domain::discovery::models::JWKS_PATH;
use crate::domain::discovery::models::OPENID_CONFIGURATION_PATH;
use crate::domain::discovery::models::TOKEN_PATH;
use crate::domain::discovery::models::USERINFO_PATH;
use crate::domain::discovery::service::DiscoveryService;
use crate::domain::user::ports::UserServicePort;

pub struct AppState<US: UserServicePort> {
    pub user_service: Arc<US>,
    pub verifier: Arc<TokenVerifier>,
    pub discovery: Arc<DiscoveryService>,
}

impl<US: UserServicePort> Clone for AppState<US> {
    fn clone(&self) -> Self {
        Self {
            user_service: Arc::clone(&self.user_service),
            verifier: Arc::clone(&self.verifier),
            discovery: Arc::clone(&self.discovery),
        }
    }
}

pub fn create_router<US: UserServicePort>(
    user_service: Arc<US>,
    verifier: Arc<TokenVerifier>,
    discovery: Arc<DiscoveryService>,
    request_timeout: Duration,
) -> Router {
    let state = AppState {
        user_service,
        verifier,
        discovery,
    };

    let credential_routes = Router::new()
        .route("/api/auth/register", post(register::<US>))
        .route(TOKEN_PATH, post(login::<US>));

    let identity_routes = Router::new()
        .route(USERINFO_PATH, get(status))
        .route_layer(middleware::from_fn_with_state(state.clone(), identify::<US>));

    let discovery_routes = Router::new()
        .route(JWKS_PATH, get(jwks::<US>))
        .route(OPENID_CONFIGURATION_PATH, get(openid_configuration::<US>));

    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(|request: &Request<Body>| {
            tracing::info_span!(
                "http_request",
                method = %request.method(),
                uri = %request.uri(),
                version = ?request.version(),
            )
        })
        .on_request(|request: &Request<Body>, _span: &Span| {
            tracing::info!(
                method = %request.method(),
                uri = %request.uri(),
                "Request started"
            );
        })
        .on_response(
            |response: &Response<Body>, latency: Duration, _span: &Span| {
                tracing::info!(
                    status = response.status().as_u16(),
                    latency_ms = latency.as_millis(),
                    "Request completed"
                );
            },
        );

    Router::new()
        .merge(credential_routes)
        .merge(identity_routes)
        .merge(discovery_routes)
        .layer(TimeoutLayer::new(request_timeout))
        .layer(trace_layer)
        .layer(CorsLayer::permissive())
        .with_state(state)
}
