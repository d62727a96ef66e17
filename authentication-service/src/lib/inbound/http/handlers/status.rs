use auth::Role;
use axum::http::StatusCode;
use axum::Extension;
use serde::Serialize;

use super::ApiSuccess;
use crate::inbound::http::middleware::AuthenticatedUser;

const SERVICE_NAME: &str = env!("CARGO_PKG_NAME");
const SERVICE_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Liveness and identity check; always 200 while the process serves traffic.
pub async fn status(
    identity: Option<Extension<AuthenticatedUser>>,
) -> ApiSuccess<StatusResponseData> {
    let identity = identity.map(|Extension(user)| user);

    ApiSuccess::new(
        StatusCode::OK,
        StatusResponseData {
            status: "ok",
            service: SERVICE_NAME,
            version: SERVICE_VERSION,
            authenticated: identity.is_some(),
            subject: identity.as_ref().map(|user| user.user_id.to_string()),
            role: identity.map(|user| user.role),
        },
    )
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusResponseData {
    pub status: &'static str,
    pub service: &'static str,
    pub version: &'static str,
    pub authenticated: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
}
