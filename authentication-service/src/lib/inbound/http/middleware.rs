use auth::Role;
use auth::TokenError;
use axum::extract::Request;
use axum::extract::State;
use axum::http::{self};
use axum::middleware::Next;
use axum::response::Response;

use crate::domain::user::models::UserId;
use crate::domain::user::ports::UserServicePort;
use crate::inbound::http::router::AppState;

/// Extension type to store the verified token identity in request extensions
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedUser {
    pub user_id: UserId,
    pub role: Role,
}

/// Middleware that identifies the caller from an optional Bearer token.
///
/// Requests without a token, or with one that fails verification, continue
/// anonymously; the handler decides what an anonymous caller may see.
pub async fn identify<US: UserServicePort>(
    State(state): State<AppState<US>>,
    mut req: Request,
    next: Next,
) -> Response {
    if let Some(token) = extract_bearer_token(&req) {
        match verify(&state, token) {
            Ok(user) => {
                tracing::debug!(user_id = %user.user_id, role = %user.role, "Caller identified");
                req.extensions_mut().insert(user);
            }
            Err(e) => tracing::info!(error = %e, "Presented token rejected"),
        }
    }

    next.run(req).await
}

fn verify<US: UserServicePort>(
    state: &AppState<US>,
    token: &str,
) -> Result<AuthenticatedUser, TokenError> {
    let identity = state.verifier.verify(token)?;

    let user_id = UserId::from_string(&identity.subject)
        .map_err(|e| TokenError::MalformedToken(e.to_string()))?;

    Ok(AuthenticatedUser {
        user_id,
        role: identity.role,
    })
}

fn extract_bearer_token(req: &Request) -> Option<&str> {
    let header = req.headers().get(http::header::AUTHORIZATION)?;
    let value = header.to_str().ok()?;
    let (scheme, token) = value.split_once(' ')?;

    if scheme.eq_ignore_ascii_case("Bearer") && !token.trim().is_empty() {
        Some(token.trim())
    } else {
        None
    }
}
