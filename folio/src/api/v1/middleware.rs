//! # Admin API Key Authentication
//!
//! Guards the `/api/v1/admin` routes with Bearer token authentication checked
//! against `FOLIO_API_KEYS`. Public routes (health, docs, chat, gallery) never
//! pass through here.
//!
//! Errors are returned as the v1 `ApiResponse` envelope so they conform to
//! the rest of the contract.

use axum::{
    body::Body,
    extract::State,
    http::{header, Request},
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::api::state::AppState;

use super::response::{ApiResponse, ErrorCode};

/// Enforce Bearer authentication for admin routes.
///
/// - No keys configured: the request passes. The site has historically run
///   with an open admin, and `main` warns loudly at startup.
/// - Missing or malformed `Authorization` header: 401.
/// - Unknown token: 401.
pub async fn admin_auth_middleware(
    State(state): State<AppState>,
    request: Request<Body>,
    next: Next,
) -> Response {
    let keys = &state.config.server.api_keys;
    if keys.is_empty() {
        return next.run(request).await;
    }

    let auth_header = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok());

    let token = match auth_header {
        Some(h) => match h.strip_prefix("Bearer ") {
            Some(token) => token.trim(),
            None => {
                return ApiResponse::<()>::error(
                    ErrorCode::Unauthorized,
                    "Invalid authorization header format. Expected: Bearer <token>",
                )
                .into_response();
            }
        },
        None => {
            return ApiResponse::<()>::error(
                ErrorCode::Unauthorized,
                "Missing authorization header",
            )
            .into_response();
        }
    };

    if keys.iter().any(|key| key == token) {
        next.run(request).await
    } else {
        tracing::debug!("Rejected admin request with unknown API key");
        ApiResponse::<()>::error(ErrorCode::Unauthorized, "Invalid API key").into_response()
    }
}
