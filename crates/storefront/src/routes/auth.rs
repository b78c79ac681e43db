//! Authentication route handlers.
//!
//! Registration and login return the session [`Identity`] (id, name, role,
//! bearer token and its expiry) that clients keep in their session store.

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
};
use tracing::instrument;

use estore_core::{Identity, LoginRequest, Profile, RegisterRequest};

use crate::error::{AppError, Result, clear_sentry_user, set_sentry_user};
use crate::middleware::RequireAuth;
use crate::services::AuthService;
use crate::state::AppState;

/// `POST /auth/register`
#[instrument(skip_all, fields(role))]
pub async fn register(
    State(state): State<AppState>,
    body: std::result::Result<Json<RegisterRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Identity>)> {
    let Json(request) = body.map_err(AppError::from)?;
    tracing::Span::current().record("role", request.role.as_str());

    let identity = AuthService::from_state(&state).register(&request).await?;
    set_sentry_user(&identity.id);

    Ok((StatusCode::CREATED, Json(identity)))
}

/// `POST /auth/login`
#[instrument(skip_all)]
pub async fn login(
    State(state): State<AppState>,
    body: std::result::Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<Identity>> {
    let Json(request) = body.map_err(AppError::from)?;

    let identity = AuthService::from_state(&state).login(&request).await?;
    set_sentry_user(&identity.id);

    Ok(Json(identity))
}

/// `POST /auth/logout`
#[instrument(skip_all, fields(user_id = %user.id))]
pub async fn logout(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
) -> Result<StatusCode> {
    AuthService::from_state(&state).logout(&user).await?;
    clear_sentry_user();

    Ok(StatusCode::NO_CONTENT)
}

/// `GET /auth/me`
#[instrument(skip_all, fields(user_id = %user.id))]
pub async fn me(RequireAuth(user): RequireAuth) -> Json<Profile> {
    Json(user.profile())
}
