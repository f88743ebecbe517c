// src/handlers/auth.rs

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use serde_json::json;
use tower_sessions::Session;

use crate::{
    error::AppError,
    models::user::{LoginRequest, NewUser, RegisterRequest, UserResponse},
    store::SharedStorage,
    utils::{
        hash::{hash_password, verify_password},
        session::{AuthUser, end_session, start_session},
        validation::ValidatedJson,
    },
};

/// Registers a new user and logs them in.
///
/// Hashes the password using Argon2 before storing it. The store checks the username
/// and inserts under one lock, so concurrent registrations of a name create one user.
/// Returns 201 Created and `{id, username}`.
pub async fn register(
    State(store): State<SharedStorage>,
    session: Session,
    ValidatedJson(payload): ValidatedJson<RegisterRequest>,
) -> Result<impl IntoResponse, AppError> {
    let username = payload.username.unwrap_or_default();
    let password = payload.password.unwrap_or_default();

    let password_hash = hash_password(&password)?;
    let user = store
        .create_user(NewUser {
            username,
            password_hash,
        })
        .await?;

    start_session(&session, user.id).await?;
    tracing::info!(user_id = user.id, username = %user.username, "user registered");

    Ok((StatusCode::CREATED, Json(UserResponse::from(&user))))
}

/// Authenticates a user and binds the session to them.
///
/// Unknown usernames and wrong passwords get the same 401.
pub async fn login(
    State(store): State<SharedStorage>,
    session: Session,
    ValidatedJson(payload): ValidatedJson<LoginRequest>,
) -> Result<impl IntoResponse, AppError> {
    let username = payload.username.unwrap_or_default();
    let password = payload.password.unwrap_or_default();

    let invalid = || AppError::AuthError("Invalid credentials".to_string());

    let Some(user) = store.get_user_by_username(&username).await? else {
        tracing::debug!(%username, "login for unknown user");
        return Err(invalid());
    };

    if !verify_password(&password, &user.password_hash)? {
        tracing::debug!(user_id = user.id, "login with wrong password");
        return Err(invalid());
    }

    start_session(&session, user.id).await?;

    Ok(Json(UserResponse::from(&user)))
}

/// Destroys the current session, if any.
pub async fn logout(session: Session) -> Result<impl IntoResponse, AppError> {
    end_session(&session).await?;
    Ok(Json(json!({ "message": "Logged out successfully" })))
}

/// Returns the logged-in user.
pub async fn me(
    State(store): State<SharedStorage>,
    user: AuthUser,
) -> Result<impl IntoResponse, AppError> {
    let user = store
        .get_user(user.id)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

    Ok(Json(UserResponse::from(&user)))
}
