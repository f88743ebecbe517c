// src/utils/session.rs

use axum::{extract::FromRequestParts, http::request::Parts};
use sha2::{Digest, Sha512};
use tower_sessions::{
    Expiry, MemoryStore, Session, SessionManagerLayer,
    cookie::{Key, SameSite, time::Duration},
    service::SignedCookie,
};

use crate::{config::Config, error::AppError};

const USER_ID_KEY: &str = "user_id";

/// Builds the cookie session layer: in-process store, signed cookie, inactivity expiry.
pub fn session_layer(config: &Config) -> SessionManagerLayer<MemoryStore, SignedCookie> {
    SessionManagerLayer::new(MemoryStore::default())
        .with_name("sid")
        .with_same_site(SameSite::Lax)
        .with_http_only(true)
        .with_secure(config.secure_cookies)
        .with_expiry(Expiry::OnInactivity(Duration::seconds(
            config.session_ttl_seconds,
        )))
        .with_signed(signing_key(&config.session_secret))
}

/// Stretches an arbitrary secret to the 64 bytes the cookie signer requires.
fn signing_key(secret: &str) -> Key {
    let digest = Sha512::digest(secret.as_bytes());
    Key::from(digest.as_slice())
}

/// Marks the session as belonging to `user_id`. The session id is rotated first.
pub async fn start_session(session: &Session, user_id: i64) -> Result<(), AppError> {
    session.cycle_id().await?;
    session.insert(USER_ID_KEY, user_id).await?;
    Ok(())
}

/// Destroys the session and its cookie.
pub async fn end_session(session: &Session) -> Result<(), AppError> {
    session.flush().await?;
    Ok(())
}

/// Extractor for routes that require a logged-in user.
/// Rejects with 401 when the session carries no user id.
#[derive(Debug, Clone, Copy)]
pub struct AuthUser {
    pub id: i64,
}

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let session = Session::from_request_parts(parts, state)
            .await
            .map_err(|(_, msg)| AppError::InternalServerError(msg.to_string()))?;

        let id = session
            .get::<i64>(USER_ID_KEY)
            .await?
            .ok_or_else(|| AppError::AuthError("Unauthorized".to_string()))?;

        Ok(Self { id })
    }
}
