//! Session gate: maps a session cookie to a logged-in username.

use axum::{
    extract::Request,
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use tower_sessions::Session;

use super::errors::AppError;

/// Session key holding the authenticated username.
pub const SESSION_USER_KEY: &str = "user";

/// Username of the authenticated requester, injected by [`require_login`].
#[derive(Debug, Clone)]
pub struct CurrentUser(pub String);

pub async fn session_user(session: &Session) -> Result<Option<String>, AppError> {
    Ok(session.get::<String>(SESSION_USER_KEY).await?)
}

/// Bind `username` to the session, issuing a fresh session id.
pub async fn establish_session(session: &Session, username: &str) -> Result<(), AppError> {
    session.cycle_id().await?;
    session.insert(SESSION_USER_KEY, username).await?;
    Ok(())
}

/// Drop the session and everything stored in it.
pub async fn clear_session(session: &Session) -> Result<(), AppError> {
    session.flush().await?;
    Ok(())
}

/// Middleware for protected routes: anonymous requests are redirected to the
/// login page, authenticated ones get a [`CurrentUser`] extension.
pub async fn require_login(session: Session, mut request: Request, next: Next) -> Response {
    match session_user(&session).await {
        Ok(Some(username)) => {
            request.extensions_mut().insert(CurrentUser(username));
            next.run(request).await
        }
        Ok(None) => Redirect::to("/login").into_response(),
        Err(e) => e.into_response(),
    }
}
