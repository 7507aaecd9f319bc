use askama::Template;
use axum::{
    Extension, Form,
    extract::{Path, State},
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::{debug, info, warn};

use super::AppState;
use super::errors::AppError;
use super::session::{CurrentUser, clear_session, establish_session};
use super::templates::{IndexTemplate, LoginTemplate, RegisterTemplate};
use crate::db::DbError;
use crate::models::{Credentials, parse_title};

#[derive(Debug, Deserialize)]
pub struct TaskForm {
    pub title: Option<String>,
}

#[derive(Deserialize)]
pub struct CredentialsForm {
    pub username: Option<String>,
    pub password: Option<String>,
}

impl CredentialsForm {
    fn into_credentials(self) -> Option<Credentials> {
        Credentials::parse(self.username, self.password)
    }
}

fn render<T: Template>(template: &T) -> Result<Html<String>, AppError> {
    Ok(Html(template.render()?))
}

/// GET / (behind `require_login`)
pub async fn index(
    State(state): State<AppState>,
    Extension(CurrentUser(username)): Extension<CurrentUser>,
) -> Result<Html<String>, AppError> {
    let tasks = state.db()?.list_tasks()?;
    render(&IndexTemplate { username, tasks })
}

/// POST /add
pub async fn add_task(
    State(state): State<AppState>,
    Form(form): Form<TaskForm>,
) -> Result<Redirect, AppError> {
    match parse_title(form.title) {
        Some(title) => {
            let task = state.db()?.insert_task(&title)?;
            info!(task_id = task.id, "task added");
        }
        None => debug!("ignoring add with empty title"),
    }
    Ok(Redirect::to("/"))
}

/// GET /complete/{id}
pub async fn complete_task(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Redirect, AppError> {
    if state.db()?.complete_task(id)? {
        info!(task_id = id, "task completed");
    } else {
        debug!(task_id = id, "complete: no such task");
    }
    Ok(Redirect::to("/"))
}

/// GET /delete/{id}
pub async fn delete_task(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Redirect, AppError> {
    if state.db()?.delete_task(id)? {
        info!(task_id = id, "task deleted");
    } else {
        debug!(task_id = id, "delete: no such task");
    }
    Ok(Redirect::to("/"))
}

/// GET /register
pub async fn register_form() -> Result<Html<String>, AppError> {
    render(&RegisterTemplate::default())
}

/// POST /register
///
/// A taken username re-renders the form with a 409 and leaves the existing
/// account untouched.
pub async fn register(
    State(state): State<AppState>,
    Form(form): Form<CredentialsForm>,
) -> Result<Response, AppError> {
    let Some(creds) = form.into_credentials() else {
        return Ok(render(&RegisterTemplate::default())?.into_response());
    };

    let inserted = state.db()?.insert_user(&creds);
    match inserted {
        Ok(user) => {
            info!(username = %user.username, "user registered");
            Ok(Redirect::to("/login").into_response())
        }
        Err(DbError::UsernameTaken(name)) => {
            warn!(username = %name, "registration rejected: username taken");
            let page = render(&RegisterTemplate {
                error: Some("Username is already taken".to_string()),
            })?;
            Ok((StatusCode::CONFLICT, page).into_response())
        }
        Err(e) => Err(e.into()),
    }
}

/// GET /login
pub async fn login_form() -> Result<Html<String>, AppError> {
    render(&LoginTemplate::default())
}

/// POST /login
///
/// Failed attempts re-render the blank form.
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<CredentialsForm>,
) -> Result<Response, AppError> {
    let Some(creds) = form.into_credentials() else {
        return Ok(render(&LoginTemplate::default())?.into_response());
    };

    let user = state.db()?.verify_credentials(&creds)?;
    match user {
        Some(user) => {
            establish_session(&session, &user.username).await?;
            info!(username = %user.username, "login");
            Ok(Redirect::to("/").into_response())
        }
        None => {
            warn!(username = %creds.username, "login failed");
            Ok(render(&LoginTemplate::default())?.into_response())
        }
    }
}

/// GET /logout
pub async fn logout(session: Session) -> Result<Redirect, AppError> {
    clear_session(&session).await?;
    Ok(Redirect::to("/login"))
}
