use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Task {
    pub id: i64,
    pub title: String,
    pub completed: bool,
}

impl Task {
    pub fn status_label(&self) -> &'static str {
        if self.completed { "done" } else { "open" }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct User {
    pub id: i64,
    pub username: String,
    /// Stored and compared verbatim.
    #[serde(skip_serializing)]
    pub password: String,
}

/// A username/password pair that passed form validation.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    /// Build credentials from raw form fields.
    ///
    /// Returns `None` when either field is missing or empty. Both values are
    /// kept exactly as submitted.
    pub fn parse(username: Option<String>, password: Option<String>) -> Option<Self> {
        let username = username.filter(|u| !u.is_empty())?;
        let password = password.filter(|p| !p.is_empty())?;
        Some(Credentials { username, password })
    }
}

// Keep passwords out of logs.
impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Validate a submitted task title. Absent or empty titles are rejected;
/// anything else is stored as sent.
pub fn parse_title(title: Option<String>) -> Option<String> {
    title.filter(|t| !t.is_empty())
}
