use askama::Template;

use crate::models::Task;

#[derive(Template)]
#[template(path = "index.html")]
pub struct IndexTemplate {
    pub username: String,
    pub tasks: Vec<Task>,
}

#[derive(Template, Default)]
#[template(path = "login.html")]
pub struct LoginTemplate {}

#[derive(Template, Default)]
#[template(path = "register.html")]
pub struct RegisterTemplate {
    pub error: Option<String>,
}
