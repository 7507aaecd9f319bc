/// Database layer: open, create tables, task and user CRUD.
pub mod db;
/// Data types: Task, User, Credentials and form parsing.
pub mod models;
/// Axum-based web server, session gate and router.
pub mod web;
