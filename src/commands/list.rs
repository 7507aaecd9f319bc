use std::path::Path;

use crate::commands::print_tasks;
use taskgate::db::Database;

pub fn run(db_path: &Path, json: bool) -> anyhow::Result<()> {
    let db = Database::open(db_path)?;
    db.migrate()?;
    let tasks = db.list_tasks()?;
    print_tasks(&tasks, json)
}
