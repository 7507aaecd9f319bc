use std::path::Path;

use anyhow::Context;

use taskgate::db::Database;

pub fn run(db_path: &Path) -> anyhow::Result<()> {
    if let Some(parent) = db_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).context("failed to create directory")?;
    }

    let db = Database::open(db_path)?;
    db.migrate()?;

    println!("Initialized taskgate database at {}", db_path.display());
    Ok(())
}
