use std::path::Path;

pub async fn run(db_path: &Path, host: &str, port: u16) -> anyhow::Result<()> {
    taskgate::web::serve(db_path, host, port).await
}
