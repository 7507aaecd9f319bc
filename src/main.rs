mod commands;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "taskgate",
    version,
    about = "Login-gated to-do list web application"
)]
struct Cli {
    /// Path to the SQLite database file
    #[arg(long, env = "TASKGATE_DB", default_value = "database.db", global = true)]
    db: PathBuf,

    /// Output as JSON instead of table
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create the database and its tables
    Init,
    /// Run the web application
    Serve {
        /// Address to bind
        #[arg(long, env = "TASKGATE_HOST", default_value = "127.0.0.1")]
        host: String,
        /// Port to listen on
        #[arg(short, long, env = "TASKGATE_PORT", default_value_t = 5000)]
        port: u16,
    },
    /// List all tasks
    List,
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("taskgate=info,tower_http=info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing();

    let result = match cli.command {
        Commands::Init => commands::init::run(&cli.db),
        Commands::Serve { host, port } => commands::serve::run(&cli.db, &host, port).await,
        Commands::List => commands::list::run(&cli.db, cli.json),
    };

    if let Err(e) = result {
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}
