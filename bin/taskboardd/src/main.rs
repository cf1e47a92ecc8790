//! `taskboardd` — the Taskboard server binary.
//!
//! Usage:
//!   taskboardd [--listen <addr>] [--data-dir <dir>] [--sqlite <path>]
//!
//! The SQLite database defaults to `{data_dir}/taskboard.sqlite`.

mod routes;

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tracing::info;

use taskboard_core::{Module, ServiceConfig};
use taskboard_sql::{SqlStore, SqliteStore};
use taskboard_tasks::TasksModule;

/// Taskboard server.
#[derive(Parser, Debug)]
#[command(name = "taskboardd", about = "Taskboard server")]
struct Cli {
    /// Listen address.
    #[arg(long = "listen", default_value = "0.0.0.0:8080")]
    listen: String,

    /// Directory holding persistent state.
    #[arg(long = "data-dir")]
    data_dir: Option<PathBuf>,

    /// SQLite database path (overrides the data-dir default).
    #[arg(long = "sqlite")]
    sqlite: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let cli = Cli::parse();
    let config = ServiceConfig {
        data_dir: cli.data_dir,
        sqlite_path: cli.sqlite,
        listen: cli.listen,
    };

    if let Some(dir) = &config.data_dir {
        std::fs::create_dir_all(dir)?;
    }

    let sqlite_path = config.resolve_sqlite_path();
    info!("Opening SQLite database at {}", sqlite_path.display());
    let db: Arc<dyn SqlStore> = Arc::new(
        SqliteStore::open(&sqlite_path)
            .map_err(|e| anyhow::anyhow!("failed to open SQL store: {e}"))?,
    );

    let tasks = TasksModule::new(db)?;
    info!("{} module initialized", tasks.name());

    let app = routes::build_router(vec![tasks.routes()]);

    let listener = tokio::net::TcpListener::bind(&config.listen).await?;
    info!("taskboardd listening on {}", config.listen);
    axum::serve(listener, app).await?;

    Ok(())
}
