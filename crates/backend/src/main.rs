use backend::routes::configure_routes;
use backend::shared::app_state::AppState;
use backend::shared::config::{self, Config};
use backend::shared::data::db;
use backend::system::{initialization, seed, tracing as app_tracing};
use clap::{Parser, Subcommand};
use tokio::net::TcpListener;

#[derive(Debug, Parser)]
#[command(name = "backend", about = "Food ordering backend", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Run the HTTP server (default)
    Serve,
    /// Insert fixture rows
    Seed {
        /// Drop and recreate every table first
        #[arg(long)]
        reset: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    app_tracing::initialize(&app_tracing::default_log_dir())?;
    let config = config::load_config()?;

    let db_path = config::get_database_path(&config)?;
    let conn = db::initialize_database(&db_path.to_string_lossy())
        .await
        .map_err(|e| anyhow::anyhow!("db init failed: {e}"))?;

    match cli.command.unwrap_or(Commands::Serve) {
        Commands::Serve => serve(conn, config).await,
        Commands::Seed { reset } => seed::run(&conn, &config, reset).await,
    }
}

async fn serve(conn: sea_orm::DatabaseConnection, config: Config) -> anyhow::Result<()> {
    initialization::ensure_admin_account_exists(&conn, &config.admin).await?;

    let addr = config.server.bind_address();
    let app = configure_routes(AppState::new(conn, config));

    let listener = TcpListener::bind(&addr).await?;
    tracing::info!("Server running on http://{}", addr);
    axum::serve(listener, app).await?;
    Ok(())
}
