use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use workboard::{api, config::ServerConfig, db};

#[derive(Parser)]
#[command(name = "workboard")]
#[command(about = "Project, task and employee management service")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP server
    Serve {
        /// Port for HTTP API (overrides WORKBOARD_PORT)
        #[arg(short, long)]
        port: Option<u16>,

        /// Address to bind (overrides WORKBOARD_HOST)
        #[arg(long)]
        host: Option<String>,

        /// SQLite database file (overrides WORKBOARD_DATABASE)
        #[arg(short, long)]
        database: Option<PathBuf>,
    },
    /// Apply pending schema migrations and exit
    Migrate {
        /// SQLite database file (overrides WORKBOARD_DATABASE)
        #[arg(short, long)]
        database: Option<PathBuf>,
    },
}

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::new(
        std::env::var("RUST_LOG").unwrap_or_else(|_| "workboard=debug,tower_http=debug".into()),
    );

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

fn open_database(path: Option<PathBuf>) -> anyhow::Result<db::Database> {
    let path = match path {
        Some(path) => path,
        None => db::default_path()?,
    };
    tracing::info!("Using database at {}", path.display());

    let db = db::Database::open(path.clone())
        .with_context(|| format!("Failed to open database {}", path.display()))?;
    db.migrate()?;
    Ok(db)
}

async fn serve(config: ServerConfig) -> anyhow::Result<()> {
    let db = open_database(config.database.clone())?;
    let app = api::create_router_with_config(db, &config);

    let addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    tracing::info!("Workboard server listening on http://{}", addr);

    axum::serve(listener, app).await?;
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing();

    let mut config = ServerConfig::from_env();

    match cli.command {
        Some(Commands::Serve {
            port,
            host,
            database,
        }) => {
            if let Some(port) = port {
                config.port = port;
            }
            if let Some(host) = host {
                config.host = host;
            }
            if database.is_some() {
                config.database = database;
            }
            serve(config).await?;
        }
        Some(Commands::Migrate { database }) => {
            open_database(database.or(config.database))?;
            tracing::info!("Migrations up to date");
        }
        None => serve(config).await?,
    }

    Ok(())
}
