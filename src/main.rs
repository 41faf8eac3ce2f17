use std::sync::Arc;

use clap::Parser;
use poem::{Server, listener::TcpListener};

use pixstore_backend::api::build_app;
use pixstore_backend::app_data::AppData;
use pixstore_backend::cli::{self, Cli, Commands};
use pixstore_backend::config::database::{init_database, migrate_database};
use pixstore_backend::config::{BootstrapSettings, init_logging};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load environment variables from .env file
    dotenv::dotenv().ok();

    init_logging()?;

    let cli = Cli::parse();
    let settings = BootstrapSettings::from_env()?;
    tracing::info!("Loaded bootstrap settings: {:?}", settings);

    let command = cli.command.unwrap_or(Commands::Serve);
    if command == Commands::Migrate {
        return cli::migrate::run_migrations(&settings).await;
    }

    let db = init_database(&settings).await?;
    migrate_database(&db).await?;

    tokio::fs::create_dir_all(settings.upload_dir()).await?;

    let server_address = settings.server_address();
    let server_url = format!("http://{}/api", server_address);
    let app_data = Arc::new(AppData::init(db, settings)?);

    if command != Commands::Serve {
        return cli::execute_command(command, app_data).await;
    }

    let app = build_app(app_data, &server_url);

    tracing::info!("Starting server on http://{}", server_address);
    tracing::info!("Swagger UI available at http://{}/swagger", server_address);
    tracing::info!("API endpoints available at http://{}/api", server_address);

    Server::new(TcpListener::bind(server_address)).run(app).await?;

    Ok(())
}
