use clap::Parser;
use poem::{EndpointExt, IntoEndpoint, Route, Server, listener::TcpListener};
use poem_openapi::OpenApiService;
use std::sync::Arc;

use roster_backend::AppData;
use roster_backend::api::{RequestLogMiddleware, build_apis, error_envelope};
use roster_backend::cli::{Cli, Commands, execute_command, migrate};
use roster_backend::config::{
    BootstrapSettings, SystemEnvironment, connect_database, init_logging, migrate_database,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load environment variables from .env file
    dotenv::dotenv().ok();

    init_logging(&SystemEnvironment)?;

    let cli = Cli::parse();
    let settings = BootstrapSettings::from_env()?;

    let command = cli.command.unwrap_or(Commands::Serve);
    if command == Commands::Migrate {
        return migrate::run_migrations(&settings).await;
    }

    let db = connect_database(settings.database_url()).await?;
    migrate_database(&db).await?;
    tracing::info!("Connected to database: {}", settings.database_url());

    let app_data = Arc::new(AppData::init(db, &settings).await?);

    if command != Commands::Serve {
        return execute_command(command, app_data).await;
    }

    let api_service = OpenApiService::new(
        build_apis(app_data.clone()),
        "Roster API",
        env!("CARGO_PKG_VERSION"),
    )
    .server(format!("http://localhost:{}/api", settings.server_port()));

    // Generate Swagger UI from OpenAPI service
    let ui = api_service.swagger_ui();

    // Compose routes: nest API service under /api and Swagger UI under /swagger
    let app = Route::new()
        .nest(
            "/api",
            api_service
                .into_endpoint()
                .catch_all_error(error_envelope)
                .with(RequestLogMiddleware::new(app_data.api_log_store.clone())),
        )
        .nest("/swagger", ui);

    tracing::info!("Starting server on http://{}", settings.server_address());
    tracing::info!(
        "Swagger UI available at http://localhost:{}/swagger",
        settings.server_port()
    );

    Server::new(TcpListener::bind(settings.server_address()))
        .run(app)
        .await?;

    Ok(())
}
