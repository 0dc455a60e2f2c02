use character_vault::api::{self, app_state::AppState};
use character_vault::config::loader::ConfigLoader;
use character_vault::observability::{ObservabilityState, init_tracing};
use character_vault::services::create_character_service;
use character_vault::storage::{CharacterRepository, FileCharacterStore};
use std::sync::Arc;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = ConfigLoader::load()?;
    init_tracing(&config.logging);
    ConfigLoader::validate(&config)?;
    info!(
        app = %config.app_name,
        environment = %config.environment,
        "Configuration loaded successfully"
    );

    let store = FileCharacterStore::open(&config.storage.data_dir).await?;
    let repository: Arc<dyn CharacterRepository> = Arc::new(store);
    info!("Character store initialized");

    let character_service = create_character_service(repository);
    let app_state = AppState::new(character_service);
    info!("Application state created");

    let observability_state = Arc::new(ObservabilityState::new(
        config.storage.data_dir.clone(),
        env!("CARGO_PKG_VERSION"),
    ));
    let router = api::create_app(app_state, observability_state, &config.cors)?;
    info!("API router created with health endpoints");

    let addr = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Server listening on {}", addr);

    axum::serve(listener, router).await?;

    Ok(())
}
