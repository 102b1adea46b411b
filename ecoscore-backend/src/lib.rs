use axum::{
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

// Re-export shared types from ecoscore-types
pub use ecoscore_types::*;

pub mod advisor;
pub mod config;
pub mod error;
pub mod handlers;
pub mod scoring;
pub mod store;

use advisor::SuggestionClient;
use config::Config;
use error::{AppError, Result};
use store::SubmissionStore;

// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub store: SubmissionStore,
    pub advisor: SuggestionClient,
}

pub async fn run_server() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    // Load configuration
    let config = Config::from_env()?;

    // Setup the suggestion client
    let advisor = SuggestionClient::new(&config)?;

    // Extract config values before moving state
    let server_address = config.server_address.clone();
    let claude_model = config.claude_model.clone();

    // Create application state
    let state = AppState {
        config,
        store: SubmissionStore::new(),
        advisor,
    };

    // Build the application router
    let app = create_app(state);

    // Create TCP listener
    let listener = tokio::net::TcpListener::bind(&server_address)
        .await
        .map_err(|e| {
            AppError::ServerError(format!("Failed to bind to {}: {}", server_address, e))
        })?;

    tracing::info!("🚀 EcoScore backend server starting on {}", server_address);
    tracing::info!("🤖 Suggestion model: {}", claude_model);

    // Start the server
    axum::serve(listener, app)
        .await
        .map_err(|e| AppError::ServerError(format!("Server error: {}", e)))?;

    Ok(())
}

pub fn create_app(state: AppState) -> Router {
    Router::new()
        // Scoring operations
        .route("/score", post(handlers::calculate_score))
        .route("/history", get(handlers::get_history))
        .route("/score-summary", get(handlers::get_summary))
        .route("/clear", post(handlers::clear_data))
        // Health check
        .route("/health", get(handlers::health_check))
        // Add middleware
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(
                    CorsLayer::new()
                        .allow_origin(Any)
                        .allow_methods(Any)
                        .allow_headers(Any),
                ),
        )
        .with_state(state)
}
