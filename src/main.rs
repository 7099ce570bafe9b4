//! validuser server: session-validation gateway.
//!
//! Main entry point that wires all crates together and starts the server.

use std::sync::Arc;

use tracing_subscriber::{EnvFilter, fmt};

use validuser_api::{AppState, build_app, shutdown_signal};
use validuser_auth::{TokenVerifier, ValidationOrchestrator};
use validuser_core::config::AppConfig;
use validuser_core::error::AppError;
use validuser_database::{CircuitBreaker, DatabasePool, PgValidationStore, RetryingStore};

#[tokio::main]
async fn main() {
    let config = match load_configuration() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    init_logging(&config);

    if let Err(e) = run(config).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}

/// Load configuration from files and environment.
fn load_configuration() -> Result<AppConfig, AppError> {
    let env = std::env::var("VALIDUSER_ENV").unwrap_or_else(|_| "development".to_string());
    AppConfig::load(&env)
}

/// Initialize tracing/logging.
fn init_logging(config: &AppConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    match config.logging.format.as_str() {
        "json" => {
            fmt()
                .json()
                .with_env_filter(filter)
                .with_target(true)
                .with_thread_ids(true)
                .init();
        }
        _ => {
            fmt()
                .pretty()
                .with_env_filter(filter)
                .with_target(true)
                .init();
        }
    }
}

/// Main server run function.
async fn run(config: AppConfig) -> Result<(), AppError> {
    tracing::info!("Starting validuser v{}", env!("CARGO_PKG_VERSION"));

    // ── Step 1: Token verification key ───────────────────────────
    let verifier = Arc::new(TokenVerifier::from_config(&config.auth)?);

    // ── Step 2: Database pool + session store ────────────────────
    let db_pool = DatabasePool::connect_lazy(&config.database);
    let breaker = Arc::new(CircuitBreaker::new(&config.circuit_breaker));
    let store = RetryingStore::new(
        PgValidationStore::new(db_pool.clone(), breaker, &config.session),
        config.retry.clone(),
    );

    match db_pool.health_check().await {
        Ok(_) => tracing::info!("Database reachable"),
        Err(e) => tracing::warn!(error = %e, "Database not reachable at startup"),
    }

    // ── Step 3: Orchestrator + HTTP app ──────────────────────────
    let orchestrator = Arc::new(ValidationOrchestrator::new(verifier, Arc::new(store)));
    let config = Arc::new(config);
    let app = build_app(AppState::new(Arc::clone(&config), orchestrator));

    let addr = config.server.bind_address();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| AppError::internal(format!("Failed to bind {addr}: {e}")))?;

    tracing::info!("validuser listening on {}", addr);

    // ── Step 4: Serve until shutdown ─────────────────────────────
    let grace = config.server.shutdown_grace();
    let server = async move {
        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await
    };

    tokio::select! {
        result = server => {
            result.map_err(|e| AppError::internal(format!("Server error: {e}")))?;
        }
        () = async {
            shutdown_signal().await;
            tokio::time::sleep(grace).await;
        } => {
            tracing::warn!(grace_seconds = grace.as_secs(), "Graceful shutdown timed out");
        }
    }

    db_pool.close().await;
    tracing::info!("validuser stopped");
    Ok(())
}
