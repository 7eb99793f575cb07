use std::net::SocketAddr;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use api_rest::{router, AppState};
use symptomx_core::{
    config::{data_path_from_env_value, top_k_from_env_value},
    CoreConfig,
};

/// Main entry point for the SymptomX server
///
/// Loads the disease dataset once, then serves the symptom page and the JSON API.
/// A missing or broken dataset file never stops startup: the built-in records are
/// used instead.
///
/// # Environment Variables
/// - `SYMPTOMX_REST_ADDR`: server address (default: "0.0.0.0:3000")
/// - `SYMPTOMX_DATA_PATH`: dataset file (default: "data/diseases.json")
/// - `SYMPTOMX_TOP_K`: matches returned per query (default: 5)
/// - `RUST_LOG`: log filter, on top of the crate defaults at `info`
///
/// # Errors
/// Returns an error if:
/// - the logging configuration or `SYMPTOMX_TOP_K` cannot be parsed,
/// - the server address cannot be parsed or bound, or
/// - the HTTP server fails while running.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("symptomx_run=info".parse()?)
                .add_directive("symptomx_core=info".parse()?)
                .add_directive("api_rest=info".parse()?),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let rest_addr: SocketAddr = std::env::var("SYMPTOMX_REST_ADDR")
        .unwrap_or_else(|_| "0.0.0.0:3000".into())
        .parse()?;

    let cfg = CoreConfig::new(
        data_path_from_env_value(std::env::var("SYMPTOMX_DATA_PATH").ok()),
        top_k_from_env_value(std::env::var("SYMPTOMX_TOP_K").ok())?,
    )?;

    let state = AppState::from_config(&cfg);
    tracing::info!(
        "++ Loaded {} diseases ({})",
        state.service().dataset().len(),
        state.service().dataset().source()
    );

    tracing::info!("++ Starting SymptomX on {}", rest_addr);
    let listener = tokio::net::TcpListener::bind(rest_addr).await?;
    axum::serve(listener, router(state)).await?;

    Ok(())
}
