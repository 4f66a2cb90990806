use std::net::SocketAddr;
use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use coloring_book_generator::{api, config, generation};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    // Load configuration
    config::Config::dotenv_load();
    let config = config::Config::new()?;
    config.print_env_vars();

    let client = generation::ImageClient::new(&config)?;
    if !client.is_configured() {
        tracing::warn!("OPENAI_API_KEY is not set; generation requests will be sent without credentials");
    }
    let state = Arc::new(api::AppState::new(client, &config));
    let _sweeper = api::SessionStore::spawn_idle_eviction(state.sessions.clone(), config.session_sweep_interval());
    let app = api::router(state);

    // Run our application with safe parsing
    let ip: std::net::IpAddr = config.api_host.parse().unwrap_or_else(|_| {
        tracing::warn!("Invalid API_HOST '{}', falling back to 127.0.0.1", config.api_host);
        std::net::IpAddr::from([127, 0, 0, 1])
    });
    let port: u16 = config.api_port.parse().unwrap_or_else(|_| {
        tracing::warn!("Invalid API_PORT '{}', falling back to 8190", config.api_port);
        8190
    });
    let socket_address = SocketAddr::new(ip, port);
    tracing::info!("listening on {}", socket_address);
    axum::Server::bind(&socket_address)
        .serve(app.into_make_service())
        .await?;
    Ok(())
}
