//! Mergington Activities - Entry point.

use mergington_activities::{
    api::{create_router_with_rate_limit, AppState, RateLimitState},
    config::Config,
    registry::{default_catalog, load_catalog, Registry},
};
use tokio::net::TcpListener;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() {
    // Load configuration
    let config = match Config::load() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {:#}", e);
            std::process::exit(1);
        }
    };

    // Initialize logging
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.log.level));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Mergington Activities");

    // Seed the registry
    let catalog = match &config.registry.seed_path {
        Some(path) => match load_catalog(path) {
            Ok(c) => {
                info!(path = %path.display(), "Loaded seed catalog");
                c
            }
            Err(e) => {
                error!("{:#}", e);
                std::process::exit(1);
            }
        },
        None => default_catalog(),
    };

    if config.registry.enforce_capacity {
        warn!("Capacity enforcement enabled, signups past max_participants will be rejected");
    }

    let registry = Registry::new(catalog).enforce_capacity(config.registry.enforce_capacity);
    info!("Registry ready with {} activities", registry.count());

    let state = AppState::new(registry);
    let rate_limit = RateLimitState::new(config.rate_limit.requests_per_minute);
    if !rate_limit.is_enabled() {
        info!("Roster change quota disabled");
    }
    let app = create_router_with_rate_limit(state, &config.static_files.dir, rate_limit);

    // Bind to address
    let addr = match config.server.socket_addr() {
        Ok(a) => a,
        Err(e) => {
            error!("{:#}", e);
            std::process::exit(1);
        }
    };

    info!("Listening on {}", addr);

    let listener = match TcpListener::bind(addr).await {
        Ok(l) => l,
        Err(e) => {
            error!("Failed to bind to {}: {}", addr, e);
            std::process::exit(1);
        }
    };

    // Run server
    if let Err(e) = axum::serve(listener, app).await {
        error!("Server error: {}", e);
        std::process::exit(1);
    }
}
