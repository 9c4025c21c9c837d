use std::process::ExitCode;

use tracing::{error, info};

use pas_server::config::AppConfig;
use pas_server::observability::init_tracing;
use pas_server::web::{AppState, create_router};

#[tokio::main]
async fn main() -> ExitCode {
    init_tracing();

    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!(error = %e, "invalid configuration");
            return ExitCode::FAILURE;
        }
    };

    let state = match AppState::from_config(&config) {
        Ok(state) => state,
        Err(e) => {
            error!(error = %e, "failed to create clients");
            return ExitCode::FAILURE;
        }
    };

    let app = create_router(state);

    let listener = match tokio::net::TcpListener::bind(config.bind_addr).await {
        Ok(listener) => listener,
        Err(e) => {
            error!(addr = %config.bind_addr, error = %e, "failed to bind");
            return ExitCode::FAILURE;
        }
    };

    info!(addr = %config.bind_addr, "PAS unit finder listening");
    info!("  GET  /health");
    info!("  GET  /api/geocoding?cep=");
    info!("  POST /api/unidades/buscar");
    info!("  POST /api/unidades/mapa");
    info!("  GET  /api/unidades/busca?q=");
    info!("  GET  /api/unidades/:id");
    info!("  GET  /api/categorias");
    info!("  GET  /api/especialidades");

    if let Err(e) = axum::serve(listener, app).await {
        error!(error = %e, "server error");
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}
