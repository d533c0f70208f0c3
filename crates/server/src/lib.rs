//! Lectern HTTP Server
//!
//! Actix-web REST API for the browser UI: source extraction, summaries,
//! quizzes and scoring

mod error;
mod routes;
mod state;
mod types;

pub use error::ApiError;
pub use routes::configure;
pub use state::AppState;

use actix_cors::Cors;
use actix_web::{web, App, HttpServer};
use lectern_common::{AppConfig, LecternError, Result};
use tracing::info;
use tracing_actix_web::TracingLogger;

/// Start the HTTP server and run until shutdown
pub async fn start_server(config: AppConfig) -> Result<()> {
    let bind_address = config.server_bind_address();
    let static_dir = config.static_dir.clone();
    let state = web::Data::new(AppState::new(config)?);

    if let Some(dir) = &static_dir {
        info!("Serving static UI from {}", dir.display());
    }
    info!("Starting HTTP server on {}", bind_address);

    HttpServer::new(move || {
        let cors = Cors::default()
            .allow_any_origin()
            .allow_any_method()
            .allow_any_header()
            .max_age(3600);

        let mut app = App::new()
            .wrap(cors)
            .wrap(TracingLogger::default())
            .app_data(state.clone())
            .configure(configure);

        if let Some(dir) = &static_dir {
            app = app.service(actix_files::Files::new("/", dir).index_file("index.html"));
        }

        app
    })
    .bind(&bind_address)
    .map_err(|e| LecternError::config(format!("Cannot bind {}: {}", bind_address, e)))?
    .run()
    .await?;

    info!("Server stopped");
    Ok(())
}
