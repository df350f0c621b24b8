//! Content service behind a personal portfolio site: project and certificate
//! galleries fed from Firestore and mirrored to SQLite, résumé fallbacks for
//! project detail pages, and the contact form relay.
pub mod about;
pub mod catalog;
pub mod config;
pub mod contact;
pub mod database;
pub mod detail;
pub mod error;
pub mod gallery;
pub mod models;
pub mod profile;
pub mod server;
pub mod state;
pub mod store;
pub mod typing;

#[cfg(test)]
pub(crate) mod testing;

use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

pub async fn run() -> Result<(), server::ServerError> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();

    let config = config::Config::load()?;
    info!(project = %config.firestore_project, cache = ?config.cache_path, "Initializing state...");
    let app_state = state::AppState::from_config(&config)?;

    let app = server::router(app_state, &config.static_dir);
    server::serve(app, config.socket_addr()).await
}
