//! CampusAI Web Server
//!
//! Main web server implementation using Axum.

use crate::{create_app, AppState, WebConfig, WebError, WebResult};
use axum::serve;
use campusai_core::AppConfig;
use tokio::net::TcpListener;
use tracing::{error, info};

/// Main CampusAI web server
pub struct CampusServer {
    config: WebConfig,
    state: AppState,
}

impl CampusServer {
    /// Create a new server from web and application configuration
    pub fn new(config: WebConfig, app_config: &AppConfig) -> WebResult<Self> {
        let state = AppState::new(app_config)?;
        Ok(Self { config, state })
    }

    /// Start the web server
    pub async fn start(self) -> WebResult<()> {
        let address = self.config.address();

        info!("Starting CampusAI web server on http://{}", address);

        let app = create_app(self.state.clone());

        let listener = TcpListener::bind(&address)
            .await
            .map_err(WebError::Server)?;

        info!("Server listening on http://{}", address);

        if let Err(e) = serve(listener, app).await {
            error!("Server error: {}", e);
            return Err(WebError::Server(e));
        }

        Ok(())
    }

    /// Get server configuration
    pub fn config(&self) -> &WebConfig {
        &self.config
    }

    /// Get application state
    pub fn state(&self) -> &AppState {
        &self.state
    }
}
