//! Server configuration module

use clap::Parser;

use grosir_app::settings::BusinessArgs;

use crate::config::{
    db::DatabaseConfig,
    gateway::GatewayConfig,
    observability::{LoggingConfig, ObservabilityConfig},
    server::ServerRuntimeConfig,
};

pub(crate) mod db;
pub(crate) mod gateway;
pub(crate) mod observability;
pub(crate) mod server;

/// Grosir JSON API Server configuration
#[derive(Debug, Parser)]
#[command(name = "grosir-json", about = "Grosir JSON API Server", long_about = None)]
pub struct ServerConfig {
    /// Server network settings.
    #[command(flatten)]
    pub server: ServerRuntimeConfig,

    /// Logging output settings.
    #[command(flatten)]
    pub logging: LoggingConfig,

    /// Metrics and request logging settings.
    #[command(flatten)]
    pub observability: ObservabilityConfig,

    /// Application database settings.
    #[command(flatten)]
    pub database: DatabaseConfig,

    /// Payment gateway callback settings.
    #[command(flatten)]
    pub gateway: GatewayConfig,

    /// Tax, payment window and business time zone.
    #[command(flatten)]
    pub business: BusinessArgs,
}

impl ServerConfig {
    /// Load configuration from environment and CLI arguments
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be parsed
    pub fn load() -> Result<Self, clap::Error> {
        // Load .env file if present (ignore if missing)
        _ = dotenvy::dotenv();

        Self::try_parse()
    }

    /// Get the socket address for binding
    #[must_use]
    pub fn socket_addr(&self) -> String {
        self.server.socket_addr()
    }
}
