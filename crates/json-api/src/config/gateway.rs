//! Payment Gateway Config

use clap::{Args, builder::NonEmptyStringValueParser};

/// Payment gateway settings.
#[derive(Debug, Args)]
pub struct GatewayConfig {
    /// Shared secret the gateway sends with every callback
    #[arg(
        long,
        env = "PAYMENT_CALLBACK_TOKEN",
        hide_env_values = true,
        value_parser = NonEmptyStringValueParser::new()
    )]
    pub callback_token: String,
}
