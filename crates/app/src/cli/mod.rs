use clap::{Args, Parser, Subcommand};
use grosir_app::{
    context::AppContext,
    settings::{BusinessArgs, Settings},
};

mod coupons;
mod orders;

#[derive(Debug, Parser)]
#[command(name = "grosir-app", about = "Grosir operations CLI", long_about = None)]
pub(crate) struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    Orders(orders::OrdersCommand),
    Coupons(coupons::CouponsCommand),
}

impl Cli {
    pub(crate) async fn run(self) -> Result<(), String> {
        match self.command {
            Commands::Orders(command) => orders::run(command).await,
            Commands::Coupons(command) => coupons::run(command).await,
        }
    }
}

/// Connection and business arguments shared by every command.
#[derive(Debug, Args)]
pub(crate) struct ConnectionArgs {
    /// PostgreSQL connection string
    #[arg(long, env = "DATABASE_URL", hide_env_values = true)]
    database_url: String,

    /// Upper bound on pooled database connections
    #[arg(long, env = "DATABASE_MAX_CONNECTIONS", default_value_t = 2)]
    database_max_connections: u32,

    #[command(flatten)]
    business: BusinessArgs,
}

impl ConnectionArgs {
    pub(crate) fn settings(&self) -> Result<Settings, String> {
        self.business
            .resolve()
            .map_err(|error| format!("invalid business settings: {error}"))
    }

    pub(crate) async fn context(&self) -> Result<AppContext, String> {
        let settings = self.settings()?;

        AppContext::from_database_url(&self.database_url, self.database_max_connections, settings)
            .await
            .map_err(|error| format!("failed to connect to database: {error}"))
    }
}
