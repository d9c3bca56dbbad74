use clap::{Args, Subcommand};

mod expire;

#[derive(Debug, Args)]
pub(crate) struct OrdersCommand {
    #[command(subcommand)]
    command: OrdersSubcommand,
}

#[derive(Debug, Subcommand)]
enum OrdersSubcommand {
    /// Cancel pending orders whose payment deadline has passed
    Expire(expire::ExpireOrdersArgs),
}

pub(crate) async fn run(command: OrdersCommand) -> Result<(), String> {
    match command.command {
        OrdersSubcommand::Expire(args) => expire::run(args).await,
    }
}
