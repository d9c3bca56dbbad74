use clap::{Args, Subcommand};

mod usage;

#[derive(Debug, Args)]
pub(crate) struct CouponsCommand {
    #[command(subcommand)]
    command: CouponsSubcommand,
}

#[derive(Debug, Subcommand)]
enum CouponsSubcommand {
    /// Show how often a coupon has been redeemed
    Usage(usage::CouponUsageArgs),
}

pub(crate) async fn run(command: CouponsCommand) -> Result<(), String> {
    match command.command {
        CouponsSubcommand::Usage(args) => usage::run(args).await,
    }
}
