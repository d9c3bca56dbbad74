use clap::Args;
use jiff::Timestamp;

use crate::cli::ConnectionArgs;

#[derive(Debug, Args)]
pub(crate) struct ExpireOrdersArgs {
    #[command(flatten)]
    connection: ConnectionArgs,

    /// Sweep as of this instant instead of now (RFC 3339)
    #[arg(long)]
    at: Option<Timestamp>,
}

pub(crate) async fn run(args: ExpireOrdersArgs) -> Result<(), String> {
    let context = args.connection.context().await?;
    let at = args.at.unwrap_or_else(Timestamp::now);

    let expired = context
        .orders
        .expire_overdue_orders(at)
        .await
        .map_err(|error| format!("failed to expire orders: {error}"))?;

    if expired.is_empty() {
        println!("no overdue orders as of {at}");
        return Ok(());
    }

    for order in &expired {
        println!("expired: {order}");
    }

    println!("expired {} order(s)", expired.len());

    Ok(())
}
