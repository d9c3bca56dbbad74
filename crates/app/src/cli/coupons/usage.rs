use clap::Args;
use tabled::{
    builder::Builder,
    settings::{Alignment, Style, object::Columns},
};

use grosir::money::format_rupiah;
use grosir_app::domain::coupons::records::CouponUsageReport;

use crate::cli::ConnectionArgs;

#[derive(Debug, Args)]
pub(crate) struct CouponUsageArgs {
    #[command(flatten)]
    connection: ConnectionArgs,

    /// Coupon code, matched case-insensitively
    #[arg(long)]
    code: String,
}

pub(crate) async fn run(args: CouponUsageArgs) -> Result<(), String> {
    let context = args.connection.context().await?;

    let coupon = context
        .coupons
        .find_coupon_by_code(&args.code)
        .await
        .map_err(|error| format!("failed to find coupon {}: {error}", args.code))?;

    let report = context
        .coupons
        .usage_report(coupon.uuid)
        .await
        .map_err(|error| format!("failed to load usage: {error}"))?;

    println!("{}", render(&report));

    Ok(())
}

fn render(report: &CouponUsageReport) -> String {
    let limit = report
        .coupon
        .terms
        .usage_limit
        .map_or_else(|| "unlimited".to_string(), |limit| limit.to_string());

    let mut out = format!(
        "coupon: {}\nused: {} of {limit}\ntotal discount: {}\n",
        report.coupon.code,
        report.usage_count,
        format_rupiah(report.total_discount),
    );

    if report.usages.is_empty() {
        out.push_str("no redemptions yet");
        return out;
    }

    let mut builder = Builder::default();

    builder.push_record(["Order", "Buyer", "Discount", "Redeemed at"]);

    for usage in &report.usages {
        builder.push_record([
            usage.order.to_string(),
            usage.buyer.to_string(),
            format_rupiah(usage.discount),
            usage.created_at.to_string(),
        ]);
    }

    let mut table = builder.build();

    table.with(Style::modern_rounded());
    table.modify(Columns::new(2..3), Alignment::right());

    out.push_str(&table.to_string());
    out
}
