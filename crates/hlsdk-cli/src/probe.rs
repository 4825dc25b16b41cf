//! # Probe Subcommand
//!
//! Fetches live responses and checks them against the client's response
//! models. Connection settings come from `HLSDK_*` environment variables.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Args, Subcommand};
use serde_json::{json, Value};
use tokio::task::JoinSet;

use hlsdk_client::types::FrontendOrder;
use hlsdk_client::{ApiClient, TransportConfig};
use hlsdk_coverage::{check_described, IgnoreSpec};
use hlsdk_schema::schema_for;

use crate::{load_ignore, render_failure, render_report, OutputFormat};

/// Arguments for the `hlsdk probe` subcommand.
#[derive(Args, Debug)]
pub struct ProbeArgs {
    #[command(subcommand)]
    pub command: ProbeCommand,
}

#[derive(Subcommand, Debug)]
pub enum ProbeCommand {
    /// Open orders with frontend metadata, across one or more dexes.
    FrontendOpenOrders(FrontendOpenOrdersArgs),
}

#[derive(Args, Debug)]
pub struct FrontendOpenOrdersArgs {
    /// Account address to query.
    #[arg(long)]
    pub user: String,

    /// Additional dex to query besides the default one. Repeatable.
    #[arg(long)]
    pub dex: Vec<String>,

    /// Milliseconds to wait before the first request, for rate limits.
    #[arg(long, default_value_t = 1500)]
    pub wait: u64,

    /// Ignore-spec file merged over the built-in exclusions.
    #[arg(long)]
    pub ignore: Option<PathBuf>,

    /// Output format.
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

/// Exclusions for values an account with only resting orders cannot produce.
pub fn frontend_open_orders_ignore() -> IgnoreSpec {
    IgnoreSpec::new()
        .enum_values("#/items/properties/orderType", [json!("Market")])
        .enum_values(
            "#/items/properties/tif/anyOf/0",
            [json!("Ioc"), json!("FrontendMarket"), json!("LiquidationMarket")],
        )
}

/// Execute the probe subcommand.
pub fn run_probe(args: &ProbeArgs) -> Result<u8> {
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("failed to start async runtime")?;
    match &args.command {
        ProbeCommand::FrontendOpenOrders(cmd) => runtime.block_on(probe_frontend_open_orders(cmd)),
    }
}

async fn probe_frontend_open_orders(args: &FrontendOpenOrdersArgs) -> Result<u8> {
    let config = TransportConfig::from_env().context("invalid HLSDK_* configuration")?;
    let client = ApiClient::new(&config)?;

    let mut ignore = frontend_open_orders_ignore();
    if let Some(extra) = load_ignore(args.ignore.as_deref())? {
        ignore = ignore.merge(extra);
    }

    tracing::debug!(wait_ms = args.wait, "waiting before requests");
    tokio::time::sleep(Duration::from_millis(args.wait)).await;

    let dexes: Vec<Option<String>> = std::iter::once(None)
        .chain(args.dex.iter().cloned().map(Some))
        .collect();
    let samples = fetch_all(&client, &args.user, &dexes).await?;

    tracing::info!(
        url = %config.base_url,
        testnet = config.is_testnet,
        samples = samples.len(),
        "checking frontendOpenOrders coverage"
    );

    let described = schema_for::<Vec<FrontendOrder>>()?;
    match check_described(&described, &samples, Some(&ignore)) {
        Ok(report) => print(render_report(&report, args.format)?),
        Err(err) => print(render_failure(err, args.format)?),
    }
}

/// One request per dex, issued concurrently; results keep `dexes` order.
async fn fetch_all(client: &ApiClient, user: &str, dexes: &[Option<String>]) -> Result<Vec<Value>> {
    let mut set = JoinSet::new();
    for (index, dex) in dexes.iter().cloned().enumerate() {
        let info = client.info().clone();
        let user = user.to_string();
        set.spawn(async move {
            let result = info.frontend_open_orders_raw(&user, dex.as_deref()).await;
            (index, dex, result)
        });
    }

    let mut slots: Vec<Option<Value>> = vec![None; dexes.len()];
    while let Some(joined) = set.join_next().await {
        let (index, dex, result) = joined.context("request task panicked")?;
        let raw = result.with_context(|| {
            format!("frontendOpenOrders failed for dex {}", dex.as_deref().unwrap_or("<default>"))
        })?;
        slots[index] = Some(raw);
    }
    Ok(slots.into_iter().flatten().collect())
}

fn print((text, code): (String, u8)) -> Result<u8> {
    println!("{text}");
    Ok(code)
}

#[cfg(test)]
mod tests {
    use super::*;
    use hlsdk_coverage::{CoverageGap, GapKind};
    use hlsdk_schema::SchemaPath;

    #[test]
    fn builtin_exclusions_cover_unreachable_order_values() {
        let ignore = frontend_open_orders_ignore();
        let market = CoverageGap {
            path: SchemaPath::from("#/items/properties/orderType"),
            kind: GapKind::EnumValue { value: json!("Market") },
        };
        let alo = CoverageGap {
            path: SchemaPath::from("#/items/properties/tif/anyOf/0"),
            kind: GapKind::EnumValue { value: json!("Alo") },
        };
        assert!(ignore.excuses(&market));
        assert!(!ignore.excuses(&alo));
    }
}
