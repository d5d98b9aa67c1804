//! Replay command implementation.

use anyhow::{Context, Result};
use std::collections::HashMap;
use std::path::Path;
use tactic_config::{load_config, AppConfig};
use tactic_core::traits::BarFeed;
use tactic_core::types::{Bar, ExecutionMode};
use tactic_data::CsvBarFeed;
use tactic_policies::PolicyRegistry;
use tactic_runner::{ReplayConfig, ReplayHarness};
use tracing::info;

use crate::cli::{ModeArg, ReplayArgs};

pub async fn run(args: ReplayArgs, config_path: &Path) -> Result<()> {
    let config = if config_path.exists() {
        load_config(config_path).context("Failed to load configuration")?
    } else {
        AppConfig::default()
    };
    config.validate().context("Invalid policy configuration")?;

    let mode = match args.mode {
        Some(ModeArg::Auto) => ExecutionMode::AutoExecute,
        Some(ModeArg::Notify) => ExecutionMode::NotifyOnly,
        None => config.execution.mode,
    };

    let mut harness = ReplayHarness::new(ReplayConfig {
        mode,
        order_quantity: config.execution.order_quantity,
        cash: config.execution.cash,
        series_capacity: config.replay.series_capacity,
    });

    // Build the requested policies, falling back to every configured one
    let registry = PolicyRegistry::new();
    let names = if args.policy.is_empty() {
        configured_policies(&config, &registry)
    } else {
        args.policy.clone()
    };
    for name in &names {
        let policy = match policy_section(&config, name) {
            Some(section) => registry
                .create(name, section)
                .with_context(|| format!("Failed to create policy '{name}'"))?,
            None => registry
                .create_default(name)
                .with_context(|| format!("Failed to create policy '{name}'"))?,
        };
        harness.register(policy);
    }
    if harness.policy_count() == 0 {
        anyhow::bail!("No policies selected; use --policy or add a [policies.*] section");
    }

    // Load the bar data
    let data = load_data(&args.data).await?;
    if data.is_empty() {
        anyhow::bail!("No bar data; use --data INSTRUMENT=path.csv");
    }
    info!(instruments = data.len(), "bar data loaded");

    let summary = harness.run(data).await?;

    match args.output.as_str() {
        "json" => println!("{}", serde_json::to_string_pretty(&summary)?),
        _ => print!("{summary}"),
    }

    Ok(())
}

fn configured_policies(config: &AppConfig, registry: &PolicyRegistry) -> Vec<String> {
    let mut names = Vec::new();
    if config.policies.rsi_threshold.is_some() {
        names.push("rsi_threshold".to_string());
    }
    if config.policies.momentum_reversal.is_some() {
        names.push("momentum_reversal".to_string());
    }
    if config.policies.trend_follow.is_some() {
        names.push("trend_follow".to_string());
    }
    if names.is_empty() {
        // Nothing configured: run everything with defaults
        names = registry.list().iter().map(|i| i.name.clone()).collect();
    }
    names
}

fn policy_section(config: &AppConfig, name: &str) -> Option<serde_json::Value> {
    let section = match name {
        "rsi_threshold" => serde_json::to_value(config.policies.rsi_threshold.as_ref()?),
        "momentum_reversal" => serde_json::to_value(config.policies.momentum_reversal.as_ref()?),
        "trend_follow" => serde_json::to_value(config.policies.trend_follow.as_ref()?),
        _ => return None,
    };
    section.ok()
}

async fn load_data(pairs: &[String]) -> Result<HashMap<String, Vec<Bar>>> {
    let mut feed = CsvBarFeed::new();
    for pair in pairs {
        let (instrument, path) = pair
            .split_once('=')
            .context("--data expects INSTRUMENT=path.csv")?;
        feed = feed.with_file(instrument, path)?;
    }

    let instruments: Vec<String> = feed.instruments().into_iter().cloned().collect();
    let mut data = HashMap::new();
    for instrument in instruments {
        let bars = feed.load(&instrument).await?;
        info!(instrument = %instrument, bars = bars.len(), "bars loaded");
        data.insert(instrument, bars);
    }
    Ok(data)
}
