// SPDX-License-Identifier: GPL-3.0-only

//! SAN Console - plans DS8000 volume ranges against a volume inventory snapshot
//!
//! Reads the inventory exported by the storage backend, applies the allocator
//! checks and prints the outcome as JSON on stdout. Logs go to stderr.

use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use serde::Serialize;
use serde_json::json;
use tokio_util::sync::CancellationToken;

use san_allocator::{PlanningSession, ValidationError, find_conflicts, first_free_run};
use san_contracts::VolumeRegistrySource;
use san_types::{AllocationRequest, parse_hex2, pretty_to_bytes};

mod cli;
mod config;
mod logging;
mod source;

use cli::{Cli, Command};
use config::Config;
use source::JsonFileSource;

/// Exit status for a refused request, distinct from operational failures.
const EXIT_REFUSED: u8 = 2;

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    let mut config = Config::load(cli.config.as_deref())?;
    apply_overrides(&mut config, &cli);
    logging::init(&config);

    tracing::info!("Starting san-console v{}", env!("CARGO_PKG_VERSION"));

    let registry = config
        .registry
        .clone()
        .context("no registry snapshot given; pass --registry or set `registry` in the config")?;
    let storage_system = config
        .storage_system
        .clone()
        .unwrap_or_else(|| "default".to_string());

    let source = JsonFileSource::new(registry, config.project_registry.clone());
    let mut session = PlanningSession::new(source, storage_system);

    let cancel = CancellationToken::new();
    let interrupt = {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                cancel.cancel();
            }
        })
    };

    let refreshed = session.refresh(&cancel).await;
    interrupt.abort();
    refreshed.with_context(|| format!("load registry of {}", session.storage_system()))?;

    run(&mut session, cli.command)
}

fn apply_overrides(config: &mut Config, cli: &Cli) {
    if let Some(registry) = &cli.registry {
        config.registry = Some(registry.clone());
    }
    if let Some(project) = &cli.project_registry {
        config.project_registry = Some(project.clone());
    }
    if let Some(storage_system) = &cli.storage_system {
        config.storage_system = Some(storage_system.clone());
    }
}

fn run<S: VolumeRegistrySource>(
    session: &mut PlanningSession<S>,
    command: Command,
) -> Result<ExitCode> {
    match command {
        Command::Validate {
            lss,
            start,
            end,
            format,
            capacity,
            pool,
            follow_policy,
        } => {
            let capacity_bytes_per_volume = pretty_to_bytes(&capacity)
                .with_context(|| format!("invalid capacity {capacity:?}"))?;

            let mut request = AllocationRequest {
                lss: lss.clone(),
                start_vol: start,
                end_vol: end,
                format: format.into(),
                capacity_bytes_per_volume,
                pool_name: pool,
            };

            let policy = match session.select_lss(&lss) {
                Ok(policy) => policy,
                Err(error) => return refuse(&error),
            };
            if follow_policy && let Some(policy) = &policy {
                request = request.coerce_to_policy(policy);
            }

            let stamped = session.validate(&request);
            let outcome = session
                .accept(stamped)
                .context("registry changed while validating")?;

            match outcome {
                Ok(plan) => {
                    tracing::info!("Plan accepted: {}", plan.summary());
                    print_json(&json!({
                        "plan": plan,
                        "summary": plan.summary(),
                        "policy": policy,
                    }))?;
                    Ok(ExitCode::SUCCESS)
                }
                Err(error) => refuse(&error),
            }
        }
        Command::Ranges { lss } => {
            if let Err(error) = session.select_lss(&lss) {
                return refuse(&error);
            }

            let ranges: Vec<_> = session
                .ranges()
                .into_iter()
                .map(|range| {
                    json!({
                        "display": range.to_string(),
                        "count": range.len(),
                        "range": range,
                    })
                })
                .collect();

            print_json(&ranges)?;
            Ok(ExitCode::SUCCESS)
        }
        Command::Free { lss, count } => {
            if let Err(error) = session.select_lss(&lss) {
                return refuse(&error);
            }

            let first_fit = match (count, session.active_lss()) {
                (Some(count), Some(lss)) => first_free_run(lss, &session.snapshot(), count),
                _ => None,
            };
            let free: Vec<_> = session
                .free()
                .into_iter()
                .map(|(start, end)| {
                    json!({
                        "start": format!("{start:02X}"),
                        "end": format!("{end:02X}"),
                    })
                })
                .collect();

            print_json(&json!({
                "free": free,
                "first_fit": first_fit.map(|start| format!("{start:02X}")),
            }))?;
            Ok(ExitCode::SUCCESS)
        }
        Command::Policy { lss } => match session.select_lss(&lss) {
            Ok(policy) => {
                print_json(&policy)?;
                Ok(ExitCode::SUCCESS)
            }
            Err(error) => refuse(&error),
        },
        Command::Conflicts { lss, start, end } => {
            let lss = parse_hex2(&lss).context("invalid LSS")?;
            let start = parse_hex2(&start).context("invalid start volume")?;
            let end = parse_hex2(&end).context("invalid end volume")?;
            if end < start {
                anyhow::bail!("end volume {end:02X} is before start volume {start:02X}");
            }

            let conflicts = find_conflicts(lss, start, end, &session.snapshot());
            print_json(&conflicts)?;
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn refuse(error: &ValidationError) -> Result<ExitCode> {
    tracing::warn!("Request refused: {error}");
    print_json(&json!({
        "error": error,
        "message": error.to_string(),
    }))?;
    Ok(ExitCode::from(EXIT_REFUSED))
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    let rendered = serde_json::to_string_pretty(value).context("render output")?;
    println!("{rendered}");
    Ok(())
}
