#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
//! `loadcell`: drive ADS1230 load cells from the command line.

mod backend;
mod cli;
mod error_fmt;
mod logging;
mod monitor;

use clap::Parser;
use cli::{Cli, Commands, JSON_MODE};
use eyre::WrapErr;
use loadcell_core::conversions::bus_profile;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

fn main() {
    let cli = Cli::parse();
    let _ = JSON_MODE.set(cli.json);

    if let Err(err) = run(cli) {
        let code = error_fmt::exit_code_for_error(&err);
        if JSON_MODE.get().copied().unwrap_or(false) {
            println!("{}", error_fmt::format_error_json(&err));
        } else {
            eprintln!("{}", error_fmt::humanize(&err));
        }
        tracing::error!(error = %format!("{err:#}"), code, "loadcell failed");
        std::process::exit(code);
    }
}

fn run(cli: Cli) -> eyre::Result<()> {
    color_eyre::install()?;

    let cfg = loadcell_config::load_path(&cli.config)?;
    logging::init(&cli.log_level, cli.json, &cfg.logging)?;
    tracing::debug!(config = ?cli.config, cells = cfg.cells.len(), "config loaded");

    let profile = bus_profile(&cfg.bus).wrap_err("invalid configuration: [bus]")?;
    let mut ports = backend::open_ports(&cfg, profile)?;

    match cli.cmd {
        Commands::Monitor {
            readings,
            tare,
            no_calibrate,
            timeout_ms,
            stats,
        } => {
            let shutdown = Arc::new(AtomicBool::new(false));
            let flag = shutdown.clone();
            ctrlc::set_handler(move || flag.store(true, Ordering::Relaxed))
                .wrap_err("install Ctrl-C handler")?;
            let opts = monitor::MonitorOpts {
                readings,
                tare,
                no_calibrate,
                timeout: Duration::from_millis(timeout_ms),
                stats,
            };
            let last = monitor::run_monitor(&cfg, profile, ports, &opts, cli.json, shutdown)?;
            if !cli.json && !last.is_empty() {
                println!("monitor complete: {} cell(s)", last.len());
            }
        }
        Commands::Read { timeout_ms } => {
            let timeout = Duration::from_millis(timeout_ms.unwrap_or(cfg.polling.timeout_ms));
            monitor::run_read(&cfg, profile, ports, timeout, cli.json)?;
        }
        Commands::SelfCheck => {
            let n = monitor::self_check(profile, &mut ports)?;
            if cli.json {
                println!(
                    "{}",
                    serde_json::json!({ "status": "ok", "cells": n, "timestamp": monitor::unix_ts() })
                );
            } else {
                println!("OK: config valid, {n} cell port(s) responded");
            }
        }
    }
    Ok(())
}
