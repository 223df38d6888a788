// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

//! Logger initialization: `tracing-subscriber`'s stock `fmt` layer — this
//! crate has no spans worth re-hydrating across async task boundaries, so a
//! JSON/span-capturing formatter buys nothing here.

use std::fs;

use anyhow::{Context, Result};
use serde::Deserialize;
use tracing_subscriber::{EnvFilter, fmt};

#[derive(Debug, Deserialize, Clone)]
struct LoggerConfig {
    logger: LogConfig,
}

#[derive(Debug, Deserialize, Clone)]
struct LogConfig {
    level: String,
    #[serde(default)]
    is_show_line: bool,
    #[serde(default)]
    is_show_target: bool,
}

/// Initialize a global `tracing` subscriber from a YAML config file.
///
/// `level` is parsed as an [`EnvFilter`] directive (e.g. `"info"`,
/// `"dcerpc_flow_parser=debug,warn"`), so callers can scope verbosity per
/// module the same way `RUST_LOG` would.
pub fn init_logger(config_path: &str) -> Result<()> {
    let raw = fs::read_to_string(config_path)
        .with_context(|| format!("failed to read logger config {config_path:?}"))?;
    let parsed: LoggerConfig = serde_yaml::from_str(&raw)
        .with_context(|| format!("failed to parse logger config {config_path:?}"))?;
    let cfg = parsed.logger;

    let filter = EnvFilter::try_new(&cfg.level)
        .with_context(|| format!("invalid log level directive {:?}", cfg.level))?;

    fmt()
        .with_env_filter(filter)
        .with_line_number(cfg.is_show_line)
        .with_target(cfg.is_show_target)
        .try_init()
        .map_err(|e| anyhow::anyhow!("failed to install tracing subscriber: {e}"))
}
