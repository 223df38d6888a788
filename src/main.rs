// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

//! `dcerpc-inspect`: feeds a captured byte stream through [`FlowState`] and
//! prints the resulting header, interface list, and request fields as JSON.
//! The input is one or more hex-encoded lines; multiple lines are delivered
//! to [`FlowState::ingest`] as separate slices, so piping a PDU split across
//! several lines exercises the same resumption path a fragmented TCP stream
//! would.

use std::{env, fs, io::Read as _};

use anyhow::{Context, Result, bail};
use dcerpc_flow_parser::{
    cfg::{cli::resolve_config_path, config::Config, logger::init_logger},
    dcerpc::flow::FlowState,
    registration::Direction,
};
use serde_json::json;
use tracing::info;

fn read_input(path: Option<&str>) -> Result<String> {
    match path {
        Some(path) => {
            fs::read_to_string(path).with_context(|| format!("failed to read input file {path:?}"))
        },
        None => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("failed to read hex input from stdin")?;
            Ok(buf)
        },
    }
}

fn parse_direction(raw: Option<&str>) -> Result<Direction> {
    match raw {
        None | Some("to-server") | Some("client") => Ok(Direction::ToServer),
        Some("to-client") | Some("server") => Ok(Direction::ToClient),
        Some(other) => bail!("unrecognized --direction value {other:?}"),
    }
}

fn main() -> Result<()> {
    let mut args = env::args().skip(1);
    let mut input_path = None;
    let mut direction_arg = None;
    let mut config_path = "docker/config.dcerpc.yaml".to_string();
    let mut logger_config = "tests/config_logger.yaml".to_string();

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--direction" => direction_arg = args.next(),
            "--config" => config_path = args.next().context("--config requires a value")?,
            "--logger-config" => {
                logger_config = args.next().context("--logger-config requires a value")?
            },
            other if input_path.is_none() => input_path = Some(other.to_string()),
            other => bail!("unrecognized argument {other:?}"),
        }
    }

    let _ = init_logger(&logger_config);

    let cfg = resolve_config_path(&config_path)
        .and_then(Config::load_from_file)
        .unwrap_or_else(|_| Config::default());

    let direction = parse_direction(direction_arg.as_deref())?;
    let raw = read_input(input_path.as_deref())?;

    let mut flow = FlowState::new(cfg);
    let mut total_consumed = 0usize;
    for line in raw.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let bytes = hex::decode(line).with_context(|| format!("invalid hex on line {line:?}"))?;
        total_consumed += flow.ingest(direction, &bytes)?;
    }

    info!(total_consumed, "dcerpc: finished ingesting input");

    let interfaces: Vec<_> = flow
        .interfaces
        .iter()
        .map(|r| {
            json!({
                "ctx_id": r.ctx_id,
                "uuid": r.uuid_string(),
                "version": r.version,
                "version_minor": r.version_minor,
                "result": r.result,
            })
        })
        .collect();

    let report = json!({
        "header": {
            "rpc_vers": flow.header.rpc_vers,
            "rpc_vers_minor": flow.header.rpc_vers_minor,
            "pdu_type": flow.header.raw_type,
            "little_endian": flow.header.is_little_endian(),
            "frag_length": flow.header.frag_length,
            "call_id": flow.header.call_id,
        },
        "opnum": flow.opnum,
        "interfaces": interfaces,
        "stub_data_len": flow.stub_data.len(),
        "bytes_processed_in_current_pdu": flow.bytes_processed,
    });

    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
