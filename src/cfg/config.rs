// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

//! Parser-side limits, loadable from a YAML config file. Nothing here is
//! part of the wire protocol: these are defensive caps the embedding
//! application tunes to its own memory budget.

use std::{fs, path::Path};

use anyhow::{Context, Result, ensure};
use serde::{Deserialize, Serialize};

/// Defensive limits applied while decoding a flow. None of these change
/// protocol semantics; they only bound how much memory a single flow can
/// make the embedding application hold onto.
#[derive(Deserialize, Serialize, Debug, Clone)]
#[serde(default)]
pub struct Config {
    /// Maximum number of stub-data bytes captured per REQUEST for
    /// inspection. Bytes beyond this are still drained (framing stays
    /// correct) but not retained.
    #[serde(rename = "MaxStubCaptureLen")]
    pub max_stub_capture_len: usize,
    /// Secondary address lengths above this are logged as an anomaly but
    /// still honored — there is no wire-level maximum.
    #[serde(rename = "MaxSecondaryAddrLen")]
    pub max_secondary_addr_len: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_stub_capture_len: 4096,
            max_secondary_addr_len: 8192,
        }
    }
}

impl Config {
    /// Loads the configuration from YAML, validates it, and returns the
    /// ready-to-use value.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {path:?}"))?;
        let cfg: Config = serde_yaml::from_str(&raw)
            .with_context(|| format!("failed to parse config file {path:?}"))?;
        cfg.validate()?;
        Ok(cfg)
    }

    fn validate(&self) -> Result<()> {
        ensure!(
            self.max_stub_capture_len > 0,
            "MaxStubCaptureLen must be greater than zero"
        );
        ensure!(
            self.max_secondary_addr_len > 0,
            "MaxSecondaryAddrLen must be greater than zero"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_sane() {
        let cfg = Config::default();
        assert!(cfg.validate().is_ok());
        assert!(cfg.max_stub_capture_len > 0);
    }

    #[test]
    fn load_from_file_rejects_zeroed_limits() {
        let dir = std::env::temp_dir().join("dcerpc-flow-parser-config-test");
        fs::create_dir_all(&dir).expect("create temp dir");
        let path = dir.join("zero_limits.yaml");
        fs::write(&path, "MaxStubCaptureLen: 0\n").expect("write temp config");
        let result = Config::load_from_file(&path);
        assert!(result.is_err());
        let _ = fs::remove_file(&path);
    }
}
