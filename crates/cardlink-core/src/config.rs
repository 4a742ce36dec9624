// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Bridge configuration.

use serde::{Deserialize, Serialize};

use crate::error::CardlinkError;

/// Name of the single event the bridge emits to the host.
pub const RESULT_AVAILABLE_EVENT: &str = "ResultAvailable";

/// Runtime settings for the bridge itself (not the SDK's setup payload).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BridgeConfig {
    /// Event name results are emitted under.
    pub event_name: String,
    /// Thread name used by the serial delivery queue on desktop hosts.
    pub delivery_thread_name: String,
    /// Log at `warn` instead of `debug` when `start` finds no active screen.
    pub warn_on_missing_anchor: bool,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            event_name: RESULT_AVAILABLE_EVENT.to_string(),
            delivery_thread_name: "cardlink-delivery".to_string(),
            warn_on_missing_anchor: true,
        }
    }
}

impl BridgeConfig {
    /// Load settings from a JSON file. Missing keys fall back to defaults.
    pub fn from_json_file(path: impl AsRef<std::path::Path>) -> crate::error::Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)?;
        serde_json::from_str(&raw).map_err(|source| CardlinkError::ConfigFile {
            path: path.display().to_string(),
            source,
        })
    }
}
