// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Unified error types for Cardlink.

use thiserror::Error;

/// Top-level error type for all Cardlink operations.
#[derive(Debug, Error)]
pub enum CardlinkError {
    // -- Configuration errors --
    #[error("setup payload must be an object, got {0}")]
    PayloadNotAnObject(&'static str),

    #[error("malformed setup payload: {0}")]
    MalformedPayload(#[from] serde_json::Error),

    #[error("required setup field `{0}` is missing or empty")]
    MissingField(&'static str),

    #[error("invalid setup field `{field}`: {reason}")]
    InvalidField { field: &'static str, reason: String },

    #[error("image resolution failed: {0}")]
    ImageResolution(String),

    // -- Presentation --
    #[error("no presentation anchor available")]
    PresentationUnavailable,

    // -- I/O --
    #[error("file I/O error: {0}")]
    Io(#[from] std::io::Error),

    // -- Platform bridge --
    #[error("platform bridge error: {0}")]
    Bridge(String),

    // -- Bridge settings --
    #[error("invalid bridge config {path}: {source}")]
    ConfigFile {
        path: String,
        source: serde_json::Error,
    },
}

impl CardlinkError {
    /// Whether the error came from validating or translating a setup payload.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            Self::PayloadNotAnObject(_)
                | Self::MalformedPayload(_)
                | Self::MissingField(_)
                | Self::InvalidField { .. }
                | Self::ImageResolution(_)
        )
    }
}

/// Alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, CardlinkError>;
