// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Cardlink — Core types and error definitions shared across all crates.

pub mod config;
pub mod constants;
pub mod error;
pub mod setup;
pub mod types;

pub use config::BridgeConfig;
pub use constants::ExportedConstants;
pub use error::CardlinkError;
pub use setup::SetupOptions;
pub use types::*;
