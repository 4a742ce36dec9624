// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Startup constants exported to the host before any other call.

use std::collections::BTreeMap;
use std::sync::OnceLock;

use serde_json::Value;

use crate::types::{CardScheme, Country};

/// Version of this bridge, reported to the host as `bridgeVersion`.
pub const BRIDGE_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Immutable constants table.
///
/// Built on first access and shared afterwards, so every read returns the
/// same content.
#[derive(Debug, Default, Clone, Copy)]
pub struct ExportedConstants;

impl ExportedConstants {
    pub fn constants(&self) -> &'static BTreeMap<String, Value> {
        static TABLE: OnceLock<BTreeMap<String, Value>> = OnceLock::new();
        TABLE.get_or_init(build_table)
    }
}

fn build_table() -> BTreeMap<String, Value> {
    let countries = Country::ALL
        .iter()
        .map(|c| (c.js_name().to_string(), Value::from(c.wire_value())))
        .collect::<serde_json::Map<_, _>>();
    let schemes = CardScheme::ALL
        .iter()
        .map(|s| (s.js_name().to_string(), Value::from(s.wire_value())))
        .collect::<serde_json::Map<_, _>>();

    let mut table = BTreeMap::new();
    table.insert("bridgeVersion".to_string(), Value::from(BRIDGE_VERSION));
    table.insert("Country".to_string(), Value::Object(countries));
    table.insert("CardScheme".to_string(), Value::Object(schemes));
    table
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repeated_reads_are_identical() {
        let provider = ExportedConstants;
        let first = provider.constants().clone();
        let second = provider.constants();
        assert_eq!(&first, second);
        assert!(std::ptr::eq(provider.constants(), second));
    }

    #[test]
    fn exposes_version_and_tables() {
        let table = ExportedConstants.constants();
        assert_eq!(table["bridgeVersion"], Value::from(BRIDGE_VERSION));
        assert_eq!(table["Country"]["unitedKingdom"], Value::from("UNITED_KINGDOM"));
        assert_eq!(table["CardScheme"]["americanExpress"], Value::from("AMERICAN_EXPRESS"));
    }
}
