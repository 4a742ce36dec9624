// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Strict parse of the host's setup payload.
//
// The host hands over a loosely-typed object. It is validated here once and
// turned into `SetupOptions`; nothing downstream inspects the raw JSON.

use serde::{Deserialize, Serialize};

use crate::error::{CardlinkError, Result};
use crate::types::{CardScheme, Country, ImageReference};

/// Validated setup options, before image resolution.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SetupOptions {
    pub api_identifier: String,
    pub api_secret: String,
    pub program_identifier: Option<String>,
    pub company_name: Option<String>,
    pub button_background_image: Option<ImageReference>,
    pub program_name: Option<String>,
    pub delete_instructions: Option<String>,
    pub privacy_policy_url: Option<String>,
    pub terms_and_conditions_url: Option<String>,
    pub meta_data: Option<serde_json::Map<String, serde_json::Value>>,
    pub should_auto_scan_card: Option<bool>,
    pub default_selected_country: Option<Country>,
    pub allowed_countries: Option<Vec<Country>>,
    pub supported_card_schemes: Option<Vec<CardScheme>>,
}

/// Payload as the host sent it: every key optional.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct RawSetup {
    api_identifier: Option<String>,
    api_secret: Option<String>,
    program_identifier: Option<String>,
    company_name: Option<String>,
    button_background_image: Option<ImageReference>,
    program_name: Option<String>,
    delete_instructions: Option<String>,
    privacy_policy_url: Option<String>,
    terms_and_conditions_url: Option<String>,
    meta_data: Option<serde_json::Map<String, serde_json::Value>>,
    should_auto_scan_card: Option<bool>,
    default_selected_country: Option<Country>,
    allowed_countries: Option<Vec<Country>>,
    supported_card_schemes: Option<Vec<CardScheme>>,
}

impl SetupOptions {
    /// Parse and validate a raw payload.
    ///
    /// Keys present with a `null` value count as absent. Unknown keys are
    /// ignored so newer hosts can send fields this bridge does not know yet.
    pub fn from_payload(payload: &serde_json::Value) -> Result<Self> {
        if !payload.is_object() {
            return Err(CardlinkError::PayloadNotAnObject(json_kind(payload)));
        }
        let raw: RawSetup = serde_json::from_value(payload.clone())?;
        Self::validated(raw)
    }

    fn validated(raw: RawSetup) -> Result<Self> {
        let api_identifier = require_non_empty("apiIdentifier", raw.api_identifier)?;
        let api_secret = require_non_empty("apiSecret", raw.api_secret)?;

        if let Some(image) = &raw.button_background_image {
            if image.uri.trim().is_empty() {
                return Err(CardlinkError::InvalidField {
                    field: "buttonBackgroundImage",
                    reason: "uri is empty".into(),
                });
            }
            if matches!(image.scale, Some(s) if !(s.is_finite() && s > 0.0)) {
                return Err(CardlinkError::InvalidField {
                    field: "buttonBackgroundImage",
                    reason: "scale must be a positive number".into(),
                });
            }
        }

        Ok(Self {
            api_identifier,
            api_secret,
            program_identifier: raw.program_identifier,
            company_name: raw.company_name,
            button_background_image: raw.button_background_image,
            program_name: raw.program_name,
            delete_instructions: raw.delete_instructions,
            privacy_policy_url: raw.privacy_policy_url,
            terms_and_conditions_url: raw.terms_and_conditions_url,
            meta_data: raw.meta_data,
            should_auto_scan_card: raw.should_auto_scan_card,
            default_selected_country: raw.default_selected_country,
            allowed_countries: raw.allowed_countries,
            supported_card_schemes: raw.supported_card_schemes,
        })
    }
}

fn require_non_empty(field: &'static str, value: Option<String>) -> Result<String> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(CardlinkError::MissingField(field)),
    }
}

fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "a boolean",
        serde_json::Value::Number(_) => "a number",
        serde_json::Value::String(_) => "a string",
        serde_json::Value::Array(_) => "an array",
        serde_json::Value::Object(_) => "an object",
    }
}
