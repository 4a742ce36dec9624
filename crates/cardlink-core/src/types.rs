// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Core domain types for the Cardlink bridge.

use serde::{Deserialize, Serialize};

/// Completion payload produced by the SDK (success, failure or cancellation).
///
/// The bridge never looks inside; the value is forwarded to the host as-is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LinkResult(pub serde_json::Value);

impl LinkResult {
    pub fn new(value: serde_json::Value) -> Self {
        Self(value)
    }

    /// Borrow the raw payload.
    pub fn as_value(&self) -> &serde_json::Value {
        &self.0
    }

    pub fn into_value(self) -> serde_json::Value {
        self.0
    }
}

impl From<serde_json::Value> for LinkResult {
    fn from(value: serde_json::Value) -> Self {
        Self(value)
    }
}

/// Host-side image descriptor, shaped like a resolved asset source
/// (`{ uri, width, height, scale }`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageReference {
    pub uri: String,
    #[serde(default)]
    pub width: Option<u32>,
    #[serde(default)]
    pub height: Option<u32>,
    /// Pixel density the asset was authored for (1.0, 2.0, 3.0).
    #[serde(default)]
    pub scale: Option<f32>,
}

/// Decoded image in the form the SDK consumes.
#[derive(Clone, PartialEq)]
pub struct PlatformImage {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Pixel density; point size is `width / scale` by `height / scale`.
    pub scale: f32,
    /// Row-major RGBA8 pixels.
    pub rgba: Vec<u8>,
}

impl std::fmt::Debug for PlatformImage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PlatformImage")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("scale", &self.scale)
            .field("rgba_len", &self.rgba.len())
            .finish()
    }
}

/// Countries the SDK can link cards for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Country {
    UnitedKingdom,
    Ireland,
    UnitedStates,
    Sweden,
    Japan,
    Canada,
}

impl Country {
    pub const ALL: [Country; 6] = [
        Country::UnitedKingdom,
        Country::Ireland,
        Country::UnitedStates,
        Country::Sweden,
        Country::Japan,
        Country::Canada,
    ];

    /// Key under which the host sees this value in the constants table.
    pub fn js_name(&self) -> &'static str {
        match self {
            Self::UnitedKingdom => "unitedKingdom",
            Self::Ireland => "ireland",
            Self::UnitedStates => "unitedStates",
            Self::Sweden => "sweden",
            Self::Japan => "japan",
            Self::Canada => "canada",
        }
    }

    /// Wire value accepted in the setup payload.
    pub fn wire_value(&self) -> &'static str {
        match self {
            Self::UnitedKingdom => "UNITED_KINGDOM",
            Self::Ireland => "IRELAND",
            Self::UnitedStates => "UNITED_STATES",
            Self::Sweden => "SWEDEN",
            Self::Japan => "JAPAN",
            Self::Canada => "CANADA",
        }
    }
}

/// Card networks the SDK accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CardScheme {
    Visa,
    Mastercard,
    AmericanExpress,
}

impl CardScheme {
    pub const ALL: [CardScheme; 3] = [
        CardScheme::Visa,
        CardScheme::Mastercard,
        CardScheme::AmericanExpress,
    ];

    pub fn js_name(&self) -> &'static str {
        match self {
            Self::Visa => "visa",
            Self::Mastercard => "mastercard",
            Self::AmericanExpress => "americanExpress",
        }
    }

    pub fn wire_value(&self) -> &'static str {
        match self {
            Self::Visa => "VISA",
            Self::Mastercard => "MASTERCARD",
            Self::AmericanExpress => "AMERICAN_EXPRESS",
        }
    }
}

/// Strongly-typed configuration handed to the SDK's `configure` entry point.
///
/// Built from [`crate::SetupOptions`] once the optional image reference has
/// been resolved.
#[derive(Debug, Clone, PartialEq)]
pub struct SdkConfiguration {
    pub api_identifier: String,
    pub api_secret: String,
    pub program_identifier: Option<String>,
    pub company_name: Option<String>,
    pub program_name: Option<String>,
    pub delete_instructions: Option<String>,
    pub privacy_policy_url: Option<String>,
    pub terms_and_conditions_url: Option<String>,
    pub meta_data: Option<serde_json::Map<String, serde_json::Value>>,
    pub should_auto_scan_card: bool,
    pub default_selected_country: Option<Country>,
    pub allowed_countries: Vec<Country>,
    pub supported_card_schemes: Vec<CardScheme>,
    pub button_background_image: Option<PlatformImage>,
}
