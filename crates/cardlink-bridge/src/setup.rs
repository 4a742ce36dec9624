// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Setup adapter: raw host payload → SDK configuration.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tracing::{info, instrument, warn};

use cardlink_core::error::Result;
use cardlink_core::setup::SetupOptions;
use cardlink_core::types::SdkConfiguration;

use crate::traits::{CardLinkingSdk, ImageResolver};

/// Validates setup payloads and configures the SDK.
///
/// The SDK is touched only after the whole payload, image included, has been
/// translated, so a failure never leaves it half-configured.
pub struct SetupAdapter<S: CardLinkingSdk> {
    sdk: Arc<S>,
    images: Arc<dyn ImageResolver>,
    configured: AtomicBool,
}

impl<S: CardLinkingSdk> SetupAdapter<S> {
    pub fn new(sdk: Arc<S>, images: Arc<dyn ImageResolver>) -> Self {
        Self {
            sdk,
            images,
            configured: AtomicBool::new(false),
        }
    }

    /// Whether a payload has ever been applied successfully.
    pub fn is_configured(&self) -> bool {
        self.configured.load(Ordering::Acquire)
    }

    /// Parse, translate and apply `payload`. Replaces any earlier setup.
    #[instrument(skip_all)]
    pub fn configure(&self, payload: &serde_json::Value) -> Result<()> {
        let config = self.translate(payload).inspect_err(|e| {
            warn!(error = %e, "setup payload rejected; SDK left unchanged");
        })?;
        info!(
            program = config.program_identifier.as_deref().unwrap_or("-"),
            has_image = config.button_background_image.is_some(),
            "configuring SDK"
        );
        self.sdk.configure(config);
        self.configured.store(true, Ordering::Release);
        Ok(())
    }

    fn translate(&self, payload: &serde_json::Value) -> Result<SdkConfiguration> {
        let options = SetupOptions::from_payload(payload)?;
        let button_background_image = options
            .button_background_image
            .as_ref()
            .map(|reference| self.images.resolve(reference))
            .transpose()?;

        Ok(SdkConfiguration {
            api_identifier: options.api_identifier,
            api_secret: options.api_secret,
            program_identifier: options.program_identifier,
            company_name: options.company_name,
            program_name: options.program_name,
            delete_instructions: options.delete_instructions,
            privacy_policy_url: options.privacy_policy_url,
            terms_and_conditions_url: options.terms_and_conditions_url,
            meta_data: options.meta_data,
            should_auto_scan_card: options.should_auto_scan_card.unwrap_or(false),
            default_selected_country: options.default_selected_country,
            allowed_countries: options.allowed_countries.unwrap_or_default(),
            supported_card_schemes: options.supported_card_schemes.unwrap_or_default(),
            button_background_image,
        })
    }
}

#[cfg(test)]
mod tests {
    use cardlink_core::error::CardlinkError;
    use cardlink_core::types::Country;
    use serde_json::json;

    use super::*;
    use crate::test_support::{RecordingSdk, StubResolver};

    fn adapter(sdk: &Arc<RecordingSdk>) -> SetupAdapter<RecordingSdk> {
        SetupAdapter::new(Arc::clone(sdk), Arc::new(StubResolver))
    }

    #[test]
    fn valid_payload_configures_once() {
        let sdk = RecordingSdk::new();
        let adapter = adapter(&sdk);
        let payload = json!({
            "apiIdentifier": "pk_live",
            "apiSecret": "sk_live",
            "programIdentifier": "prog-9",
            "companyName": "Acme",
            "defaultSelectedCountry": "IRELAND",
            "buttonBackgroundImage": { "uri": "file:///img.png", "scale": 2.0 }
        });

        adapter.configure(&payload).expect("configure");

        let configured = sdk.configured.lock().unwrap();
        assert_eq!(configured.len(), 1);
        let config = &configured[0];
        assert_eq!(config.api_identifier, "pk_live");
        assert_eq!(config.api_secret, "sk_live");
        assert_eq!(config.program_identifier.as_deref(), Some("prog-9"));
        assert_eq!(config.company_name.as_deref(), Some("Acme"));
        assert_eq!(config.default_selected_country, Some(Country::Ireland));
        assert!(!config.should_auto_scan_card);
        assert_eq!(config.button_background_image.as_ref().map(|i| i.scale), Some(2.0));
        assert!(adapter.is_configured());
    }

    #[test]
    fn missing_field_never_reaches_sdk() {
        let sdk = RecordingSdk::new();
        let adapter = adapter(&sdk);

        let err = adapter
            .configure(&json!({ "apiSecret": "sk" }))
            .unwrap_err();

        assert!(matches!(err, CardlinkError::MissingField("apiIdentifier")));
        assert!(sdk.configured.lock().unwrap().is_empty());
        assert!(!adapter.is_configured());
    }

    #[test]
    fn unresolvable_image_never_reaches_sdk() {
        let sdk = RecordingSdk::new();
        let adapter = adapter(&sdk);
        let payload = json!({
            "apiIdentifier": "pk",
            "apiSecret": "sk",
            "buttonBackgroundImage": { "uri": "bad://nowhere" }
        });

        let err = adapter.configure(&payload).unwrap_err();

        assert!(matches!(err, CardlinkError::ImageResolution(_)));
        assert!(sdk.configured.lock().unwrap().is_empty());
    }

    #[test]
    fn reconfigure_replaces_previous_values() {
        let sdk = RecordingSdk::new();
        let adapter = adapter(&sdk);

        adapter
            .configure(&json!({ "apiIdentifier": "a", "apiSecret": "s", "companyName": "Old" }))
            .expect("first");
        adapter
            .configure(&json!({ "apiIdentifier": "b", "apiSecret": "s" }))
            .expect("second");

        let configured = sdk.configured.lock().unwrap();
        assert_eq!(configured.len(), 2);
        assert_eq!(configured[1].api_identifier, "b");
        assert_eq!(configured[1].company_name, None);
    }
}
