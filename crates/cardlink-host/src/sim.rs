// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Simulated card-linking SDK.
//
// Behaves like the real SDK at the bridge boundary: `present` returns at
// once and the outcome arrives later from a worker thread.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::thread;
use std::time::Duration;

use serde_json::json;
use tracing::{info, warn};

use cardlink_bridge::stub::ScreenAnchor;
use cardlink_bridge::{CardLinkingSdk, ResultHandler, SubscriptionHandle};
use cardlink_core::types::{CardScheme, LinkResult, SdkConfiguration};

#[derive(Default)]
struct Shared {
    config: Mutex<Option<SdkConfiguration>>,
    handlers: Mutex<BTreeMap<u64, ResultHandler>>,
}

/// In-process stand-in for the SDK.
pub struct SimulatedSdk {
    shared: Arc<Shared>,
    next_handle: AtomicU64,
    latency: Duration,
}

impl SimulatedSdk {
    pub fn new(latency: Duration) -> Self {
        Self {
            shared: Arc::new(Shared::default()),
            next_handle: AtomicU64::new(1),
            latency,
        }
    }
}

impl CardLinkingSdk for SimulatedSdk {
    type Anchor = ScreenAnchor;

    fn configure(&self, config: SdkConfiguration) {
        *self.shared.config.lock().unwrap_or_else(PoisonError::into_inner) = Some(config);
    }

    fn present(&self, anchor: &ScreenAnchor) {
        info!(screen = %anchor.name, "simulated SDK presenting linking flow");
        let shared = Arc::clone(&self.shared);
        let latency = self.latency;
        let spawned = thread::Builder::new()
            .name("sim-sdk".into())
            .spawn(move || {
                thread::sleep(latency);
                let result = outcome(
                    shared
                        .config
                        .lock()
                        .unwrap_or_else(PoisonError::into_inner)
                        .as_ref(),
                );
                let handlers: Vec<_> = shared
                    .handlers
                    .lock()
                    .unwrap_or_else(PoisonError::into_inner)
                    .values()
                    .cloned()
                    .collect();
                for handler in handlers {
                    handler(result.clone());
                }
            });
        if let Err(e) = spawned {
            warn!(error = %e, "simulated SDK could not start its flow");
        }
    }

    fn subscribe(&self, handler: ResultHandler) -> SubscriptionHandle {
        let id = self.next_handle.fetch_add(1, Ordering::Relaxed);
        self.shared
            .handlers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(id, handler);
        SubscriptionHandle(id)
    }

    fn unsubscribe(&self, handle: SubscriptionHandle) {
        self.shared
            .handlers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&handle.0);
    }
}

/// Result the simulated flow reports: a linked card when configured, an
/// error otherwise.
fn outcome(config: Option<&SdkConfiguration>) -> LinkResult {
    let Some(config) = config else {
        return LinkResult::new(json!({
            "error": { "type": "sdkConfigurationError", "message": "SDK was not configured" }
        }));
    };
    let scheme = config
        .supported_card_schemes
        .first()
        .copied()
        .unwrap_or(CardScheme::Visa);
    LinkResult::new(json!({
        "enrollmentResult": {
            "cardId": "card-0001",
            "scheme": scheme.wire_value(),
            "programId": config.program_identifier,
            "lastFourDigits": "4242",
            "metadata": config.meta_data,
        }
    }))
}
