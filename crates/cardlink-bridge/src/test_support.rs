// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Hand-written fakes shared by the unit tests.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use cardlink_core::error::{CardlinkError, Result};
use cardlink_core::types::{ImageReference, LinkResult, PlatformImage, SdkConfiguration};

use crate::traits::*;

/// Anchor used by the fakes: just a screen name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FakeScreen(pub &'static str);

/// SDK double that records every call and lets tests fire notifications.
#[derive(Default)]
pub struct RecordingSdk {
    pub configured: Mutex<Vec<SdkConfiguration>>,
    pub presented: Mutex<Vec<FakeScreen>>,
    handlers: Mutex<BTreeMap<u64, ResultHandler>>,
    subscribe_calls: AtomicU64,
    unsubscribe_calls: AtomicU64,
    on_subscribe: Mutex<Option<SubscribeHook>>,
}

/// Callback run from inside `subscribe`, after the handler is registered.
pub type SubscribeHook = Box<dyn Fn() + Send + Sync>;

impl RecordingSdk {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Deliver `result` to every live handler, as the SDK would.
    pub fn notify(&self, result: LinkResult) {
        for handler in self.live_handlers() {
            handler(result.clone());
        }
    }

    /// Snapshot of the currently registered handlers.
    pub fn live_handlers(&self) -> Vec<ResultHandler> {
        self.handlers.lock().unwrap().values().cloned().collect()
    }

    pub fn live_subscriptions(&self) -> usize {
        self.handlers.lock().unwrap().len()
    }

    pub fn subscribe_calls(&self) -> u64 {
        self.subscribe_calls.load(Ordering::SeqCst)
    }

    pub fn unsubscribe_calls(&self) -> u64 {
        self.unsubscribe_calls.load(Ordering::SeqCst)
    }

    /// Make `subscribe` call back into the caller before returning.
    pub fn on_subscribe(&self, hook: impl Fn() + Send + Sync + 'static) {
        *self.on_subscribe.lock().unwrap() = Some(Box::new(hook));
    }
}

impl CardLinkingSdk for RecordingSdk {
    type Anchor = FakeScreen;

    fn configure(&self, config: SdkConfiguration) {
        self.configured.lock().unwrap().push(config);
    }

    fn present(&self, anchor: &FakeScreen) {
        self.presented.lock().unwrap().push(anchor.clone());
    }

    fn subscribe(&self, handler: ResultHandler) -> SubscriptionHandle {
        let id = self.subscribe_calls.fetch_add(1, Ordering::SeqCst) + 1;
        self.handlers.lock().unwrap().insert(id, handler);
        if let Some(hook) = self.on_subscribe.lock().unwrap().as_ref() {
            hook();
        }
        SubscriptionHandle(id)
    }

    fn unsubscribe(&self, handle: SubscriptionHandle) {
        self.unsubscribe_calls.fetch_add(1, Ordering::SeqCst);
        self.handlers.lock().unwrap().remove(&handle.0);
    }
}

/// Anchor source whose answer the test controls.
#[derive(Default)]
pub struct FixedAnchors(pub Mutex<Option<FakeScreen>>);

impl FixedAnchors {
    pub fn showing(screen: &'static str) -> Self {
        Self(Mutex::new(Some(FakeScreen(screen))))
    }

    pub fn none() -> Self {
        Self(Mutex::new(None))
    }
}

impl AnchorSource for FixedAnchors {
    type Anchor = FakeScreen;

    fn current_anchor(&self) -> Option<FakeScreen> {
        self.0.lock().unwrap().clone()
    }
}

/// Resolver that returns a 1x1 image, or fails for `bad://` URIs.
pub struct StubResolver;

impl ImageResolver for StubResolver {
    fn resolve(&self, reference: &ImageReference) -> Result<PlatformImage> {
        if reference.uri.starts_with("bad://") {
            return Err(CardlinkError::ImageResolution(format!(
                "cannot load {}",
                reference.uri
            )));
        }
        Ok(PlatformImage {
            width: 1,
            height: 1,
            scale: reference.scale.unwrap_or(1.0),
            rgba: vec![0, 0, 0, 255],
        })
    }
}

/// Event sink collecting `(event name, body, thread name)`.
#[derive(Default)]
pub struct CollectingSink {
    pub events: Mutex<Vec<(String, LinkResult, Option<String>)>>,
}

impl EventSink for CollectingSink {
    fn send_event(&self, name: &str, body: &LinkResult) {
        let thread = std::thread::current().name().map(str::to_string);
        self.events
            .lock()
            .unwrap()
            .push((name.to_string(), body.clone(), thread));
    }
}

pub fn result(tag: &str) -> LinkResult {
    LinkResult::new(serde_json::json!({ "tag": tag }))
}
