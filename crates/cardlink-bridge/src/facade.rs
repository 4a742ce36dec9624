// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Host-facing surface of the bridge.
//
// Mirrors the event-emitter module protocol host runtimes expect:
// `setup`, `start`, `add_listener`, `remove_listeners` and a constants table.
// Nothing here panics or propagates a fault across the host boundary; setup
// failures come back as `Err` for the host to surface however it likes.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, instrument};

use cardlink_core::config::BridgeConfig;
use cardlink_core::constants::ExportedConstants;
use cardlink_core::error::Result;
use cardlink_core::types::LinkResult;

use crate::delivery::DeliveryContext;
use crate::observer::{Listener, ObserverState, ResultObserver};
use crate::presenter::{FlowPresenter, Presentation};
use crate::setup::SetupAdapter;
use crate::traits::{AnchorSource, CardLinkingSdk, EventSink, ImageResolver};

/// Everything the bridge needs from its surroundings.
pub struct BridgeParts<S: CardLinkingSdk> {
    pub sdk: Arc<S>,
    pub anchors: Box<dyn AnchorSource<Anchor = S::Anchor>>,
    pub images: Arc<dyn ImageResolver>,
    pub events: Arc<dyn EventSink>,
    pub delivery: Arc<dyn DeliveryContext>,
}

/// The bridge module as seen by the host runtime.
pub struct CardlinkBridge<S: CardLinkingSdk> {
    config: BridgeConfig,
    setup: SetupAdapter<S>,
    presenter: FlowPresenter<S>,
    observer: ResultObserver<S>,
    events: Arc<dyn EventSink>,
    constants: ExportedConstants,
}

impl<S: CardLinkingSdk> CardlinkBridge<S> {
    pub fn new(config: BridgeConfig, parts: BridgeParts<S>) -> Self {
        let BridgeParts {
            sdk,
            anchors,
            images,
            events,
            delivery,
        } = parts;
        Self {
            setup: SetupAdapter::new(Arc::clone(&sdk), images),
            presenter: FlowPresenter::new(
                Arc::clone(&sdk),
                anchors,
                config.warn_on_missing_anchor,
            ),
            observer: ResultObserver::new(sdk, delivery),
            events,
            constants: ExportedConstants,
            config,
        }
    }

    /// Events this module can emit.
    pub fn supported_events(&self) -> [&str; 1] {
        [self.config.event_name.as_str()]
    }

    /// Apply a setup payload. On error the SDK keeps its previous state.
    pub fn setup(&self, payload: &Value) -> Result<()> {
        self.setup.configure(payload)
    }

    /// Whether `setup` has succeeded at least once.
    pub fn is_configured(&self) -> bool {
        self.setup.is_configured()
    }

    /// Present the linking flow. Returns immediately; the outcome arrives as
    /// a result event.
    pub fn start(&self) -> Presentation {
        if !self.setup.is_configured() {
            debug!("start called before a successful setup");
        }
        self.presenter.start()
    }

    /// Host began listening for `event_name`.
    #[instrument(skip(self))]
    pub fn add_listener(&self, event_name: &str) {
        if event_name != self.config.event_name {
            debug!("unsupported event; ignored");
            return;
        }
        let events = Arc::clone(&self.events);
        let name = self.config.event_name.clone();
        let listener: Listener = Arc::new(move |result: LinkResult| {
            events.send_event(&name, &result);
        });
        self.observer.start_observing(listener);
    }

    /// Host removed `count` listeners. Any removal tears down the single
    /// shared subscription; the count itself is not tracked.
    #[instrument(skip(self))]
    pub fn remove_listeners(&self, count: f64) {
        self.observer.stop_observing();
    }

    pub fn observer_state(&self) -> ObserverState {
        self.observer.state()
    }

    /// Startup constants; identical on every call.
    pub fn constants(&self) -> &'static BTreeMap<String, Value> {
        self.constants.constants()
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use serde_json::json;

    use super::*;
    use crate::delivery::{Immediate, SerialQueue};
    use crate::test_support::{
        CollectingSink, FakeScreen, FixedAnchors, RecordingSdk, StubResolver, result,
    };

    struct Harness {
        sdk: Arc<RecordingSdk>,
        sink: Arc<CollectingSink>,
        bridge: CardlinkBridge<RecordingSdk>,
    }

    fn harness(anchors: FixedAnchors, delivery: Arc<dyn DeliveryContext>) -> Harness {
        let sdk = RecordingSdk::new();
        let sink = Arc::new(CollectingSink::default());
        let bridge = CardlinkBridge::new(
            BridgeConfig::default(),
            BridgeParts {
                sdk: Arc::clone(&sdk),
                anchors: Box::new(anchors),
                images: Arc::new(StubResolver),
                events: sink.clone(),
                delivery,
            },
        );
        Harness { sdk, sink, bridge }
    }

    #[test]
    fn setup_forwards_to_sdk() {
        let h = harness(FixedAnchors::none(), Arc::new(Immediate));
        h.bridge
            .setup(&json!({ "apiIdentifier": "pk", "apiSecret": "sk" }))
            .expect("setup");
        assert_eq!(h.sdk.configured.lock().unwrap().len(), 1);
        assert!(h.bridge.is_configured());
    }

    #[test]
    fn invalid_setup_is_reported_not_applied() {
        let h = harness(FixedAnchors::none(), Arc::new(Immediate));
        let err = h.bridge.setup(&json!({ "apiIdentifier": "pk" })).unwrap_err();
        assert!(err.is_configuration());
        assert!(h.sdk.configured.lock().unwrap().is_empty());
    }

    #[test]
    fn start_without_screen_returns_normally() {
        let h = harness(FixedAnchors::none(), Arc::new(Immediate));
        assert_eq!(h.bridge.start(), Presentation::NoAnchor);
        assert!(h.sdk.presented.lock().unwrap().is_empty());
    }

    #[test]
    fn start_presents_on_active_screen() {
        let h = harness(FixedAnchors::showing("checkout"), Arc::new(Immediate));
        assert_eq!(h.bridge.start(), Presentation::Requested);
        assert_eq!(*h.sdk.presented.lock().unwrap(), vec![FakeScreen("checkout")]);
    }

    #[test]
    fn result_event_reaches_host_on_delivery_queue() {
        let queue = Arc::new(SerialQueue::spawn("js-module").expect("spawn"));
        let h = harness(FixedAnchors::none(), queue.clone());

        h.bridge.add_listener("ResultAvailable");
        let sdk = Arc::clone(&h.sdk);
        std::thread::spawn(move || sdk.notify(result("linked")))
            .join()
            .unwrap();
        queue.flush();

        let events = h.sink.events.lock().unwrap();
        assert_eq!(events.len(), 1);
        let (name, body, thread) = &events[0];
        assert_eq!(name, "ResultAvailable");
        assert_eq!(body, &result("linked"));
        assert_eq!(thread.as_deref(), Some("js-module"));
        drop(events);
        // Give a misbehaving implementation a chance to double-deliver.
        std::thread::sleep(Duration::from_millis(20));
        queue.flush();
        assert_eq!(h.sink.events.lock().unwrap().len(), 1);
    }

    #[test]
    fn unknown_event_name_is_ignored() {
        let h = harness(FixedAnchors::none(), Arc::new(Immediate));
        h.bridge.add_listener("SomethingElse");
        assert_eq!(h.bridge.observer_state(), ObserverState::Idle);
        assert_eq!(h.sdk.subscribe_calls(), 0);
    }

    #[test]
    fn repeated_add_listener_keeps_one_subscription() {
        let h = harness(FixedAnchors::none(), Arc::new(Immediate));
        h.bridge.add_listener("ResultAvailable");
        h.bridge.add_listener("ResultAvailable");
        h.sdk.notify(result("r"));

        assert_eq!(h.sdk.subscribe_calls(), 1);
        assert_eq!(h.sink.events.lock().unwrap().len(), 1);
    }

    #[test]
    fn remove_listeners_tears_down_regardless_of_count() {
        let h = harness(FixedAnchors::none(), Arc::new(Immediate));
        h.bridge.add_listener("ResultAvailable");
        h.bridge.remove_listeners(5.0);
        h.bridge.remove_listeners(1.0);
        h.sdk.notify(result("ignored"));

        assert_eq!(h.bridge.observer_state(), ObserverState::Idle);
        assert_eq!(h.sdk.unsubscribe_calls(), 1);
        assert!(h.sink.events.lock().unwrap().is_empty());
    }

    #[test]
    fn dropping_bridge_releases_subscription() {
        let h = harness(FixedAnchors::none(), Arc::new(Immediate));
        h.bridge.add_listener("ResultAvailable");
        let sdk = Arc::clone(&h.sdk);
        drop(h);
        assert_eq!(sdk.live_subscriptions(), 0);
    }

    #[test]
    fn constants_are_stable() {
        let h = harness(FixedAnchors::none(), Arc::new(Immediate));
        let first = h.bridge.constants().clone();
        assert_eq!(&first, h.bridge.constants());
        assert!(first.contains_key("bridgeVersion"));
        assert_eq!(h.bridge.supported_events(), ["ResultAvailable"]);
    }
}
