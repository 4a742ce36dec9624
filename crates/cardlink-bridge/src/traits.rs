// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Collaborator traits at the seams of the bridge.
//
// The SDK, the host runtime and the platform image loader are all external.
// The bridge only talks to them through these traits so every platform (and
// every test) can plug in its own implementation.

use std::sync::Arc;

use cardlink_core::error::Result;
use cardlink_core::types::{ImageReference, LinkResult, PlatformImage, SdkConfiguration};

/// Callback the SDK invokes for each result notification, from any thread.
pub type ResultHandler = Arc<dyn Fn(LinkResult) + Send + Sync>;

/// Opaque token returned by [`CardLinkingSdk::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionHandle(pub u64);

/// The third-party card-linking SDK.
pub trait CardLinkingSdk: Send + Sync {
    /// Screen the SDK presents its flow on top of.
    type Anchor: 'static;

    /// Replace the SDK's configuration.
    fn configure(&self, config: SdkConfiguration);

    /// Present the linking flow. Returns once presentation is requested; the
    /// outcome arrives later through the notification channel.
    fn present(&self, anchor: &Self::Anchor);

    /// Register a handler for result notifications.
    fn subscribe(&self, handler: ResultHandler) -> SubscriptionHandle;

    /// Remove a handler registered with [`CardLinkingSdk::subscribe`].
    fn unsubscribe(&self, handle: SubscriptionHandle);
}

/// Supplies the host's current top-level screen.
pub trait AnchorSource: Send + Sync {
    type Anchor;

    /// The screen to present on right now, or `None` when the host has no
    /// active screen (cold start, backgrounded, wrong thread).
    fn current_anchor(&self) -> Option<Self::Anchor>;
}

impl<T: AnchorSource + ?Sized> AnchorSource for Box<T> {
    type Anchor = T::Anchor;

    fn current_anchor(&self) -> Option<Self::Anchor> {
        (**self).current_anchor()
    }
}

impl<T: AnchorSource + ?Sized> AnchorSource for Arc<T> {
    type Anchor = T::Anchor;

    fn current_anchor(&self) -> Option<Self::Anchor> {
        (**self).current_anchor()
    }
}

/// Turns a host image reference into the SDK's image type.
pub trait ImageResolver: Send + Sync {
    fn resolve(&self, reference: &ImageReference) -> Result<PlatformImage>;
}

/// The host runtime's event-emission primitive.
pub trait EventSink: Send + Sync {
    fn send_event(&self, name: &str, body: &LinkResult);
}
