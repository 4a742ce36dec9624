// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>

//! Cardlink — native bridge between a host runtime and the card-linking SDK.
//!
//! The host drives four operations (`setup`, `start`, `add_listener`,
//! `remove_listeners`) and reads `constants`. The SDK reports results
//! asynchronously from arbitrary threads; [`observer::ResultObserver`]
//! marshals them onto the host's [`delivery::DeliveryContext`].

pub mod delivery;
pub mod facade;
pub mod observer;
pub mod presenter;
pub mod resolver;
pub mod setup;
pub mod traits;

#[cfg(test)]
mod test_support;

#[cfg(target_os = "ios")]
pub mod ios;

#[cfg(target_os = "android")]
pub mod android;

#[cfg(not(any(target_os = "ios", target_os = "android")))]
pub mod stub;

pub use delivery::{DeliveryContext, Immediate, SerialQueue};
pub use facade::{BridgeParts, CardlinkBridge};
pub use observer::{Listener, ObserverState, ResultObserver};
pub use resolver::FileImageResolver;
pub use traits::*;

use std::sync::Arc;

use cardlink_core::BridgeConfig;

/// Anchor type produced by [`platform_anchor_source`] on this target.
#[cfg(target_os = "ios")]
pub type PlatformAnchor = objc2::rc::Retained<objc2_ui_kit::UIViewController>;
#[cfg(target_os = "android")]
pub type PlatformAnchor = android::ActivityAnchor;
#[cfg(not(any(target_os = "ios", target_os = "android")))]
pub type PlatformAnchor = stub::ScreenAnchor;

/// Anchor source for the target operating system.
pub fn platform_anchor_source() -> Box<dyn AnchorSource<Anchor = PlatformAnchor>> {
    #[cfg(target_os = "ios")]
    {
        // iOS: root view controller of the key window.
        Box::new(ios::KeyWindowAnchorSource)
    }
    #[cfg(target_os = "android")]
    {
        // Android: the Activity hosting the native code.
        Box::new(android::CurrentActivityAnchorSource)
    }
    #[cfg(not(any(target_os = "ios", target_os = "android")))]
    {
        // DESKTOP/CI: the host sets the active screen explicitly.
        Box::new(stub::ScreenAnchorSource::new())
    }
}

/// Delivery context results are marshaled onto by default on this target.
pub fn platform_delivery_context(
    config: &BridgeConfig,
) -> cardlink_core::error::Result<Arc<dyn DeliveryContext>> {
    #[cfg(target_os = "ios")]
    {
        let _ = config;
        Ok(Arc::new(ios::MainQueue))
    }
    #[cfg(not(target_os = "ios"))]
    {
        Ok(Arc::new(SerialQueue::spawn(config.delivery_thread_name.clone())?))
    }
}
