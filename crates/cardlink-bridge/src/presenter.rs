// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Flow presenter: put the SDK's linking UI on top of the host's screen.

use std::sync::Arc;

use tracing::{debug, info, instrument, warn};

use crate::traits::{AnchorSource, CardLinkingSdk};

/// Outcome of a presentation request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Presentation {
    /// The SDK was asked to present.
    Requested,
    /// No active screen; nothing happened.
    NoAnchor,
}

/// Asks the SDK to present on whatever screen is current.
pub struct FlowPresenter<S: CardLinkingSdk> {
    sdk: Arc<S>,
    anchors: Box<dyn AnchorSource<Anchor = S::Anchor>>,
    warn_on_missing_anchor: bool,
}

impl<S: CardLinkingSdk> FlowPresenter<S> {
    pub fn new(
        sdk: Arc<S>,
        anchors: Box<dyn AnchorSource<Anchor = S::Anchor>>,
        warn_on_missing_anchor: bool,
    ) -> Self {
        Self {
            sdk,
            anchors,
            warn_on_missing_anchor,
        }
    }

    /// Present the flow. The anchor is looked up fresh on every call because
    /// the host may have navigated since the last one.
    #[instrument(skip_all)]
    pub fn start(&self) -> Presentation {
        let Some(anchor) = self.anchors.current_anchor() else {
            if self.warn_on_missing_anchor {
                warn!("no active screen to present on; start ignored");
            } else {
                debug!("no active screen to present on; start ignored");
            }
            return Presentation::NoAnchor;
        };
        self.sdk.present(&anchor);
        info!("linking flow presentation requested");
        Presentation::Requested
    }
}
