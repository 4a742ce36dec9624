// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Desktop/CI anchor source where no native window system is bridged.
//
// The embedding host tells the bridge which screen is active; until it does,
// `start` finds no anchor and is a no-op.

use std::sync::{Mutex, PoisonError};

use tracing::debug;

use crate::traits::AnchorSource;

/// Identifies a host screen by name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScreenAnchor {
    pub name: String,
}

/// Anchor source driven by the host's own navigation events.
#[derive(Debug, Default)]
pub struct ScreenAnchorSource {
    active: Mutex<Option<ScreenAnchor>>,
}

impl ScreenAnchorSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the screen now in front.
    pub fn set_active_screen(&self, name: impl Into<String>) {
        let name = name.into();
        debug!(screen = %name, "active screen changed");
        *self.active.lock().unwrap_or_else(PoisonError::into_inner) = Some(ScreenAnchor { name });
    }

    /// The host has no screen (backgrounded or torn down).
    pub fn clear_active_screen(&self) {
        debug!("active screen cleared");
        *self.active.lock().unwrap_or_else(PoisonError::into_inner) = None;
    }
}

impl AnchorSource for ScreenAnchorSource {
    type Anchor = ScreenAnchor;

    fn current_anchor(&self) -> Option<ScreenAnchor> {
        self.active
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn follows_host_navigation() {
        let source = ScreenAnchorSource::new();
        assert_eq!(source.current_anchor(), None);

        source.set_active_screen("wallet");
        assert_eq!(source.current_anchor().map(|a| a.name), Some("wallet".to_string()));

        source.clear_active_screen();
        assert_eq!(source.current_anchor(), None);
    }

    #[test]
    fn platform_source_starts_without_screen() {
        assert!(crate::platform_anchor_source().current_anchor().is_none());
    }
}
