// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Cardlink host harness.
//
// Plays the part of the host runtime: loads a setup payload, registers for
// `ResultAvailable`, shows a screen, starts the flow against the simulated
// SDK and prints every event it receives as one JSON line.
//
// Usage: cardlink-host <setup.json> [bridge-config.json]

mod sim;

use std::process::ExitCode;
use std::sync::mpsc;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use serde_json::json;

use cardlink_bridge::facade::BridgeParts;
use cardlink_bridge::presenter::Presentation;
use cardlink_bridge::stub::ScreenAnchorSource;
use cardlink_bridge::{CardlinkBridge, EventSink, FileImageResolver, platform_delivery_context};
use cardlink_core::BridgeConfig;
use cardlink_core::error::{CardlinkError, Result};
use cardlink_core::types::LinkResult;

use sim::SimulatedSdk;

/// How long to wait for the simulated flow to report back.
const RESULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Prints events to stdout and wakes the main thread.
struct StdoutSink {
    notify: Mutex<mpsc::Sender<()>>,
}

impl EventSink for StdoutSink {
    fn send_event(&self, name: &str, body: &LinkResult) {
        println!("{}", json!({ "event": name, "body": body }));
        let _ = self
            .notify
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .send(());
    }
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "cardlink host failed");
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<()> {
    let mut args = std::env::args().skip(1);
    let setup_path = args.next().ok_or_else(|| {
        CardlinkError::Bridge("usage: cardlink-host <setup.json> [bridge-config.json]".into())
    })?;
    let config = match args.next() {
        Some(path) => BridgeConfig::from_json_file(path)?,
        None => BridgeConfig::default(),
    };

    let payload: serde_json::Value = serde_json::from_str(&std::fs::read_to_string(&setup_path)?)?;
    let asset_root = std::path::Path::new(&setup_path)
        .parent()
        .map(|p| p.to_path_buf())
        .unwrap_or_default();

    let (notify, received) = mpsc::channel();
    let screens = Arc::new(ScreenAnchorSource::new());
    let delivery = platform_delivery_context(&config)?;
    let event_name = config.event_name.clone();

    let bridge = CardlinkBridge::new(
        config,
        BridgeParts {
            sdk: Arc::new(SimulatedSdk::new(Duration::from_millis(250))),
            anchors: Box::new(Arc::clone(&screens)),
            images: Arc::new(FileImageResolver::with_asset_root(asset_root)),
            events: Arc::new(StdoutSink {
                notify: Mutex::new(notify),
            }),
            delivery,
        },
    );

    tracing::info!(constants = %json!(bridge.constants()), "bridge constants");

    bridge.setup(&payload)?;
    bridge.add_listener(&event_name);
    screens.set_active_screen("main");

    if bridge.start() == Presentation::NoAnchor {
        return Err(CardlinkError::PresentationUnavailable);
    }

    let outcome = received.recv_timeout(RESULT_TIMEOUT);
    bridge.remove_listeners(1.0);
    outcome.map_err(|_| CardlinkError::Bridge("no result from the linking flow".into()))
}
