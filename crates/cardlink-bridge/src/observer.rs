// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Result observer — the listener lifecycle between SDK and host.
//
// States:
//
//   Idle ──start_observing──▶ Observing ──stop_observing──▶ Idle
//                              │    ▲
//                              └────┘ start_observing (listener replaced,
//                                     no new subscription)
//
// The listener slot is the only mutable state shared between host calls and
// SDK notification threads. It sits behind a `Mutex` and is replaced
// wholesale. SDK methods are never called while the lock is held, so an SDK
// that notifies (or blocks) inside `subscribe`/`unsubscribe` cannot deadlock
// the bridge.
//
// Each subscription gets a generation number. A notification is marshaled
// onto the delivery context and only reaches the listener if, at delivery
// time, the slot still belongs to the generation that produced it. Results
// arriving with no listener are dropped, never queued.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

use tracing::{debug, info, instrument};

use cardlink_core::types::LinkResult;

use crate::delivery::DeliveryContext;
use crate::traits::{CardLinkingSdk, ResultHandler, SubscriptionHandle};

/// Host-side delivery target for results.
pub type Listener = Arc<dyn Fn(LinkResult) + Send + Sync>;

/// Externally visible lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObserverState {
    /// No listener, no SDK subscription.
    Idle,
    /// Listener registered and subscribed to the SDK.
    Observing,
}

struct Registration {
    generation: u64,
    listener: Listener,
    /// `None` only in the window between claiming the slot and the SDK
    /// handing back a handle.
    subscription: Option<SubscriptionHandle>,
}

type Slot = Mutex<Option<Registration>>;

/// Forwards SDK results to at most one registered listener.
pub struct ResultObserver<S: CardLinkingSdk> {
    sdk: Arc<S>,
    delivery: Arc<dyn DeliveryContext>,
    slot: Arc<Slot>,
    next_generation: AtomicU64,
}

impl<S: CardLinkingSdk> ResultObserver<S> {
    pub fn new(sdk: Arc<S>, delivery: Arc<dyn DeliveryContext>) -> Self {
        Self {
            sdk,
            delivery,
            slot: Arc::new(Mutex::new(None)),
            next_generation: AtomicU64::new(0),
        }
    }

    pub fn state(&self) -> ObserverState {
        match *lock(&self.slot) {
            Some(_) => ObserverState::Observing,
            None => ObserverState::Idle,
        }
    }

    pub fn is_observing(&self) -> bool {
        self.state() == ObserverState::Observing
    }

    /// Register `listener`, subscribing to the SDK if not already subscribed.
    ///
    /// Calling this while already observing swaps the listener in place.
    #[instrument(skip_all, fields(context = %self.delivery.label()))]
    pub fn start_observing(&self, listener: Listener) {
        let generation = {
            let mut slot = lock(&self.slot);
            if let Some(registration) = slot.as_mut() {
                registration.listener = listener;
                debug!(generation = registration.generation, "listener replaced");
                return;
            }
            let generation = self.next_generation.fetch_add(1, Ordering::Relaxed) + 1;
            *slot = Some(Registration {
                generation,
                listener,
                subscription: None,
            });
            generation
        };

        let handle = self.sdk.subscribe(self.handler_for(generation));

        let claimed = {
            let mut slot = lock(&self.slot);
            match slot.as_mut() {
                Some(registration) if registration.generation == generation => {
                    registration.subscription = Some(handle);
                    true
                }
                _ => false,
            }
        };
        if claimed {
            info!(generation, "observing SDK results");
        } else {
            // stop_observing ran while we were subscribing.
            debug!(generation, "observer stopped during subscribe; releasing");
            self.sdk.unsubscribe(handle);
        }
    }

    /// Drop the listener and the SDK subscription. No-op when idle.
    #[instrument(skip_all)]
    pub fn stop_observing(&self) {
        let taken = lock(&self.slot).take();
        match taken {
            Some(Registration {
                generation,
                subscription,
                ..
            }) => {
                if let Some(handle) = subscription {
                    self.sdk.unsubscribe(handle);
                }
                info!(generation, "stopped observing SDK results");
            }
            None => debug!("stop_observing while idle; ignored"),
        }
    }

    /// Handler given to the SDK. It never touches the slot itself; the
    /// listener lookup happens on the delivery context.
    fn handler_for(&self, generation: u64) -> ResultHandler {
        let slot = Arc::downgrade(&self.slot);
        let delivery = Arc::clone(&self.delivery);
        Arc::new(move |result: LinkResult| {
            let slot = slot.clone();
            delivery.dispatch(Box::new(move || deliver(&slot, generation, result)));
        })
    }
}

impl<S: CardLinkingSdk> Drop for ResultObserver<S> {
    fn drop(&mut self) {
        self.stop_observing();
    }
}

fn deliver(slot: &Weak<Slot>, generation: u64, result: LinkResult) {
    let Some(slot) = slot.upgrade() else {
        debug!(generation, "observer gone; result dropped");
        return;
    };
    let listener = match lock(&slot).as_ref() {
        Some(registration) if registration.generation == generation => {
            Arc::clone(&registration.listener)
        }
        _ => {
            debug!(generation, "no listener for result; dropped");
            return;
        }
    };
    listener(result);
}

fn lock(slot: &Slot) -> MutexGuard<'_, Option<Registration>> {
    slot.lock().unwrap_or_else(PoisonError::into_inner)
}
