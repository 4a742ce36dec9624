// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// iOS glue via objc2 and libdispatch.
//
// Requires compilation with the iOS SDK (Xcode). UIKit may only be touched
// on the main thread, so the anchor source answers `None` anywhere else and
// results are delivered through the main dispatch queue.

#![cfg(target_os = "ios")]

use std::ffi::c_void;

use objc2::rc::Retained;
use objc2::runtime::AnyObject;
use objc2::{MainThreadMarker, msg_send};
use objc2_ui_kit::{UIApplication, UIViewController};
use tracing::debug;

use crate::delivery::{DeliveryContext, Task, run_guarded};
use crate::traits::AnchorSource;

// ---------------------------------------------------------------------------
// libdispatch FFI
// ---------------------------------------------------------------------------
// `dispatch_get_main_queue()` is a header macro over the `_dispatch_main_q`
// symbol, so the symbol is linked directly.

#[repr(C)]
struct DispatchQueue {
    _private: [u8; 0],
}

unsafe extern "C" {
    static _dispatch_main_q: DispatchQueue;

    fn dispatch_async_f(
        queue: *const DispatchQueue,
        context: *mut c_void,
        work: extern "C" fn(*mut c_void),
    );
}

/// Delivers tasks on the main dispatch queue (the UI thread).
#[derive(Debug, Default, Clone, Copy)]
pub struct MainQueue;

impl DeliveryContext for MainQueue {
    fn dispatch(&self, task: Task) {
        // `Task` is a fat pointer; box it again to pass a thin one through C.
        let context = Box::into_raw(Box::new(task)).cast::<c_void>();
        // SAFETY: `_dispatch_main_q` is the process-wide main queue and lives
        // forever. Ownership of `context` passes to `run_main_task`, which
        // reclaims it exactly once.
        unsafe { dispatch_async_f(&raw const _dispatch_main_q, context, run_main_task) };
    }

    fn label(&self) -> &str {
        "main-queue"
    }
}

extern "C" fn run_main_task(context: *mut c_void) {
    // SAFETY: `context` was produced by `Box::into_raw` in `MainQueue::dispatch`
    // and libdispatch calls this function once per submission.
    let task = unsafe { Box::from_raw(context.cast::<Task>()) };
    run_guarded(*task, "main-queue");
}

// ---------------------------------------------------------------------------
// Presentation anchor
// ---------------------------------------------------------------------------

/// Top-most view controller of the key window.
///
/// Walks `presentedViewController` from the root so the SDK lands on top of
/// any modal the host already shows.
#[derive(Debug, Default, Clone, Copy)]
pub struct KeyWindowAnchorSource;

impl AnchorSource for KeyWindowAnchorSource {
    type Anchor = Retained<UIViewController>;

    fn current_anchor(&self) -> Option<Retained<UIViewController>> {
        let Some(mtm) = MainThreadMarker::new() else {
            debug!("anchor requested off the main thread");
            return None;
        };
        let app = UIApplication::sharedApplication(mtm);

        // SAFETY: msg_send! to well-known UIKit selectors (keyWindow,
        // rootViewController, presentedViewController) on the main thread,
        // guaranteed by `mtm` above.
        unsafe {
            let window: Option<Retained<AnyObject>> = msg_send![&app, keyWindow];
            let mut top: Retained<UIViewController> =
                window.and_then(|w| msg_send![&w, rootViewController])?;
            loop {
                let presented: Option<Retained<UIViewController>> =
                    msg_send![&top, presentedViewController];
                match presented {
                    Some(next) => top = next,
                    None => break,
                }
            }
            Some(top)
        }
    }
}
