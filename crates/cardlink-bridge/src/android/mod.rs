// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Android glue via JNI.
//
// The presentation anchor is the Activity hosting the native code, taken
// from `ndk_context`. Results are delivered on a serial queue standing in for
// the host module thread; the Java side posts onward to the UI thread.

#![cfg(target_os = "android")]

use jni::JavaVM;
use jni::objects::{GlobalRef, JObject};
use tracing::{debug, warn};

use crate::traits::AnchorSource;

/// Global reference to the current `Activity`.
pub struct ActivityAnchor {
    pub activity: GlobalRef,
}

/// Looks up the hosting Activity on every call.
#[derive(Debug, Default, Clone, Copy)]
pub struct CurrentActivityAnchorSource;

impl AnchorSource for CurrentActivityAnchorSource {
    type Anchor = ActivityAnchor;

    fn current_anchor(&self) -> Option<ActivityAnchor> {
        let ctx = ndk_context::android_context();
        if ctx.context().is_null() {
            debug!("Android context is null; native activity not initialised");
            return None;
        }

        // SAFETY: `ctx.vm()` returns the `JavaVM*` set by the NDK glue code
        // and stays valid for the lifetime of the process.
        let vm = match unsafe { JavaVM::from_raw(ctx.vm().cast()) } {
            Ok(vm) => vm,
            Err(e) => {
                warn!(error = %e, "failed to obtain JavaVM");
                return None;
            }
        };
        let mut env = match vm.attach_current_thread() {
            Ok(env) => env,
            Err(e) => {
                warn!(error = %e, "failed to attach JNI thread");
                return None;
            }
        };

        // SAFETY: the NDK guarantees this pointer is a valid global jobject
        // for the hosting Activity.
        let activity = unsafe { JObject::from_raw(ctx.context().cast()) };
        let finishing = env
            .call_method(&activity, "isFinishing", "()Z", &[])
            .and_then(|v| v.z())
            .unwrap_or(true);
        if finishing {
            debug!("hosting activity is finishing; no anchor");
            return None;
        }

        match env.new_global_ref(&activity) {
            Ok(activity) => Some(ActivityAnchor { activity }),
            Err(e) => {
                warn!(error = %e, "failed to pin activity reference");
                None
            }
        }
    }
}
