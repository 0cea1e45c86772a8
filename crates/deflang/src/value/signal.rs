// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Change notification.
//!
//! Every value owns a [`Signal`]. Composite values link the signals of their
//! children to their own, so a change can be reported to the changed value and
//! then to each of its ancestors.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};

use parking_lot::Mutex;

static NEXT_OBSERVER_ID: AtomicU64 = AtomicU64::new(1);

/// Handle returned by [`Value::subscribe`](crate::Value::subscribe).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObserverId(u64);

impl ObserverId {
    fn next() -> Self {
        Self(NEXT_OBSERVER_ID.fetch_add(1, Ordering::Relaxed))
    }
}

type Callback = Box<dyn FnMut() + Send>;

#[derive(Default)]
pub(crate) struct Signal {
    observers: Mutex<Vec<(ObserverId, Callback)>>,
    parent: Mutex<Weak<Signal>>,
}

impl Signal {
    pub(crate) fn subscribe(&self, callback: Callback) -> ObserverId {
        let id = ObserverId::next();
        self.observers.lock().push((id, callback));
        id
    }

    pub(crate) fn unsubscribe(&self, id: ObserverId) -> bool {
        let mut observers = self.observers.lock();
        let before = observers.len();
        observers.retain(|(oid, _)| *oid != id);
        observers.len() != before
    }

    pub(crate) fn observer_count(&self) -> usize {
        self.observers.lock().len()
    }

    pub(crate) fn set_parent(&self, parent: &Arc<Signal>) {
        *self.parent.lock() = Arc::downgrade(parent);
    }

    /// Notify this signal's observers only.
    pub(crate) fn emit_local(&self) {
        for (_, callback) in self.observers.lock().iter_mut() {
            callback();
        }
    }

    /// Notify this signal's observers, then every ancestor's.
    pub(crate) fn emit(&self) {
        self.emit_local();
        let mut next = self.parent.lock().upgrade();
        while let Some(signal) = next {
            signal.emit_local();
            next = signal.parent.lock().upgrade();
        }
    }
}

impl fmt::Debug for Signal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Signal")
            .field("observers", &self.observer_count())
            .finish()
    }
}
