// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Cancellable one-shot timers.
//!
//! A [`Timer`] is a spawned task that sleeps and then runs a callback with
//! its [`TimerId`]. Owners store the timer next to the state it guards and
//! compare ids when the callback runs, so a timer that lost a race with a
//! cancel-and-rearm never acts on the newer state.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use tokio::task::AbortHandle;
use tokio::time::Instant;

static NEXT_TIMER_ID: AtomicU64 = AtomicU64::new(1);

/// Identity of an armed timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerId(u64);

impl TimerId {
    fn next() -> Self {
        Self(NEXT_TIMER_ID.fetch_add(1, Ordering::Relaxed))
    }

    /// Returns the raw id value.
    #[must_use]
    pub fn value(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for TimerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Timer({})", self.0)
    }
}

/// Handle to an armed timer.
#[derive(Debug)]
pub(crate) struct Timer {
    id: TimerId,
    handle: AbortHandle,
}

impl Timer {
    /// Spawns a task that calls `on_fire` once `delay` has passed from now.
    ///
    /// # Panics
    ///
    /// Panics if called outside of a Tokio runtime.
    pub(crate) fn arm<F>(delay: Duration, on_fire: F) -> Self
    where
        F: FnOnce(TimerId) + Send + 'static,
    {
        let id = TimerId::next();
        let deadline = Instant::now() + delay;
        let handle = tokio::spawn(async move {
            tokio::time::sleep_until(deadline).await;
            on_fire(id);
        })
        .abort_handle();
        Self { id, handle }
    }

    pub(crate) fn id(&self) -> TimerId {
        self.id
    }

    /// Cancels the timer. Consuming the handle makes a second cancel
    /// impossible.
    pub(crate) fn cancel(self) {
        self.handle.abort();
    }
}
