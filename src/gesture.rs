// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Tap-versus-hold classification of press/release gestures.
//!
//! Transport buttons do two things: a short tap skips a track, holding the
//! button seeks. The [`GestureDiscriminator`] decides which one happened:
//!
//! ```text
//!            press                       release
//! Idle ──────────────▶ Pressed ─────────────────────────▶ Idle
//!                        │   elapsed < threshold: tap
//!                        │
//!                        └─ threshold reached: hold ──▶ Held ──release──▶ Idle
//!                                                          (optional settle)
//! ```
//!
//! Exactly one of the tap or hold commands is sent per press/release cycle.
//! The settle command (e.g. resume playback after seeking) is additional and
//! configured per device through [`GestureActions::settle`].

use std::sync::{Arc, Weak};
use std::time::Duration;

use parking_lot::Mutex;
use tokio::time::Instant;

use crate::binding::ChannelBinding;
use crate::config::DEFAULT_HOLD_THRESHOLD;
use crate::event::{ChannelEvent, EventBus};
use crate::sink::{self, CommandSink};
use crate::timer::{Timer, TimerId};
use crate::types::DomainValue;

/// Commands sent for each gesture outcome.
///
/// # Examples
///
/// ```
/// use chanctl::gesture::GestureActions;
/// use chanctl::types::DomainValue;
///
/// let next = GestureActions::new(DomainValue::text("NEXT"), DomainValue::text("FASTFORWARD"))
///     .with_settle(DomainValue::text("PLAY"));
/// assert!(next.settle.is_some());
/// ```
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct GestureActions {
    /// Sent when the button is released before the threshold.
    pub tap: DomainValue,
    /// Sent once the button has been held for the threshold.
    pub hold: DomainValue,
    /// Sent on release after a hold, if configured.
    #[serde(default)]
    pub settle: Option<DomainValue>,
}

impl GestureActions {
    /// Creates actions without a settle command.
    #[must_use]
    pub fn new(tap: DomainValue, hold: DomainValue) -> Self {
        Self {
            tap,
            hold,
            settle: None,
        }
    }

    /// Sets the command sent on release after a hold.
    #[must_use]
    pub fn with_settle(mut self, settle: DomainValue) -> Self {
        self.settle = Some(settle);
        self
    }

    /// Iterates over the tap, hold and (if set) settle commands.
    pub fn values(&self) -> impl Iterator<Item = &DomainValue> {
        [Some(&self.tap), Some(&self.hold), self.settle.as_ref()]
            .into_iter()
            .flatten()
    }
}

/// How a press/release cycle was classified.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum GestureOutcome {
    /// Released before the threshold.
    Tap,
    /// Held for at least the threshold.
    Hold,
    /// A release without a matching press.
    Ignored,
}

/// State of a control between press and release.
#[derive(Debug)]
struct GestureState {
    press_start: Instant,
    /// Armed until it fires or the press is released.
    hold_timer: Option<Timer>,
    hold_sent: bool,
}

struct Inner {
    binding: ChannelBinding,
    actions: GestureActions,
    threshold: Duration,
    sink: Arc<dyn CommandSink>,
    events: Option<EventBus>,
    state: Mutex<Option<GestureState>>,
}

impl Inner {
    fn emit(&self, value: &DomainValue) {
        sink::deliver(self.sink.as_ref(), self.events.as_ref(), &self.binding, value);
    }

    fn resolved(&self, outcome: GestureOutcome) {
        tracing::debug!(channel = %self.binding.id(), ?outcome, "Gesture resolved");
        if let Some(events) = &self.events {
            events.publish(ChannelEvent::GestureResolved {
                channel: self.binding.id().clone(),
                outcome,
            });
        }
    }

    /// Called by the hold timer.
    fn hold_reached(&self, timer_id: TimerId) {
        // Sending under the lock keeps the hold command ahead of a
        // concurrent release's settle command.
        let mut guard = self.state.lock();
        let Some(state) = guard.as_mut() else {
            return;
        };
        if state.hold_timer.as_ref().map(Timer::id) != Some(timer_id) {
            tracing::trace!(channel = %self.binding.id(), timer = %timer_id, "Ignoring stale hold timer");
            return;
        }
        state.hold_timer = None;
        state.hold_sent = true;
        self.emit(&self.actions.hold);
        self.resolved(GestureOutcome::Hold);
    }
}

/// Classifies press/release pairs on one control as tap or hold.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use std::time::Duration;
/// use chanctl::binding::ChannelBinding;
/// use chanctl::codec::ValueCodec;
/// use chanctl::descriptor::ValueDescriptor;
/// use chanctl::gesture::{GestureActions, GestureDiscriminator, GestureOutcome};
/// use chanctl::sink::ChannelSink;
/// use chanctl::types::DomainValue;
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let (sink, mut outbound) = ChannelSink::new();
/// let transport = ChannelBinding::new("tv:transport", ValueCodec::Text, ValueDescriptor::new());
/// let next = GestureDiscriminator::new(
///     transport,
///     GestureActions::new(DomainValue::text("NEXT"), DomainValue::text("FASTFORWARD")),
///     Arc::new(sink),
/// );
///
/// next.press();
/// assert_eq!(next.release(), GestureOutcome::Tap);
/// assert_eq!(outbound.recv().await.unwrap().payload, "NEXT");
/// # }
/// ```
pub struct GestureDiscriminator {
    inner: Arc<Inner>,
}

impl GestureDiscriminator {
    /// Creates a discriminator with the default 300 ms hold threshold.
    #[must_use]
    pub fn new(binding: ChannelBinding, actions: GestureActions, sink: Arc<dyn CommandSink>) -> Self {
        Self::with_options(binding, actions, sink, DEFAULT_HOLD_THRESHOLD, None)
    }

    /// Creates a discriminator with a custom threshold, optionally
    /// publishing events.
    #[must_use]
    pub fn with_options(
        binding: ChannelBinding,
        actions: GestureActions,
        sink: Arc<dyn CommandSink>,
        threshold: Duration,
        events: Option<EventBus>,
    ) -> Self {
        Self {
            inner: Arc::new(Inner {
                binding,
                actions,
                threshold,
                sink,
                events,
                state: Mutex::new(None),
            }),
        }
    }

    /// Returns the binding of the control.
    #[must_use]
    pub fn binding(&self) -> &ChannelBinding {
        &self.inner.binding
    }

    /// Returns the hold threshold.
    #[must_use]
    pub fn threshold(&self) -> Duration {
        self.inner.threshold
    }

    /// Returns true between press and release.
    #[must_use]
    pub fn is_pressed(&self) -> bool {
        self.inner.state.lock().is_some()
    }

    /// Starts a gesture and arms the hold timer.
    ///
    /// Returns false if the control is already pressed; the running gesture
    /// is left untouched.
    ///
    /// # Panics
    ///
    /// Panics if called outside of a Tokio runtime.
    pub fn press(&self) -> bool {
        let mut guard = self.inner.state.lock();
        if guard.is_some() {
            tracing::trace!(channel = %self.inner.binding.id(), "Ignoring repeated press");
            return false;
        }

        let weak: Weak<Inner> = Arc::downgrade(&self.inner);
        let timer = Timer::arm(self.inner.threshold, move |timer_id| {
            if let Some(inner) = weak.upgrade() {
                inner.hold_reached(timer_id);
            }
        });
        tracing::trace!(channel = %self.inner.binding.id(), timer = %timer.id(), "Press started");

        *guard = Some(GestureState {
            press_start: Instant::now(),
            hold_timer: Some(timer),
            hold_sent: false,
        });
        true
    }

    /// Ends a gesture.
    ///
    /// A release before the threshold cancels the hold timer and sends the
    /// tap command. A release after the hold command went out sends the
    /// settle command, if any. A release that reaches the threshold before
    /// the hold timer got to run sends the hold command itself.
    pub fn release(&self) -> GestureOutcome {
        let inner = &self.inner;
        let mut guard = inner.state.lock();
        let Some(mut state) = guard.take() else {
            tracing::trace!(channel = %inner.binding.id(), "Ignoring release without press");
            return GestureOutcome::Ignored;
        };

        if state.hold_sent {
            if let Some(settle) = &inner.actions.settle {
                inner.emit(settle);
            }
            return GestureOutcome::Hold;
        }

        if let Some(timer) = state.hold_timer.take() {
            timer.cancel();
        }

        let elapsed = state.press_start.elapsed();
        if elapsed < inner.threshold {
            inner.emit(&inner.actions.tap);
            inner.resolved(GestureOutcome::Tap);
            GestureOutcome::Tap
        } else {
            inner.emit(&inner.actions.hold);
            inner.resolved(GestureOutcome::Hold);
            if let Some(settle) = &inner.actions.settle {
                inner.emit(settle);
            }
            GestureOutcome::Hold
        }
    }

    /// Abandons a running gesture without sending anything.
    ///
    /// Returns true if a gesture was running.
    pub fn reset(&self) -> bool {
        let Some(state) = self.inner.state.lock().take() else {
            return false;
        };
        if let Some(timer) = state.hold_timer {
            timer.cancel();
        }
        true
    }
}

impl Drop for GestureDiscriminator {
    fn drop(&mut self) {
        self.reset();
    }
}

impl std::fmt::Debug for GestureDiscriminator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GestureDiscriminator")
            .field("channel", self.inner.binding.id())
            .field("threshold", &self.inner.threshold)
            .field("pressed", &self.is_pressed())
            .finish_non_exhaustive()
    }
}
