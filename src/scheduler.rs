// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Debounced, coalescing command dispatch.
//!
//! Dragging a slider produces dozens of values per second; devices want a
//! few commands at most. The [`CommandScheduler`] keeps one pending command
//! per channel and sends it when the debounce window closes:
//!
//! ```text
//! submit(5)  ──┐ arms timer
//! submit(12) ──┤ overwrites latest value
//! submit(9)  ──┤ overwrites latest value
//!              └─ window closes → encode(9) → CommandSink::send
//! ```
//!
//! Intermediate values are dropped, never queued. At most one timer exists
//! per channel, so at most one command per channel leaves per window, and it
//! always carries the most recent value submitted before the window closed.
//!
//! # Examples
//!
//! ```
//! use std::sync::Arc;
//! use chanctl::binding::ChannelBinding;
//! use chanctl::codec::ValueCodec;
//! use chanctl::descriptor::ValueDescriptor;
//! use chanctl::scheduler::CommandScheduler;
//! use chanctl::sink::ChannelSink;
//! use chanctl::types::DomainValue;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let (sink, mut outbound) = ChannelSink::new();
//! let scheduler = CommandScheduler::new(Arc::new(sink));
//! let dimmer = ChannelBinding::new("lamp:dimmer", ValueCodec::Number, ValueDescriptor::new());
//!
//! for level in [5.0, 12.0, 9.0] {
//!     scheduler.submit(&dimmer, DomainValue::numeric(level));
//! }
//!
//! let command = outbound.recv().await.unwrap();
//! assert_eq!(command.payload, "9");
//! # }
//! ```

use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::sync::{Arc, Weak};
use std::time::Duration;

use parking_lot::Mutex;

use crate::binding::ChannelBinding;
use crate::config::DEFAULT_DEBOUNCE_WINDOW;
use crate::event::EventBus;
use crate::sink::{self, CommandSink};
use crate::timer::{Timer, TimerId};
use crate::types::{ChannelId, DomainValue};

/// The coalescing buffer of one channel.
///
/// An entry exists only while its debounce timer is armed.
#[derive(Debug)]
struct PendingCommand {
    binding: ChannelBinding,
    latest_value: DomainValue,
    timer: Timer,
}

struct Inner {
    window: Duration,
    sink: Arc<dyn CommandSink>,
    events: Option<EventBus>,
    pending: Mutex<HashMap<ChannelId, PendingCommand>>,
}

impl Inner {
    /// Called by the debounce timer of `channel`.
    fn fire(&self, channel: &ChannelId, timer_id: TimerId) {
        let command = {
            let mut pending = self.pending.lock();
            match pending.get(channel) {
                Some(command) if command.timer.id() == timer_id => pending.remove(channel),
                _ => None,
            }
        };

        let Some(command) = command else {
            tracing::trace!(channel = %channel, timer = %timer_id, "Ignoring stale debounce timer");
            return;
        };
        // The timer has run; dropping its handle is all that is left to do.
        sink::deliver(
            self.sink.as_ref(),
            self.events.as_ref(),
            &command.binding,
            &command.latest_value,
        );
    }
}

/// Coalesces rapid submissions into one deferred command per channel.
///
/// All operations return immediately; results are observed through the
/// [`CommandSink`]. Dropping the scheduler cancels every pending command.
pub struct CommandScheduler {
    inner: Arc<Inner>,
}

impl CommandScheduler {
    /// Creates a scheduler with the default 300 ms debounce window.
    #[must_use]
    pub fn new(sink: Arc<dyn CommandSink>) -> Self {
        Self::builder(sink).build()
    }

    /// Creates a builder for a scheduler sending to `sink`.
    #[must_use]
    pub fn builder(sink: Arc<dyn CommandSink>) -> CommandSchedulerBuilder {
        CommandSchedulerBuilder {
            sink,
            window: DEFAULT_DEBOUNCE_WINDOW,
            events: None,
        }
    }

    /// Returns the debounce window.
    #[must_use]
    pub fn window(&self) -> Duration {
        self.inner.window
    }

    /// Submits a value for a channel.
    ///
    /// The value replaces whatever is pending for the channel. If no
    /// debounce timer is armed for the channel, one is armed now; otherwise
    /// the armed timer will pick this value up when it fires.
    ///
    /// # Panics
    ///
    /// Panics if called outside of a Tokio runtime.
    pub fn submit(&self, binding: &ChannelBinding, value: DomainValue) {
        let mut pending = self.inner.pending.lock();
        match pending.entry(binding.id().clone()) {
            Entry::Occupied(mut entry) => {
                tracing::trace!(channel = %binding.id(), "Coalescing submission");
                entry.get_mut().latest_value = value;
            }
            Entry::Vacant(entry) => {
                let timer = self.arm(binding.id().clone());
                tracing::debug!(
                    channel = %binding.id(),
                    timer = %timer.id(),
                    window_ms = self.inner.window.as_millis(),
                    "Armed debounce timer"
                );
                entry.insert(PendingCommand {
                    binding: binding.clone(),
                    latest_value: value,
                    timer,
                });
            }
        }
    }

    fn arm(&self, channel: ChannelId) -> Timer {
        let inner: Weak<Inner> = Arc::downgrade(&self.inner);
        Timer::arm(self.inner.window, move |timer_id| {
            if let Some(inner) = inner.upgrade() {
                inner.fire(&channel, timer_id);
            }
        })
    }

    /// Sends the pending value of a channel now instead of at the end of
    /// the window.
    ///
    /// Returns true if a value was pending.
    pub fn flush(&self, channel: &ChannelId) -> bool {
        let Some(command) = self.inner.pending.lock().remove(channel) else {
            return false;
        };
        tracing::debug!(channel = %channel, "Flushing pending command");
        let PendingCommand {
            binding,
            latest_value,
            timer,
        } = command;
        timer.cancel();
        sink::deliver(
            self.inner.sink.as_ref(),
            self.inner.events.as_ref(),
            &binding,
            &latest_value,
        );
        true
    }

    /// Drops the pending value of a channel without sending it.
    ///
    /// Returns true if a value was pending.
    pub fn cancel(&self, channel: &ChannelId) -> bool {
        let Some(command) = self.inner.pending.lock().remove(channel) else {
            return false;
        };
        tracing::debug!(channel = %channel, "Cancelled pending command");
        command.timer.cancel();
        true
    }

    /// Returns true if a command is pending for the channel.
    #[must_use]
    pub fn is_pending(&self, channel: &ChannelId) -> bool {
        self.inner.pending.lock().contains_key(channel)
    }

    /// Returns the value that would be sent for the channel, if any.
    #[must_use]
    pub fn pending_value(&self, channel: &ChannelId) -> Option<DomainValue> {
        self.inner
            .pending
            .lock()
            .get(channel)
            .map(|command| command.latest_value.clone())
    }

    /// Returns the number of channels with a pending command.
    #[must_use]
    pub fn pending_count(&self) -> usize {
        self.inner.pending.lock().len()
    }

    /// Cancels every pending command.
    pub fn shutdown(&self) {
        let drained: Vec<PendingCommand> = self.inner.pending.lock().drain().map(|(_, c)| c).collect();
        if !drained.is_empty() {
            tracing::debug!(count = drained.len(), "Dropping pending commands");
        }
        for command in drained {
            command.timer.cancel();
        }
    }
}

/// Builder for [`CommandScheduler`].
pub struct CommandSchedulerBuilder {
    sink: Arc<dyn CommandSink>,
    window: Duration,
    events: Option<EventBus>,
}

impl CommandSchedulerBuilder {
    /// Sets the debounce window.
    #[must_use]
    pub fn window(mut self, window: Duration) -> Self {
        self.window = window;
        self
    }

    /// Publishes a [`CommandSent`](crate::event::ChannelEvent::CommandSent)
    /// event on `events` for every command handed to the sink.
    #[must_use]
    pub fn events(mut self, events: EventBus) -> Self {
        self.events = Some(events);
        self
    }

    /// Builds the scheduler.
    #[must_use]
    pub fn build(self) -> CommandScheduler {
        CommandScheduler {
            inner: Arc::new(Inner {
                window: self.window,
                sink: self.sink,
                events: self.events,
                pending: Mutex::new(HashMap::new()),
            }),
        }
    }
}

impl std::fmt::Debug for CommandSchedulerBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CommandSchedulerBuilder")
            .field("window", &self.window)
            .field("events", &self.events.is_some())
            .finish_non_exhaustive()
    }
}

impl Drop for CommandScheduler {
    fn drop(&mut self) {
        self.shutdown();
    }
}

impl std::fmt::Debug for CommandScheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CommandScheduler")
            .field("window", &self.inner.window)
            .field("pending", &self.pending_count())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::ValueCodec;
    use crate::descriptor::ValueDescriptor;
    use crate::error::SinkError;

    type Sent = Arc<Mutex<Vec<(ChannelId, String)>>>;

    fn recording_scheduler(window_ms: u64) -> (CommandScheduler, Sent) {
        let sent: Sent = Arc::default();
        let log = Arc::clone(&sent);
        let sink = move |channel: &ChannelId, payload: &str| -> Result<(), SinkError> {
            log.lock().push((channel.clone(), payload.to_string()));
            Ok(())
        };
        let scheduler = CommandScheduler::builder(Arc::new(sink))
            .window(Duration::from_millis(window_ms))
            .build();
        (scheduler, sent)
    }

    fn dimmer() -> ChannelBinding {
        ChannelBinding::new("lamp:dimmer", ValueCodec::Number, ValueDescriptor::new())
    }

    #[tokio::test(start_paused = true)]
    async fn coalesces_to_last_value() {
        let (scheduler, sent) = recording_scheduler(300);
        let binding = dimmer();

        for level in [5.0, 12.0, 9.0] {
            scheduler.submit(&binding, DomainValue::numeric(level));
        }
        assert_eq!(scheduler.pending_count(), 1);
        assert_eq!(scheduler.pending_value(binding.id()), Some(DomainValue::numeric(9.0)));

        tokio::time::sleep(Duration::from_millis(350)).await;

        let sent = sent.lock();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].1, "9");
        assert!(!scheduler.is_pending(binding.id()));
    }

    #[tokio::test(start_paused = true)]
    async fn flush_sends_immediately() {
        let (scheduler, sent) = recording_scheduler(300);
        let binding = dimmer();

        scheduler.submit(&binding, DomainValue::numeric(40.0));
        assert!(scheduler.flush(binding.id()));
        assert_eq!(sent.lock().len(), 1);

        // The aborted timer must not send a second time
        tokio::time::sleep(Duration::from_millis(500)).await;
        assert_eq!(sent.lock().len(), 1);
        assert!(!scheduler.flush(binding.id()));
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_drops_pending_value() {
        let (scheduler, sent) = recording_scheduler(300);
        let binding = dimmer();

        scheduler.submit(&binding, DomainValue::numeric(40.0));
        assert!(scheduler.cancel(binding.id()));
        tokio::time::sleep(Duration::from_millis(500)).await;

        assert!(sent.lock().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn rearm_after_cancel_uses_fresh_window() {
        let (scheduler, sent) = recording_scheduler(300);
        let binding = dimmer();

        scheduler.submit(&binding, DomainValue::numeric(1.0));
        tokio::time::sleep(Duration::from_millis(200)).await;
        scheduler.cancel(binding.id());
        scheduler.submit(&binding, DomainValue::numeric(2.0));

        // The first window would have closed at 300 ms
        tokio::time::sleep(Duration::from_millis(150)).await;
        assert!(sent.lock().is_empty());

        tokio::time::sleep(Duration::from_millis(200)).await;
        assert_eq!(sent.lock().as_slice(), &[(binding.id().clone(), "2".to_string())]);
    }

    #[tokio::test(start_paused = true)]
    async fn shutdown_cancels_everything() {
        let (scheduler, sent) = recording_scheduler(300);
        let a = dimmer();
        let b = ChannelBinding::new("lamp:power", ValueCodec::OnOff, ValueDescriptor::new());

        scheduler.submit(&a, DomainValue::numeric(1.0));
        scheduler.submit(&b, DomainValue::boolean(true));
        assert_eq!(scheduler.pending_count(), 2);

        scheduler.shutdown();
        tokio::time::sleep(Duration::from_millis(500)).await;
        assert_eq!(scheduler.pending_count(), 0);
        assert!(sent.lock().is_empty());
    }
}
