// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Event bus for broadcasting channel events.

use tokio::sync::broadcast;

use super::ChannelEvent;
use crate::config::DEFAULT_EVENT_CAPACITY;

/// Broadcasts [`ChannelEvent`]s to every subscriber.
///
/// Each subscriber gets its own copy of every event published after it
/// subscribed. Clones share the same underlying channel.
///
/// A subscriber that falls more than the capacity behind loses the oldest
/// events and sees `RecvError::Lagged` once. Publishing never blocks.
///
/// # Examples
///
/// ```
/// use chanctl::event::{ChannelEvent, EventBus};
/// use chanctl::types::ChannelId;
///
/// let bus = EventBus::new();
/// let mut renderer = bus.subscribe();
/// let mut logger = bus.subscribe();
///
/// let delivered = bus.publish(ChannelEvent::DisplayChanged {
///     channel: ChannelId::new("lamp:dimmer"),
///     display: "40 %".to_string(),
/// });
/// assert_eq!(delivered, 2);
/// ```
#[derive(Debug, Clone)]
pub struct EventBus {
    sender: broadcast::Sender<ChannelEvent>,
}

impl EventBus {
    /// Creates a bus buffering 256 events per subscriber.
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_EVENT_CAPACITY)
    }

    /// Creates a bus buffering `capacity` events per subscriber.
    ///
    /// A capacity of zero is raised to one.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    /// Subscribes to events published from now on.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<ChannelEvent> {
        self.sender.subscribe()
    }

    /// Returns the number of live subscribers.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }

    /// Publishes an event and returns how many subscribers received it.
    ///
    /// Without subscribers the event is discarded.
    pub fn publish(&self, event: ChannelEvent) -> usize {
        match self.sender.send(event) {
            Ok(count) => count,
            Err(broadcast::error::SendError(event)) => {
                tracing::trace!(channel = %event.channel(), "No event subscribers");
                0
            }
        }
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ChannelId;

    fn sent(payload: &str) -> ChannelEvent {
        ChannelEvent::CommandSent {
            channel: ChannelId::new("lamp:dimmer"),
            payload: payload.to_string(),
        }
    }

    #[test]
    fn new_bus_has_no_subscribers() {
        let bus = EventBus::new();
        assert_eq!(bus.subscriber_count(), 0);
    }

    #[test]
    fn drop_subscriber_decrements_count() {
        let bus = EventBus::new();

        let rx1 = bus.subscribe();
        let _rx2 = bus.subscribe();
        assert_eq!(bus.subscriber_count(), 2);

        drop(rx1);
        assert_eq!(bus.subscriber_count(), 1);
    }

    #[tokio::test]
    async fn publish_delivers_to_multiple_subscribers() {
        let bus = EventBus::new();
        let mut rx1 = bus.subscribe();
        let mut rx2 = bus.subscribe();

        bus.publish(sent("40"));

        assert_eq!(rx1.recv().await.unwrap(), sent("40"));
        assert_eq!(rx2.recv().await.unwrap(), sent("40"));
    }

    #[test]
    fn publish_without_subscribers_is_discarded() {
        let bus = EventBus::new();
        assert_eq!(bus.publish(sent("1")), 0);
    }

    #[tokio::test]
    async fn zero_capacity_is_usable() {
        let bus = EventBus::with_capacity(0);
        let mut rx = bus.subscribe();
        assert_eq!(bus.publish(sent("5")), 1);
        assert_eq!(rx.recv().await.unwrap(), sent("5"));
    }

    #[test]
    fn clone_shares_same_channel() {
        let bus1 = EventBus::with_capacity(8);
        let bus2 = bus1.clone();

        let _rx = bus1.subscribe();
        assert_eq!(bus2.subscriber_count(), 1);
    }
}
