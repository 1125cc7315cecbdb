// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! The boundary to the backend device-command channel.
//!
//! The core never talks to a transport directly. Encoded commands are handed
//! to a [`CommandSink`], which is expected to return immediately. Delivery is
//! best effort: a failed send is logged and otherwise ignored.
//!
//! Closures can be used as sinks:
//!
//! ```
//! use chanctl::error::SinkError;
//! use chanctl::sink::CommandSink;
//! use chanctl::types::ChannelId;
//!
//! let sink = |channel: &ChannelId, payload: &str| -> Result<(), SinkError> {
//!     println!("{channel} <- {payload}");
//!     Ok(())
//! };
//! sink.send(&ChannelId::new("lamp:power"), "ON").unwrap();
//! ```

use tokio::sync::mpsc;

use crate::binding::ChannelBinding;
use crate::error::SinkError;
use crate::event::{ChannelEvent, EventBus};
use crate::types::{ChannelId, DomainValue};

/// Receives encoded commands for transmission.
pub trait CommandSink: Send + Sync {
    /// Hands an encoded value over for transmission.
    ///
    /// Implementations must not block waiting for an acknowledgement.
    ///
    /// # Errors
    ///
    /// Returns [`SinkError`] if the command could not be queued.
    fn send(&self, channel: &ChannelId, payload: &str) -> Result<(), SinkError>;
}

impl<F> CommandSink for F
where
    F: Fn(&ChannelId, &str) -> Result<(), SinkError> + Send + Sync,
{
    fn send(&self, channel: &ChannelId, payload: &str) -> Result<(), SinkError> {
        self(channel, payload)
    }
}

/// An outbound command as queued by [`ChannelSink`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundCommand {
    /// Target channel.
    pub channel: ChannelId,
    /// Encoded wire value.
    pub payload: String,
}

/// A sink that forwards commands to a transport task over an mpsc channel.
///
/// # Examples
///
/// ```
/// use chanctl::sink::{ChannelSink, CommandSink};
/// use chanctl::types::ChannelId;
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let (sink, mut rx) = ChannelSink::new();
/// sink.send(&ChannelId::new("lamp:dimmer"), "40").unwrap();
///
/// let command = rx.recv().await.unwrap();
/// assert_eq!(command.payload, "40");
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct ChannelSink {
    tx: mpsc::UnboundedSender<OutboundCommand>,
}

impl ChannelSink {
    /// Creates a sink and the receiver the transport task reads from.
    #[must_use]
    pub fn new() -> (Self, mpsc::UnboundedReceiver<OutboundCommand>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

impl CommandSink for ChannelSink {
    fn send(&self, channel: &ChannelId, payload: &str) -> Result<(), SinkError> {
        self.tx
            .send(OutboundCommand {
                channel: channel.clone(),
                payload: payload.to_string(),
            })
            .map_err(|_| SinkError::ChannelClosed)
    }
}

/// Encodes `value` for `binding` and hands it to `sink`.
///
/// Failures are logged and swallowed. Returns true if the sink accepted the
/// command.
pub(crate) fn deliver(
    sink: &dyn CommandSink,
    events: Option<&EventBus>,
    binding: &ChannelBinding,
    value: &DomainValue,
) -> bool {
    let payload = binding.encode(value);
    match sink.send(binding.id(), &payload) {
        Ok(()) => {
            tracing::debug!(channel = %binding.id(), payload = %payload, "Sent command");
            if let Some(events) = events {
                events.publish(ChannelEvent::CommandSent {
                    channel: binding.id().clone(),
                    payload,
                });
            }
            true
        }
        Err(e) => {
            tracing::warn!(
                channel = %binding.id(),
                payload = %payload,
                error = %e,
                "Failed to send command"
            );
            false
        }
    }
}
