// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Channel event types.

use crate::error::DecodeError;
use crate::gesture::GestureOutcome;
use crate::types::ChannelId;

/// Events emitted by a session.
#[derive(Debug, Clone, PartialEq)]
pub enum ChannelEvent {
    /// The formatted display string of a channel changed.
    DisplayChanged {
        /// The channel.
        channel: ChannelId,
        /// The new display string.
        display: String,
    },

    /// An inbound wire value was rejected; the display was left unchanged.
    DecodeRejected {
        /// The channel.
        channel: ChannelId,
        /// The offending wire value.
        wire: String,
        /// Why it was rejected.
        error: DecodeError,
    },

    /// An encoded command was handed to the sink.
    CommandSent {
        /// The channel.
        channel: ChannelId,
        /// The encoded wire value.
        payload: String,
    },

    /// A press/release gesture was classified.
    GestureResolved {
        /// The channel.
        channel: ChannelId,
        /// How the gesture was classified.
        outcome: GestureOutcome,
    },
}

impl ChannelEvent {
    /// Returns the channel this event concerns.
    #[must_use]
    pub fn channel(&self) -> &ChannelId {
        match self {
            Self::DisplayChanged { channel, .. }
            | Self::DecodeRejected { channel, .. }
            | Self::CommandSent { channel, .. }
            | Self::GestureResolved { channel, .. } => channel,
        }
    }

    /// Returns true if this event reports an outbound command.
    #[must_use]
    pub fn is_command(&self) -> bool {
        matches!(self, Self::CommandSent { .. })
    }
}
