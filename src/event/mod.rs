// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Event system for channel activity.
//!
//! A [`Session`](crate::session::Session) publishes a [`ChannelEvent`] when
//! a channel's display changes, when an inbound value is rejected, when a
//! command is handed to the sink and when a gesture resolves. The
//! [`EventBus`] uses tokio's broadcast channel so several subscribers (a
//! renderer, a logger) can follow the same stream.
//!
//! # Examples
//!
//! ```
//! use chanctl::event::{ChannelEvent, EventBus};
//! use chanctl::types::ChannelId;
//!
//! let bus = EventBus::new();
//! let mut rx = bus.subscribe();
//!
//! bus.publish(ChannelEvent::CommandSent {
//!     channel: ChannelId::new("lamp:power"),
//!     payload: "ON".to_string(),
//! });
//! ```

mod channel_event;
mod event_bus;

pub use channel_event::ChannelEvent;
pub use event_bus::EventBus;
