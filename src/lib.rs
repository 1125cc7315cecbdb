// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! `chanctl` - Channel value handling for device control surfaces.
//!
//! This library sits between a control surface (sliders, switches, color
//! pickers, transport buttons) and a backend that talks to devices. It turns
//! device wire strings into typed values, keeps fast user input from flooding
//! the device, and tells taps from holds on buttons.
//!
//! # Supported Features
//!
//! - **Value codecs**: on/off literals with inversion, numbers with units,
//!   `h,s,b` colors, free text
//! - **Display formatting**: printf-style patterns with a `%unit%` placeholder
//! - **Command coalescing**: one command per channel per debounce window,
//!   always carrying the latest value
//! - **Gestures**: tap versus hold with an optional settle command on release
//! - **Events**: display changes, rejected values, sent commands and resolved
//!   gestures on a broadcast bus
//!
//! # Quick Start
//!
//! ## Decoding and Encoding
//!
//! ```
//! use chanctl::codec::ValueCodec;
//! use chanctl::descriptor::ValueDescriptor;
//! use chanctl::types::DomainValue;
//!
//! // A relay that reports "0" when energized
//! let relay = ValueDescriptor::on_off("1", "0").with_inverse(true);
//!
//! let value = ValueCodec::OnOff.decode("0", &relay)?;
//! assert_eq!(value, DomainValue::boolean(true));
//! assert_eq!(ValueCodec::OnOff.encode(&value, &relay), "0");
//! # Ok::<(), chanctl::error::DecodeError>(())
//! ```
//!
//! ## A Control Session
//!
//! ```
//! use std::sync::Arc;
//! use chanctl::{GestureActions, Session};
//! use chanctl::codec::ValueCodec;
//! use chanctl::descriptor::ValueDescriptor;
//! use chanctl::sink::ChannelSink;
//! use chanctl::types::{ChannelId, DomainValue};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> chanctl::Result<()> {
//!     let (sink, mut outbound) = ChannelSink::new();
//!     let session = Session::new(Arc::new(sink));
//!
//!     // Slider input is coalesced
//!     let dimmer = ChannelId::new("lamp:dimmer");
//!     session.bind(dimmer.clone(), ValueCodec::Number, ValueDescriptor::new());
//!     for level in [10.0, 25.0, 40.0] {
//!         session.submit(&dimmer, DomainValue::numeric(level))?;
//!     }
//!
//!     // Buttons tell taps from holds
//!     let transport = ChannelId::new("tv:transport");
//!     session.bind(transport.clone(), ValueCodec::Text, ValueDescriptor::new());
//!     session.bind_gesture(
//!         &transport,
//!         GestureActions::new(DomainValue::text("NEXT"), DomainValue::text("FASTFORWARD"))
//!             .with_settle(DomainValue::text("PLAY")),
//!     )?;
//!     session.press(&transport)?;
//!     session.release(&transport)?;
//!
//!     assert_eq!(outbound.recv().await.unwrap().payload, "NEXT");
//!     assert_eq!(outbound.recv().await.unwrap().payload, "40");
//!     Ok(())
//! }
//! ```

pub mod binding;
pub mod codec;
pub mod config;
pub mod controller;
pub mod descriptor;
pub mod error;
pub mod event;
pub mod gesture;
pub mod scheduler;
pub mod session;
pub mod sink;
mod timer;
pub mod types;

pub use binding::ChannelBinding;
pub use codec::{InboundCommand, ValueCodec};
pub use config::{SessionConfig, TimingConfig};
pub use controller::ChannelController;
pub use descriptor::{ChannelType, StateDescription, ValueDescriptor};
pub use error::{DecodeError, Error, Result, SinkError, ValueError};
pub use event::{ChannelEvent, EventBus};
pub use gesture::{GestureActions, GestureDiscriminator, GestureOutcome};
pub use scheduler::{CommandScheduler, CommandSchedulerBuilder};
pub use session::Session;
pub use sink::{ChannelSink, CommandSink, OutboundCommand};
pub use timer::TimerId;
pub use types::{ChannelId, DomainValue, HsbColor, ValueKind};
