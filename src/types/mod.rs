// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Value types shared by the codec, the scheduler and the gesture handling.
//!
//! # Types
//!
//! - [`ChannelId`] - Identifier of a bound device channel
//! - [`DomainValue`] - Typed, display-ready value of a channel
//! - [`ValueKind`] - The value family a channel carries
//! - [`HsbColor`] - HSB color (Hue 0-360, Saturation 0-100, Brightness 0-100)

mod channel;
mod color;
mod value;

pub use channel::ChannelId;
pub use color::HsbColor;
pub use value::{DomainValue, ValueKind};
