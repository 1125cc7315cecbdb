// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Displayed state of a bound channel.

use parking_lot::RwLock;
use tokio::sync::watch;

use crate::binding::ChannelBinding;
use crate::error::{DecodeError, ValueError};
use crate::types::DomainValue;

/// Tracks the last good value of a channel and its display string.
///
/// Inbound wire values that fail to decode leave both untouched, so the
/// control surface never shows a half-parsed value. Local values set by the
/// user are applied optimistically before the command goes out.
///
/// # Examples
///
/// ```
/// use chanctl::binding::ChannelBinding;
/// use chanctl::codec::ValueCodec;
/// use chanctl::controller::ChannelController;
/// use chanctl::descriptor::ValueDescriptor;
///
/// let controller = ChannelController::new(ChannelBinding::new(
///     "hall:temperature",
///     ValueCodec::Number,
///     ValueDescriptor::new().with_format_pattern("%.1f %unit%"),
/// ));
///
/// controller.apply_wire("21.46 °C").unwrap();
/// assert_eq!(controller.display(), "21.5 °C");
///
/// // A garbled reading keeps the previous display
/// assert!(controller.apply_wire("--.- °C").is_err());
/// assert_eq!(controller.display(), "21.5 °C");
/// ```
#[derive(Debug)]
pub struct ChannelController {
    binding: ChannelBinding,
    value: RwLock<Option<DomainValue>>,
    display_tx: watch::Sender<String>,
}

impl ChannelController {
    /// Creates a controller with no known value and an empty display.
    #[must_use]
    pub fn new(binding: ChannelBinding) -> Self {
        let (display_tx, _) = watch::channel(String::new());
        Self {
            binding,
            value: RwLock::new(None),
            display_tx,
        }
    }

    /// Returns the binding of the channel.
    #[must_use]
    pub fn binding(&self) -> &ChannelBinding {
        &self.binding
    }

    /// Returns the last good value, if one is known.
    #[must_use]
    pub fn value(&self) -> Option<DomainValue> {
        self.value.read().clone()
    }

    /// Returns the current display string.
    #[must_use]
    pub fn display(&self) -> String {
        self.display_tx.borrow().clone()
    }

    /// Creates a receiver that observes display changes.
    #[must_use]
    pub fn watch_display(&self) -> watch::Receiver<String> {
        self.display_tx.subscribe()
    }

    /// Applies a wire value received from the device.
    ///
    /// Returns true if the display string changed.
    ///
    /// # Errors
    ///
    /// Returns the [`DecodeError`] if the value could not be decoded; the
    /// stored value and display are unchanged in that case.
    pub fn apply_wire(&self, wire: &str) -> Result<bool, DecodeError> {
        let value = self.binding.decode(wire).inspect_err(|e| {
            tracing::warn!(
                channel = %self.binding.id(),
                wire = %wire,
                error = %e,
                "Rejected inbound value, keeping previous state"
            );
        })?;
        Ok(self.store(value))
    }

    /// Applies a value set locally by the user.
    ///
    /// Returns true if the display string changed.
    ///
    /// # Errors
    ///
    /// Returns [`ValueError::KindMismatch`] if the value does not fit the
    /// channel, or the descriptor's constraint violation.
    pub fn apply_local(&self, value: DomainValue) -> Result<bool, ValueError> {
        self.binding.check(&value)?;
        Ok(self.store(value))
    }

    // The value lock is held across the display update so concurrent
    // writers leave both from the same value.
    fn store(&self, value: DomainValue) -> bool {
        let display = self.binding.format(&value);
        let mut slot = self.value.write();
        *slot = Some(value);
        self.display_tx.send_if_modified(|current| {
            if *current == display {
                false
            } else {
                *current = display;
                true
            }
        })
    }
}
