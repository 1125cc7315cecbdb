// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! A channel bound to its codec and descriptor.

use std::sync::Arc;

use crate::codec::{InboundCommand, ValueCodec};
use crate::descriptor::{ChannelType, StateDescription, ValueDescriptor};
use crate::error::{DecodeError, ValueError};
use crate::types::{ChannelId, DomainValue, ValueKind};

/// Everything needed to read and write one channel's values.
///
/// Created once when a channel is bound. The descriptor is shared, never
/// mutated, so clones of a binding are cheap and always agree.
///
/// # Examples
///
/// ```
/// use chanctl::binding::ChannelBinding;
/// use chanctl::codec::ValueCodec;
/// use chanctl::descriptor::ValueDescriptor;
/// use chanctl::types::DomainValue;
///
/// let lamp = ChannelBinding::new("lamp:power", ValueCodec::OnOff, ValueDescriptor::new());
/// assert_eq!(lamp.encode(&DomainValue::boolean(true)), "ON");
/// ```
#[derive(Debug, Clone)]
pub struct ChannelBinding {
    id: ChannelId,
    codec: ValueCodec,
    descriptor: Arc<ValueDescriptor>,
}

impl ChannelBinding {
    /// Binds a channel.
    #[must_use]
    pub fn new(id: impl Into<ChannelId>, codec: ValueCodec, descriptor: ValueDescriptor) -> Self {
        Self {
            id: id.into(),
            codec,
            descriptor: Arc::new(descriptor),
        }
    }

    /// Returns the channel identifier.
    #[must_use]
    pub fn id(&self) -> &ChannelId {
        &self.id
    }

    /// Returns the codec.
    #[must_use]
    pub fn codec(&self) -> ValueCodec {
        self.codec
    }

    /// Returns the descriptor.
    #[must_use]
    pub fn descriptor(&self) -> &ValueDescriptor {
        &self.descriptor
    }

    /// Returns the value kind of the channel.
    #[must_use]
    pub fn kind(&self) -> ValueKind {
        self.codec.kind()
    }

    /// Decodes a wire value. See [`ValueCodec::decode`].
    ///
    /// # Errors
    ///
    /// Returns the codec's [`DecodeError`].
    pub fn decode(&self, wire: &str) -> Result<DomainValue, DecodeError> {
        self.codec.decode(wire, &self.descriptor)
    }

    /// Encodes a value for the wire.
    #[must_use]
    pub fn encode(&self, value: &DomainValue) -> String {
        self.codec.encode(value, &self.descriptor)
    }

    /// Formats a value for display.
    #[must_use]
    pub fn format(&self, value: &DomainValue) -> String {
        self.codec.format(value, &self.descriptor)
    }

    /// Converts a control-surface command. See [`ValueCodec::accept`].
    ///
    /// # Errors
    ///
    /// Returns [`DecodeError::UnsupportedCommandType`] when the channel's
    /// kind cannot represent the command.
    pub fn accept(&self, command: &InboundCommand) -> Result<DomainValue, DecodeError> {
        self.codec.accept(command, &self.descriptor)
    }

    /// Checks that a value fits the channel's kind and descriptor.
    ///
    /// # Errors
    ///
    /// Returns [`ValueError::KindMismatch`] for a value of another kind,
    /// otherwise whatever [`ValueDescriptor::validate`] reports.
    pub fn check(&self, value: &DomainValue) -> Result<(), ValueError> {
        let expected = self.kind();
        if value.kind() != expected {
            return Err(ValueError::KindMismatch {
                expected: expected.as_str(),
                actual: value.kind().as_str(),
            });
        }
        self.descriptor.validate(value)
    }

    /// Returns how the channel is presented.
    #[must_use]
    pub fn channel_type(&self) -> ChannelType {
        self.codec.channel_type(&self.descriptor)
    }

    /// Returns the presentation hints of the channel.
    #[must_use]
    pub fn state_description(&self) -> StateDescription {
        self.codec.state_description(&self.descriptor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clones_share_descriptor() {
        let binding = ChannelBinding::new(
            "door:contact",
            ValueCodec::OnOff,
            ValueDescriptor::on_off("open", "closed").receive_only(),
        );
        let copy = binding.clone();
        assert!(Arc::ptr_eq(&binding.descriptor, &copy.descriptor));
        assert_eq!(copy.channel_type(), ChannelType::Contact);
    }

    #[test]
    fn check_kind_and_descriptor() {
        let binding = ChannelBinding::new(
            "door:contact",
            ValueCodec::OnOff,
            ValueDescriptor::new().receive_only(),
        );
        assert_eq!(
            binding.check(&DomainValue::text("NEXT")),
            Err(ValueError::KindMismatch {
                expected: "boolean",
                actual: "text",
            })
        );
        assert_eq!(binding.check(&DomainValue::boolean(true)), Err(ValueError::ReadOnly));
    }

    #[test]
    fn decode_uses_descriptor() {
        let binding = ChannelBinding::new(
            "door:contact",
            ValueCodec::OnOff,
            ValueDescriptor::on_off("open", "closed"),
        );
        assert_eq!(binding.decode("OPEN"), Ok(DomainValue::boolean(true)));
        assert_eq!(binding.format(&DomainValue::boolean(true)), "ON");
    }
}
