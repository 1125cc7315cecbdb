// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Conversion between wire strings and typed channel values.
//!
//! A [`ValueCodec`] handles one value kind. It holds no state of its own:
//! everything channel-specific (literals, inversion, units, patterns) comes
//! from the [`ValueDescriptor`] passed to each call.
//!
//! | Kind     | Wire example  | Domain value                          |
//! |----------|---------------|---------------------------------------|
//! | On/off   | `ON`, `1`     | `Boolean { on: true }`                |
//! | Number   | `23.5 °C`     | `Numeric { value: 23.5, unit: "°C" }` |
//! | Color    | `120,80,100`  | `Color(HsbColor)`                     |
//! | Text     | `PLAY`        | `Text { raw: "PLAY" }`                |
//!
//! # Examples
//!
//! ```
//! use chanctl::codec::ValueCodec;
//! use chanctl::descriptor::ValueDescriptor;
//! use chanctl::types::DomainValue;
//!
//! let descriptor = ValueDescriptor::on_off("open", "closed").with_inverse(true);
//! let codec = ValueCodec::OnOff;
//!
//! let value = codec.decode("open", &descriptor).unwrap();
//! assert_eq!(value, DomainValue::boolean(false));
//! assert_eq!(codec.encode(&value, &descriptor), "open");
//! ```

mod color;
mod number;
mod on_off;
mod pattern;
mod text;

use serde::{Deserialize, Serialize};

use crate::descriptor::{ChannelType, StateDescription, ValueDescriptor};
use crate::error::DecodeError;
use crate::types::{DomainValue, HsbColor, ValueKind};

use self::pattern::PatternArg;

/// A command issued by the control surface, before it is bound to a kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "camelCase")]
pub enum InboundCommand {
    /// On or off.
    OnOff(bool),
    /// Open (`true`) or closed.
    OpenClosed(bool),
    /// A plain decimal.
    Decimal(f64),
    /// An HSB color.
    Hsb(HsbColor),
    /// Text, interpreted by the receiving kind.
    Text(String),
}

impl InboundCommand {
    /// Returns a short name of the command type.
    #[must_use]
    pub const fn type_name(&self) -> &'static str {
        match self {
            Self::OnOff(_) => "onoff",
            Self::OpenClosed(_) => "openclosed",
            Self::Decimal(_) => "decimal",
            Self::Hsb(_) => "hsb",
            Self::Text(_) => "text",
        }
    }

    pub(crate) fn unsupported_by(&self, kind: &'static str) -> DecodeError {
        DecodeError::UnsupportedCommandType {
            kind,
            command: self.type_name(),
        }
    }
}

/// Bidirectional converter for one value kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ValueCodec {
    /// Boolean values with configurable literals and inversion.
    OnOff,
    /// Decimals with an optional unit.
    Number,
    /// HSB color triples.
    Color,
    /// Free text.
    Text,
}

impl ValueCodec {
    /// Returns the codec for a value kind.
    #[must_use]
    pub const fn for_kind(kind: ValueKind) -> Self {
        match kind {
            ValueKind::Boolean => Self::OnOff,
            ValueKind::Numeric => Self::Number,
            ValueKind::Color => Self::Color,
            ValueKind::Text => Self::Text,
        }
    }

    /// Returns the value kind this codec produces.
    #[must_use]
    pub const fn kind(&self) -> ValueKind {
        match self {
            Self::OnOff => ValueKind::Boolean,
            Self::Number => ValueKind::Numeric,
            Self::Color => ValueKind::Color,
            Self::Text => ValueKind::Text,
        }
    }

    /// Decodes a wire string.
    ///
    /// # Errors
    ///
    /// - [`DecodeError::UnrecognizedLiteral`] for on/off literals outside
    ///   the descriptor's literal set
    /// - [`DecodeError::NotANumber`] for numbers that do not parse or are
    ///   not finite
    /// - [`DecodeError::MalformedComposite`] for color triples with an
    ///   unusable component
    pub fn decode(&self, wire: &str, descriptor: &ValueDescriptor) -> Result<DomainValue, DecodeError> {
        match self {
            Self::OnOff => on_off::decode(wire, descriptor),
            Self::Number => number::decode(wire),
            Self::Color => color::decode(wire),
            Self::Text => Ok(text::decode(wire)),
        }
    }

    /// Encodes a value for the wire.
    ///
    /// Encoding never fails; values are expected to have been validated
    /// against the descriptor beforehand.
    #[must_use]
    pub fn encode(&self, value: &DomainValue, descriptor: &ValueDescriptor) -> String {
        match value {
            DomainValue::Boolean { on } => on_off::encode(*on, descriptor),
            DomainValue::Numeric { value, unit } => number::encode(*value, unit.as_deref()),
            DomainValue::Color(color) => color.to_command_string(),
            DomainValue::Text { raw } => raw.clone(),
        }
    }

    /// Formats a value for display.
    ///
    /// The descriptor's pattern is used when present. Numeric values fall
    /// back to the descriptor's unit when they carry none.
    #[must_use]
    pub fn format(&self, value: &DomainValue, descriptor: &ValueDescriptor) -> String {
        let pattern = descriptor.format_pattern();
        match value {
            DomainValue::Boolean { on } => {
                let label = boolean_label(*on, descriptor.is_receive_only());
                match pattern {
                    Some(p) => pattern::render(p, PatternArg::Text(label), descriptor.unit()),
                    None => label.to_string(),
                }
            }
            DomainValue::Numeric { value, unit } => {
                let unit = unit.as_deref().or(descriptor.unit());
                match pattern {
                    Some(p) => pattern::render(p, PatternArg::Number(*value), unit),
                    None => number::encode(*value, unit),
                }
            }
            DomainValue::Color(color) => {
                let text = color.to_string();
                match pattern {
                    Some(p) => pattern::render(p, PatternArg::Text(&text), descriptor.unit()),
                    None => text,
                }
            }
            DomainValue::Text { raw } => match pattern {
                Some(p) => pattern::render(p, PatternArg::Text(raw), descriptor.unit()),
                None => raw.clone(),
            },
        }
    }

    /// Converts a control-surface command into a value of this codec's kind.
    ///
    /// Commands are domain-side values, so on/off inversion is not applied
    /// here; it only happens at the wire boundary.
    ///
    /// # Errors
    ///
    /// Returns [`DecodeError::UnsupportedCommandType`] if the kind cannot
    /// represent the command, or the decode error of a text command that
    /// does not parse.
    pub fn accept(
        &self,
        command: &InboundCommand,
        descriptor: &ValueDescriptor,
    ) -> Result<DomainValue, DecodeError> {
        match self {
            Self::OnOff => on_off::accept(command, descriptor),
            Self::Number => number::accept(command),
            Self::Color => color::accept(command),
            Self::Text => Ok(text::accept(command)),
        }
    }

    /// Returns how the channel is presented.
    ///
    /// Receive-only on/off channels are contacts, all other on/off
    /// channels are switches.
    #[must_use]
    pub fn channel_type(&self, descriptor: &ValueDescriptor) -> ChannelType {
        match self {
            Self::OnOff if descriptor.is_receive_only() => ChannelType::Contact,
            Self::OnOff => ChannelType::Switch,
            Self::Number => ChannelType::Number,
            Self::Color => ChannelType::Color,
            Self::Text => ChannelType::String,
        }
    }

    /// Builds the presentation hints for the channel.
    #[must_use]
    pub fn state_description(&self, descriptor: &ValueDescriptor) -> StateDescription {
        let read_only = descriptor.is_read_only() || descriptor.is_receive_only();
        let explicit = descriptor.format_pattern().map(str::to_string);

        match self {
            Self::OnOff => StateDescription {
                minimum: None,
                maximum: None,
                pattern: Some(match descriptor.unit() {
                    Some(unit) => format!("%s {unit}"),
                    None => "%s".to_string(),
                }),
                read_only,
                // On/off states are never offered as options
                options: Vec::new(),
            },
            Self::Number => StateDescription {
                minimum: descriptor.minimum(),
                maximum: descriptor.maximum(),
                pattern: explicit.or_else(|| {
                    Some(if descriptor.unit().is_some() {
                        "%s %unit%".to_string()
                    } else {
                        "%s".to_string()
                    })
                }),
                read_only,
                options: descriptor.options().to_vec(),
            },
            Self::Color => StateDescription {
                minimum: None,
                maximum: None,
                pattern: explicit,
                read_only,
                options: Vec::new(),
            },
            Self::Text => StateDescription {
                minimum: None,
                maximum: None,
                pattern: explicit.or_else(|| Some("%s".to_string())),
                read_only,
                options: descriptor.options().to_vec(),
            },
        }
    }
}

fn boolean_label(on: bool, contact: bool) -> &'static str {
    match (contact, on) {
        (true, true) => "OPEN",
        (true, false) => "CLOSED",
        (false, true) => "ON",
        (false, false) => "OFF",
    }
}
