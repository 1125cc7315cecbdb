// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types for the `chanctl` library.
//!
//! The hierarchy mirrors the layers of the crate: decoding wire values,
//! validating outbound values, and handing encoded commands to a sink.
//! Decode errors are always recoverable: callers keep their last good value.

use thiserror::Error;

use crate::types::ChannelId;

/// The main error type for this library.
#[derive(Debug, Error)]
pub enum Error {
    /// A wire value or command could not be decoded.
    #[error("decode error: {0}")]
    Decode(#[from] DecodeError),

    /// A value was rejected by its descriptor.
    #[error("value error: {0}")]
    Value(#[from] ValueError),

    /// The command sink failed to accept a command.
    #[error("sink error: {0}")]
    Sink(#[from] SinkError),

    /// The channel is not bound in this session.
    #[error("channel {0} is not bound")]
    ChannelNotBound(ChannelId),

    /// A configuration document could not be parsed.
    #[error("invalid configuration: {0}")]
    Config(#[from] serde_json::Error),
}

/// Errors produced while turning wire strings or commands into domain values.
///
/// None of these are fatal. A caller that receives one keeps displaying the
/// previous state.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DecodeError {
    /// The literal matches neither the on nor the off literal set.
    #[error("unrecognized on/off literal: {0}")]
    UnrecognizedLiteral(String),

    /// The numeric part of a wire value is not a finite decimal.
    #[error("not a number: {0}")]
    NotANumber(String),

    /// A composite value has the right shape but an unusable component.
    #[error("malformed composite value: {0}")]
    MalformedComposite(String),

    /// The command kind cannot be represented by the channel's value kind.
    #[error("command type {command} is not supported for {kind} values")]
    UnsupportedCommandType {
        /// The value kind of the channel.
        kind: &'static str,
        /// The kind of command that was offered.
        command: &'static str,
    },
}

/// Errors related to value construction and descriptor constraints.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ValueError {
    /// A numeric value is outside the descriptor bounds.
    #[error("value {actual} is out of range [{min}, {max}]")]
    OutOfRange {
        /// Minimum allowed value.
        min: f64,
        /// Maximum allowed value.
        max: f64,
        /// The actual value that was provided.
        actual: f64,
    },

    /// A hue value is outside the valid range (0-360).
    #[error("hue value {0} is out of range [0, 360]")]
    InvalidHue(f64),

    /// A saturation value is outside the valid range (0-100).
    #[error("saturation value {0} is out of range [0, 100]")]
    InvalidSaturation(f64),

    /// A brightness value is outside the valid range (0-100).
    #[error("brightness value {0} is out of range [0, 100]")]
    InvalidBrightness(f64),

    /// Numeric values must be finite.
    #[error("value is not finite")]
    NonFinite,

    /// A text value is not one of the enumerated options.
    #[error("{0:?} is not an allowed option")]
    NotAnOption(String),

    /// The value variant does not match the channel's value kind.
    #[error("expected a {expected} value, got {actual}")]
    KindMismatch {
        /// The kind the channel holds.
        expected: &'static str,
        /// The kind that was provided.
        actual: &'static str,
    },

    /// The channel does not accept outbound commands.
    #[error("channel is read-only")]
    ReadOnly,
}

/// Errors reported by a [`CommandSink`](crate::sink::CommandSink).
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SinkError {
    /// The transport side of the sink has gone away.
    #[error("sink channel closed")]
    ChannelClosed,

    /// The backend refused the command.
    #[error("command rejected: {0}")]
    Rejected(String),
}

/// A specialized Result type for this library.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_error_display() {
        let err = DecodeError::UnrecognizedLiteral("MAYBE".to_string());
        assert_eq!(err.to_string(), "unrecognized on/off literal: MAYBE");
    }

    #[test]
    fn unsupported_command_display() {
        let err = DecodeError::UnsupportedCommandType {
            kind: "boolean",
            command: "hsb",
        };
        assert_eq!(
            err.to_string(),
            "command type hsb is not supported for boolean values"
        );
    }

    #[test]
    fn value_error_display() {
        let err = ValueError::OutOfRange {
            min: 0.0,
            max: 100.0,
            actual: 150.0,
        };
        assert_eq!(err.to_string(), "value 150 is out of range [0, 100]");
    }

    #[test]
    fn error_from_decode_error() {
        let err: Error = DecodeError::NotANumber("abc".to_string()).into();
        assert!(matches!(err, Error::Decode(DecodeError::NotANumber(_))));
    }

    #[test]
    fn error_from_json_error() {
        let json_err = serde_json::from_str::<u64>("nope").unwrap_err();
        let err: Error = json_err.into();
        assert!(err.to_string().starts_with("invalid configuration:"));
    }

    #[test]
    fn channel_not_bound_display() {
        let err = Error::ChannelNotBound(ChannelId::new("lamp:power"));
        assert_eq!(err.to_string(), "channel lamp:power is not bound");
    }
}
