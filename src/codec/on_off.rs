// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! On/off values.
//!
//! Wire literals are classified against the uninverted literal set first;
//! inversion is a single negation applied afterwards.

use crate::descriptor::ValueDescriptor;
use crate::error::DecodeError;
use crate::types::DomainValue;

use super::InboundCommand;

/// Classifies a literal without applying inversion.
///
/// Matches case-insensitively against the descriptor's on literal, `ON` and
/// `1`, then against the off literal, `OFF` and `0`.
pub(crate) fn classify(literal: &str, descriptor: &ValueDescriptor) -> Result<bool, DecodeError> {
    let matches = |candidates: [&str; 3]| candidates.iter().any(|c| literal.eq_ignore_ascii_case(c));

    if matches([descriptor.on_literal(), "ON", "1"]) {
        Ok(true)
    } else if matches([descriptor.off_literal(), "OFF", "0"]) {
        Ok(false)
    } else {
        Err(DecodeError::UnrecognizedLiteral(literal.to_string()))
    }
}

pub(crate) fn decode(wire: &str, descriptor: &ValueDescriptor) -> Result<DomainValue, DecodeError> {
    let on = classify(wire, descriptor)?;
    Ok(DomainValue::boolean(on ^ descriptor.is_inverse()))
}

pub(crate) fn encode(on: bool, descriptor: &ValueDescriptor) -> String {
    if on ^ descriptor.is_inverse() {
        descriptor.on_literal().to_string()
    } else {
        descriptor.off_literal().to_string()
    }
}

pub(crate) fn accept(
    command: &InboundCommand,
    descriptor: &ValueDescriptor,
) -> Result<DomainValue, DecodeError> {
    match command {
        InboundCommand::OnOff(on) | InboundCommand::OpenClosed(on) => Ok(DomainValue::boolean(*on)),
        InboundCommand::Text(text) => classify(text, descriptor).map(DomainValue::boolean),
        other => Err(other.unsupported_by("boolean")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::HsbColor;

    fn open_closed(inverse: bool) -> ValueDescriptor {
        ValueDescriptor::on_off("open", "closed").with_inverse(inverse)
    }

    #[test]
    fn classify_generic_literals() {
        let descriptor = ValueDescriptor::new();
        assert_eq!(classify("ON", &descriptor), Ok(true));
        assert_eq!(classify("on", &descriptor), Ok(true));
        assert_eq!(classify("1", &descriptor), Ok(true));
        assert_eq!(classify("Off", &descriptor), Ok(false));
        assert_eq!(classify("0", &descriptor), Ok(false));
    }

    #[test]
    fn classify_custom_literals_case_insensitive() {
        let descriptor = open_closed(false);
        assert_eq!(classify("OPEN", &descriptor), Ok(true));
        assert_eq!(classify("closed", &descriptor), Ok(false));
        // Generic literals stay accepted next to custom ones
        assert_eq!(classify("ON", &descriptor), Ok(true));
    }

    #[test]
    fn classify_rejects_unknown() {
        assert_eq!(
            classify("2", &ValueDescriptor::new()),
            Err(DecodeError::UnrecognizedLiteral("2".to_string()))
        );
    }

    #[test]
    fn inversion_applies_after_classification() {
        let descriptor = open_closed(true);
        assert_eq!(decode("open", &descriptor), Ok(DomainValue::boolean(false)));
        assert_eq!(decode("1", &descriptor), Ok(DomainValue::boolean(false)));
        assert_eq!(decode("OFF", &descriptor), Ok(DomainValue::boolean(true)));
    }

    #[test]
    fn encode_maps_to_descriptor_literals() {
        let descriptor = open_closed(false);
        assert_eq!(encode(true, &descriptor), "open");
        assert_eq!(encode(false, &descriptor), "closed");

        let inverted = open_closed(true);
        assert_eq!(encode(true, &inverted), "closed");
        assert_eq!(encode(false, &inverted), "open");
    }

    #[test]
    fn round_trip_with_and_without_inversion() {
        for inverse in [false, true] {
            let descriptor = open_closed(inverse);
            for on in [false, true] {
                let wire = encode(on, &descriptor);
                assert_eq!(decode(&wire, &descriptor), Ok(DomainValue::boolean(on)));
            }
        }
    }

    #[test]
    fn accept_commands() {
        let descriptor = ValueDescriptor::new().with_inverse(true);
        // Commands are domain values: no inversion here
        assert_eq!(
            accept(&InboundCommand::OnOff(true), &descriptor),
            Ok(DomainValue::boolean(true))
        );
        assert_eq!(
            accept(&InboundCommand::OpenClosed(false), &descriptor),
            Ok(DomainValue::boolean(false))
        );
        assert_eq!(
            accept(&InboundCommand::Text("on".to_string()), &descriptor),
            Ok(DomainValue::boolean(true))
        );
        assert!(matches!(
            accept(&InboundCommand::Hsb(HsbColor::red()), &descriptor),
            Err(DecodeError::UnsupportedCommandType { kind: "boolean", command: "hsb" })
        ));
    }
}
