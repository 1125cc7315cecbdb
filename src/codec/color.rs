// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Comma-separated HSB color triples, e.g. `"120,80,100"`.

use crate::error::DecodeError;
use crate::types::{DomainValue, HsbColor};

use super::InboundCommand;

pub(crate) fn decode(wire: &str) -> Result<DomainValue, DecodeError> {
    let parts: Vec<&str> = wire.split(',').collect();
    let [hue, saturation, brightness] = parts.as_slice() else {
        // Uninitialized devices report something that is not a triple
        return Ok(DomainValue::Color(HsbColor::zero()));
    };

    let component = |text: &str| {
        text.trim()
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite())
            .ok_or_else(|| DecodeError::MalformedComposite(wire.to_string()))
    };

    Ok(DomainValue::Color(HsbColor::clamped(
        component(hue)?,
        component(saturation)?,
        component(brightness)?,
    )))
}

pub(crate) fn accept(command: &InboundCommand) -> Result<DomainValue, DecodeError> {
    match command {
        InboundCommand::Hsb(color) => Ok(DomainValue::Color(*color)),
        InboundCommand::OnOff(true) => Ok(DomainValue::Color(HsbColor::white())),
        InboundCommand::OnOff(false) => Ok(DomainValue::Color(HsbColor::zero())),
        InboundCommand::Text(text) => decode(text),
        other => Err(other.unsupported_by("color")),
    }
}
