// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Numeric values with an optional unit suffix, e.g. `"23.5 °C"`.

use crate::error::DecodeError;
use crate::types::DomainValue;

use super::InboundCommand;

/// Parses a finite decimal. `NaN` and infinities are rejected.
fn parse_finite(text: &str) -> Result<f64, DecodeError> {
    text.trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| DecodeError::NotANumber(text.to_string()))
}

pub(crate) fn decode(wire: &str) -> Result<DomainValue, DecodeError> {
    match wire.split_once(' ') {
        Some((number, unit)) => {
            let value = parse_finite(number)?;
            let unit = unit.trim();
            Ok(DomainValue::Numeric {
                value,
                unit: (!unit.is_empty()).then(|| unit.to_string()),
            })
        }
        None => parse_finite(wire).map(DomainValue::numeric),
    }
}

pub(crate) fn encode(value: f64, unit: Option<&str>) -> String {
    match unit {
        Some(unit) => format!("{value} {unit}"),
        None => value.to_string(),
    }
}

pub(crate) fn accept(command: &InboundCommand) -> Result<DomainValue, DecodeError> {
    match command {
        InboundCommand::Decimal(value) if value.is_finite() => Ok(DomainValue::numeric(*value)),
        InboundCommand::Decimal(value) => Err(DecodeError::NotANumber(value.to_string())),
        InboundCommand::Text(text) => decode(text),
        other => Err(other.unsupported_by("numeric")),
    }
}
