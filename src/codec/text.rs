// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Free text values, passed through untouched.

use crate::types::DomainValue;

use super::InboundCommand;

pub(crate) fn decode(wire: &str) -> DomainValue {
    DomainValue::text(wire)
}

/// Every command has a text rendering, so text channels accept all of them.
pub(crate) fn accept(command: &InboundCommand) -> DomainValue {
    match command {
        InboundCommand::Text(text) => DomainValue::text(text.as_str()),
        InboundCommand::OnOff(on) => DomainValue::text(if *on { "ON" } else { "OFF" }),
        InboundCommand::OpenClosed(open) => DomainValue::text(if *open { "OPEN" } else { "CLOSED" }),
        InboundCommand::Decimal(value) => DomainValue::text(value.to_string()),
        InboundCommand::Hsb(color) => DomainValue::text(color.to_string()),
    }
}
