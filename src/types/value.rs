// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Typed channel values.

use std::fmt;

use super::HsbColor;

/// The value family a channel carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueKind {
    /// On/off or open/closed.
    Boolean,
    /// A decimal with an optional unit.
    Numeric,
    /// An HSB color triple.
    Color,
    /// Free text.
    Text,
}

impl ValueKind {
    /// Returns a short lowercase name for messages.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Boolean => "boolean",
            Self::Numeric => "numeric",
            Self::Color => "color",
            Self::Text => "text",
        }
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A typed, display-ready channel value.
///
/// Values produced by the codec are always finite: wire values that would
/// produce `NaN` are rejected at decode time.
///
/// # Examples
///
/// ```
/// use chanctl::types::{DomainValue, ValueKind};
///
/// let temp = DomainValue::numeric_with_unit(23.5, "°C");
/// assert_eq!(temp.kind(), ValueKind::Numeric);
/// assert_eq!(temp.as_f64(), Some(23.5));
/// ```
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum DomainValue {
    /// A two-state value.
    Boolean {
        /// Whether the value is on (or open).
        on: bool,
    },
    /// A decimal value with an optional unit suffix.
    Numeric {
        /// The numeric part.
        value: f64,
        /// The unit, e.g. `"°C"`.
        unit: Option<String>,
    },
    /// An HSB color.
    Color(HsbColor),
    /// Free text, passed through untouched.
    Text {
        /// The raw text.
        raw: String,
    },
}

impl DomainValue {
    /// Creates a boolean value.
    #[must_use]
    pub const fn boolean(on: bool) -> Self {
        Self::Boolean { on }
    }

    /// Creates a numeric value without a unit.
    #[must_use]
    pub const fn numeric(value: f64) -> Self {
        Self::Numeric { value, unit: None }
    }

    /// Creates a numeric value with a unit.
    #[must_use]
    pub fn numeric_with_unit(value: f64, unit: impl Into<String>) -> Self {
        Self::Numeric {
            value,
            unit: Some(unit.into()),
        }
    }

    /// Creates a text value.
    #[must_use]
    pub fn text(raw: impl Into<String>) -> Self {
        Self::Text { raw: raw.into() }
    }

    /// Returns the kind of this value.
    #[must_use]
    pub const fn kind(&self) -> ValueKind {
        match self {
            Self::Boolean { .. } => ValueKind::Boolean,
            Self::Numeric { .. } => ValueKind::Numeric,
            Self::Color(_) => ValueKind::Color,
            Self::Text { .. } => ValueKind::Text,
        }
    }

    /// Returns the boolean state, if this is a boolean value.
    #[must_use]
    pub const fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Boolean { on } => Some(*on),
            _ => None,
        }
    }

    /// Returns the numeric part, if this is a numeric value.
    #[must_use]
    pub const fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Numeric { value, .. } => Some(*value),
            _ => None,
        }
    }

    /// Returns the color, if this is a color value.
    #[must_use]
    pub const fn as_color(&self) -> Option<HsbColor> {
        match self {
            Self::Color(color) => Some(*color),
            _ => None,
        }
    }
}

impl From<bool> for DomainValue {
    fn from(on: bool) -> Self {
        Self::boolean(on)
    }
}

impl From<HsbColor> for DomainValue {
    fn from(color: HsbColor) -> Self {
        Self::Color(color)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_matches_variant() {
        assert_eq!(DomainValue::boolean(true).kind(), ValueKind::Boolean);
        assert_eq!(DomainValue::numeric(1.0).kind(), ValueKind::Numeric);
        assert_eq!(DomainValue::from(HsbColor::red()).kind(), ValueKind::Color);
        assert_eq!(DomainValue::text("x").kind(), ValueKind::Text);
    }

    #[test]
    fn accessors_return_none_for_other_kinds() {
        let value = DomainValue::text("PLAY");
        assert_eq!(value.as_bool(), None);
        assert_eq!(value.as_f64(), None);
        assert_eq!(value.as_color(), None);
    }

    #[test]
    fn serde_uses_tagged_representation() {
        let json = serde_json::to_value(DomainValue::boolean(true)).unwrap();
        assert_eq!(json, serde_json::json!({ "type": "boolean", "on": true }));

        let parsed: DomainValue =
            serde_json::from_value(serde_json::json!({ "type": "text", "raw": "NEXT" })).unwrap();
        assert_eq!(parsed, DomainValue::text("NEXT"));
    }
}
