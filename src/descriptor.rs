// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Per-channel value descriptors.
//!
//! A [`ValueDescriptor`] is handed over by the metadata provider when a
//! channel is bound and never changes afterwards. It controls how the codec
//! reads and writes wire values (literals, inversion), how values are
//! displayed (pattern, unit) and which outbound values are acceptable
//! (bounds, options, read-only flags).
//!
//! Descriptors deserialize from the camelCase JSON the metadata provider
//! emits; every field is optional.
//!
//! ```
//! use chanctl::descriptor::ValueDescriptor;
//!
//! let descriptor: ValueDescriptor = serde_json::from_str(
//!     r#"{ "onLiteral": "open", "offLiteral": "closed", "inverse": true }"#,
//! ).unwrap();
//!
//! assert_eq!(descriptor.on_literal(), "open");
//! assert!(descriptor.is_inverse());
//! assert!(!descriptor.is_receive_only());
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ValueError;
use crate::types::{DomainValue, HsbColor};

/// Default wire literal for the "on" state.
pub const DEFAULT_ON_LITERAL: &str = "ON";

/// Default wire literal for the "off" state.
pub const DEFAULT_OFF_LITERAL: &str = "OFF";

fn default_on_literal() -> String {
    DEFAULT_ON_LITERAL.to_string()
}

fn default_off_literal() -> String {
    DEFAULT_OFF_LITERAL.to_string()
}

/// Immutable configuration of one channel's codec.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValueDescriptor {
    #[serde(default = "default_on_literal")]
    on_literal: String,
    #[serde(default = "default_off_literal")]
    off_literal: String,
    #[serde(default)]
    inverse: bool,
    #[serde(default)]
    receive_only: bool,
    #[serde(default)]
    read_only: bool,
    #[serde(default)]
    format_pattern: Option<String>,
    #[serde(default)]
    unit: Option<String>,
    #[serde(default)]
    minimum: Option<f64>,
    #[serde(default)]
    maximum: Option<f64>,
    #[serde(default)]
    options: Vec<String>,
}

impl ValueDescriptor {
    /// Creates a descriptor with the default `ON`/`OFF` literals.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a descriptor with custom on/off literals.
    #[must_use]
    pub fn on_off(on_literal: impl Into<String>, off_literal: impl Into<String>) -> Self {
        Self {
            on_literal: on_literal.into(),
            off_literal: off_literal.into(),
            ..Self::default()
        }
    }

    /// Swaps the meaning of on and off at the wire boundary.
    #[must_use]
    pub fn with_inverse(mut self, inverse: bool) -> Self {
        self.inverse = inverse;
        self
    }

    /// Marks the channel as a receive-only sensor.
    #[must_use]
    pub fn receive_only(mut self) -> Self {
        self.receive_only = true;
        self
    }

    /// Marks the channel as read-only.
    #[must_use]
    pub fn read_only(mut self) -> Self {
        self.read_only = true;
        self
    }

    /// Sets the printf-style display pattern.
    #[must_use]
    pub fn with_format_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.format_pattern = Some(pattern.into());
        self
    }

    /// Sets the display unit used when a value carries none.
    #[must_use]
    pub fn with_unit(mut self, unit: impl Into<String>) -> Self {
        self.unit = Some(unit.into());
        self
    }

    /// Sets the inclusive bounds for numeric values.
    #[must_use]
    pub fn with_bounds(mut self, minimum: f64, maximum: f64) -> Self {
        self.minimum = Some(minimum);
        self.maximum = Some(maximum);
        self
    }

    /// Sets the enumerated allowed values.
    #[must_use]
    pub fn with_options<I, S>(mut self, options: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.options = options.into_iter().map(Into::into).collect();
        self
    }

    /// Returns the wire literal for the on state.
    #[must_use]
    pub fn on_literal(&self) -> &str {
        &self.on_literal
    }

    /// Returns the wire literal for the off state.
    #[must_use]
    pub fn off_literal(&self) -> &str {
        &self.off_literal
    }

    /// Returns true if on/off are swapped at the wire boundary.
    #[must_use]
    pub fn is_inverse(&self) -> bool {
        self.inverse
    }

    /// Returns true if the channel only receives state.
    #[must_use]
    pub fn is_receive_only(&self) -> bool {
        self.receive_only
    }

    /// Returns true if the descriptor itself is flagged read-only.
    #[must_use]
    pub fn is_read_only(&self) -> bool {
        self.read_only
    }

    /// Returns the display pattern, if any.
    #[must_use]
    pub fn format_pattern(&self) -> Option<&str> {
        self.format_pattern.as_deref()
    }

    /// Returns the display unit, if any.
    #[must_use]
    pub fn unit(&self) -> Option<&str> {
        self.unit.as_deref()
    }

    /// Returns the lower bound, if any.
    #[must_use]
    pub fn minimum(&self) -> Option<f64> {
        self.minimum
    }

    /// Returns the upper bound, if any.
    #[must_use]
    pub fn maximum(&self) -> Option<f64> {
        self.maximum
    }

    /// Returns the enumerated allowed values.
    #[must_use]
    pub fn options(&self) -> &[String] {
        &self.options
    }

    /// Checks an outbound value against this descriptor.
    ///
    /// Receive-only and read-only channels refuse every value. Numeric
    /// values must be finite and within the bounds, colors must have every
    /// component in range, text values must be one of the options when
    /// options are enumerated.
    ///
    /// # Errors
    ///
    /// Returns the first constraint the value violates.
    pub fn validate(&self, value: &DomainValue) -> Result<(), ValueError> {
        if self.receive_only || self.read_only {
            return Err(ValueError::ReadOnly);
        }
        match value {
            DomainValue::Numeric { value, .. } => {
                if !value.is_finite() {
                    return Err(ValueError::NonFinite);
                }
                let min = self.minimum.unwrap_or(f64::NEG_INFINITY);
                let max = self.maximum.unwrap_or(f64::INFINITY);
                if *value < min || *value > max {
                    return Err(ValueError::OutOfRange {
                        min,
                        max,
                        actual: *value,
                    });
                }
                Ok(())
            }
            DomainValue::Text { raw } => {
                if self.options.is_empty() || self.options.iter().any(|o| o == raw) {
                    Ok(())
                } else {
                    Err(ValueError::NotAnOption(raw.clone()))
                }
            }
            DomainValue::Color(color) => {
                HsbColor::new(color.hue(), color.saturation(), color.brightness()).map(|_| ())
            }
            DomainValue::Boolean { .. } => Ok(()),
        }
    }
}

impl Default for ValueDescriptor {
    fn default() -> Self {
        Self {
            on_literal: default_on_literal(),
            off_literal: default_off_literal(),
            inverse: false,
            receive_only: false,
            read_only: false,
            format_pattern: None,
            unit: None,
            minimum: None,
            maximum: None,
            options: Vec::new(),
        }
    }
}

/// How a channel is presented to the control surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ChannelType {
    /// Two-way on/off control.
    Switch,
    /// Read-only open/closed sensor.
    Contact,
    /// Numeric control or reading.
    Number,
    /// Color control.
    Color,
    /// Text control or reading.
    String,
}

impl ChannelType {
    /// Returns the item type name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Switch => "Switch",
            Self::Contact => "Contact",
            Self::Number => "Number",
            Self::Color => "Color",
            Self::String => "String",
        }
    }
}

impl fmt::Display for ChannelType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Presentation hints derived from a descriptor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StateDescription {
    /// Lower bound for sliders.
    pub minimum: Option<f64>,
    /// Upper bound for sliders.
    pub maximum: Option<f64>,
    /// Display pattern.
    pub pattern: Option<String>,
    /// Whether the control accepts user input.
    pub read_only: bool,
    /// Enumerated choices.
    pub options: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_literals() {
        let descriptor = ValueDescriptor::new();
        assert_eq!(descriptor.on_literal(), "ON");
        assert_eq!(descriptor.off_literal(), "OFF");
        assert!(!descriptor.is_inverse());
    }

    #[test]
    fn deserialize_fills_defaults() {
        let descriptor: ValueDescriptor = serde_json::from_str("{}").unwrap();
        assert_eq!(descriptor, ValueDescriptor::default());
    }

    #[test]
    fn deserialize_camel_case_fields() {
        let descriptor: ValueDescriptor = serde_json::from_value(serde_json::json!({
            "receiveOnly": true,
            "formatPattern": "%.1f %unit%",
            "unit": "°C",
            "minimum": -20.0,
            "maximum": 50.0
        }))
        .unwrap();
        assert!(descriptor.is_receive_only());
        assert_eq!(descriptor.format_pattern(), Some("%.1f %unit%"));
        assert_eq!(descriptor.unit(), Some("°C"));
        assert_eq!(descriptor.minimum(), Some(-20.0));
    }

    #[test]
    fn validate_bounds() {
        let descriptor = ValueDescriptor::new().with_bounds(0.0, 100.0);
        assert!(descriptor.validate(&DomainValue::numeric(50.0)).is_ok());
        assert!(matches!(
            descriptor.validate(&DomainValue::numeric(100.5)),
            Err(ValueError::OutOfRange { .. })
        ));
        assert_eq!(
            descriptor.validate(&DomainValue::numeric(f64::NAN)),
            Err(ValueError::NonFinite)
        );
    }

    #[test]
    fn validate_options() {
        let descriptor = ValueDescriptor::new().with_options(["PLAY", "PAUSE"]);
        assert!(descriptor.validate(&DomainValue::text("PLAY")).is_ok());
        assert_eq!(
            descriptor.validate(&DomainValue::text("STOP")),
            Err(ValueError::NotAnOption("STOP".to_string()))
        );
    }

    #[test]
    fn validate_color_components() {
        let descriptor = ValueDescriptor::new();
        assert!(descriptor.validate(&DomainValue::from(HsbColor::white())).is_ok());
        assert_eq!(
            descriptor.validate(&DomainValue::from(HsbColor::clamped(f64::NAN, 0.0, 0.0))),
            Err(ValueError::NonFinite)
        );
    }

    #[test]
    fn validate_refuses_read_only() {
        let sensor = ValueDescriptor::new().receive_only();
        assert_eq!(
            sensor.validate(&DomainValue::boolean(true)),
            Err(ValueError::ReadOnly)
        );

        let locked = ValueDescriptor::new().read_only();
        assert_eq!(
            locked.validate(&DomainValue::from(HsbColor::red())),
            Err(ValueError::ReadOnly)
        );
    }
}
