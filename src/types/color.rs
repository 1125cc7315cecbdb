// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! HSB color type for color light channels.

use std::fmt;

use crate::error::ValueError;

/// HSB color representation (Hue, Saturation, Brightness).
///
/// Components are kept as `f64` because slider input is continuous. They are
/// only rounded when the color is put on the wire, see
/// [`HsbColor::to_command_string`].
///
/// # Examples
///
/// ```
/// use chanctl::types::HsbColor;
///
/// let color = HsbColor::new(120.0, 100.0, 75.5).unwrap();
/// assert_eq!(color.hue(), 120.0);
///
/// // Components are rounded up on the wire
/// assert_eq!(color.to_command_string(), "120,100,76");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "RawHsb")]
pub struct HsbColor {
    hue: f64,
    saturation: f64,
    brightness: f64,
}

impl HsbColor {
    /// Maximum hue value (wraps at 360).
    pub const MAX_HUE: f64 = 360.0;

    /// Maximum saturation value.
    pub const MAX_SATURATION: f64 = 100.0;

    /// Maximum brightness value.
    pub const MAX_BRIGHTNESS: f64 = 100.0;

    /// Creates a new HSB color.
    ///
    /// # Arguments
    ///
    /// * `hue` - Color hue (0-360 degrees, where 0/360 is red)
    /// * `saturation` - Color saturation (0-100%)
    /// * `brightness` - Color brightness (0-100%)
    ///
    /// # Errors
    ///
    /// Returns error if any value is not finite or outside its valid range.
    pub fn new(hue: f64, saturation: f64, brightness: f64) -> Result<Self, ValueError> {
        if !(hue.is_finite() && saturation.is_finite() && brightness.is_finite()) {
            return Err(ValueError::NonFinite);
        }
        if !(0.0..=Self::MAX_HUE).contains(&hue) {
            return Err(ValueError::InvalidHue(hue));
        }
        if !(0.0..=Self::MAX_SATURATION).contains(&saturation) {
            return Err(ValueError::InvalidSaturation(saturation));
        }
        if !(0.0..=Self::MAX_BRIGHTNESS).contains(&brightness) {
            return Err(ValueError::InvalidBrightness(brightness));
        }
        Ok(Self {
            hue,
            saturation,
            brightness,
        })
    }

    /// Creates a color, clamping every component into its valid range.
    ///
    /// Callers must pass finite components.
    #[must_use]
    pub fn clamped(hue: f64, saturation: f64, brightness: f64) -> Self {
        Self {
            hue: hue.clamp(0.0, Self::MAX_HUE),
            saturation: saturation.clamp(0.0, Self::MAX_SATURATION),
            brightness: brightness.clamp(0.0, Self::MAX_BRIGHTNESS),
        }
    }

    /// All components at zero, the state of an uninitialized device.
    #[must_use]
    pub const fn zero() -> Self {
        Self {
            hue: 0.0,
            saturation: 0.0,
            brightness: 0.0,
        }
    }

    /// Creates a pure red color at full brightness.
    #[must_use]
    pub const fn red() -> Self {
        Self {
            hue: 0.0,
            saturation: 100.0,
            brightness: 100.0,
        }
    }

    /// Creates a white color (no saturation).
    #[must_use]
    pub const fn white() -> Self {
        Self {
            hue: 0.0,
            saturation: 0.0,
            brightness: 100.0,
        }
    }

    /// Returns the hue value (0-360).
    #[must_use]
    pub const fn hue(&self) -> f64 {
        self.hue
    }

    /// Returns the saturation value (0-100).
    #[must_use]
    pub const fn saturation(&self) -> f64 {
        self.saturation
    }

    /// Returns the brightness value (0-100).
    #[must_use]
    pub const fn brightness(&self) -> f64 {
        self.brightness
    }

    /// Returns the color as a wire string.
    ///
    /// Each component is rounded up, so `99.1` is sent as `100`.
    #[must_use]
    pub fn to_command_string(&self) -> String {
        format!(
            "{:.0},{:.0},{:.0}",
            self.hue.ceil(),
            self.saturation.ceil(),
            self.brightness.ceil()
        )
    }

    /// Creates a new color with a different brightness.
    ///
    /// # Errors
    ///
    /// Returns error if brightness is outside [0, 100].
    pub fn with_brightness(&self, brightness: f64) -> Result<Self, ValueError> {
        Self::new(self.hue, self.saturation, brightness)
    }
}

/// Unchecked components as they arrive from JSON.
#[derive(serde::Deserialize)]
struct RawHsb {
    hue: f64,
    saturation: f64,
    brightness: f64,
}

impl TryFrom<RawHsb> for HsbColor {
    type Error = ValueError;

    fn try_from(raw: RawHsb) -> Result<Self, Self::Error> {
        Self::new(raw.hue, raw.saturation, raw.brightness)
    }
}

impl Default for HsbColor {
    fn default() -> Self {
        Self::zero()
    }
}

impl fmt::Display for HsbColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{},{}", self.hue, self.saturation, self.brightness)
    }
}
