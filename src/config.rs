// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Timing and session configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Default debounce window for coalescing slider input.
pub const DEFAULT_DEBOUNCE_WINDOW: Duration = Duration::from_millis(300);

/// Default press duration separating a tap from a hold.
pub const DEFAULT_HOLD_THRESHOLD: Duration = Duration::from_millis(300);

/// Default capacity of the session event bus.
pub const DEFAULT_EVENT_CAPACITY: usize = 256;

/// Timer settings for command coalescing and gesture handling.
///
/// Durations are (de)serialized as whole milliseconds.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use chanctl::config::TimingConfig;
///
/// let timing = TimingConfig::default().with_debounce_window(Duration::from_millis(150));
/// assert_eq!(timing.debounce_window, Duration::from_millis(150));
/// assert_eq!(timing.hold_threshold, Duration::from_millis(300));
///
/// let parsed: TimingConfig = serde_json::from_str(r#"{ "holdThresholdMs": 500 }"#).unwrap();
/// assert_eq!(parsed.hold_threshold, Duration::from_millis(500));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimingConfig {
    /// How long submissions are collected before one command is sent.
    #[serde(rename = "debounceWindowMs", with = "millis", default = "default_debounce")]
    pub debounce_window: Duration,
    /// How long a press must last to count as a hold.
    #[serde(rename = "holdThresholdMs", with = "millis", default = "default_hold")]
    pub hold_threshold: Duration,
}

fn default_debounce() -> Duration {
    DEFAULT_DEBOUNCE_WINDOW
}

fn default_hold() -> Duration {
    DEFAULT_HOLD_THRESHOLD
}

impl TimingConfig {
    /// Sets the debounce window.
    #[must_use]
    pub fn with_debounce_window(mut self, window: Duration) -> Self {
        self.debounce_window = window;
        self
    }

    /// Sets the hold threshold.
    #[must_use]
    pub fn with_hold_threshold(mut self, threshold: Duration) -> Self {
        self.hold_threshold = threshold;
        self
    }
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            debounce_window: DEFAULT_DEBOUNCE_WINDOW,
            hold_threshold: DEFAULT_HOLD_THRESHOLD,
        }
    }
}

/// Configuration of a [`Session`](crate::session::Session).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionConfig {
    /// Timer settings.
    #[serde(default)]
    pub timing: TimingConfig,
    /// Number of events buffered per subscriber.
    #[serde(default = "default_capacity")]
    pub event_capacity: usize,
}

fn default_capacity() -> usize {
    DEFAULT_EVENT_CAPACITY
}

impl SessionConfig {
    /// Parses a configuration from JSON. Missing fields take their defaults.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`](crate::error::Error::Config) if the
    /// document is not valid JSON or a field has the wrong type.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::time::Duration;
    /// use chanctl::config::SessionConfig;
    ///
    /// let config = SessionConfig::from_json(r#"{ "timing": { "debounceWindowMs": 100 } }"#)?;
    /// assert_eq!(config.timing.debounce_window, Duration::from_millis(100));
    /// assert_eq!(config.event_capacity, 256);
    /// # Ok::<(), chanctl::Error>(())
    /// ```
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Sets the timer settings.
    #[must_use]
    pub fn with_timing(mut self, timing: TimingConfig) -> Self {
        self.timing = timing;
        self
    }

    /// Sets the event bus capacity.
    #[must_use]
    pub fn with_event_capacity(mut self, capacity: usize) -> Self {
        self.event_capacity = capacity;
        self
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            timing: TimingConfig::default(),
            event_capacity: DEFAULT_EVENT_CAPACITY,
        }
    }
}

mod millis {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub(super) fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(u64::try_from(value.as_millis()).unwrap_or(u64::MAX))
    }

    pub(super) fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        u64::deserialize(deserializer).map(Duration::from_millis)
    }
}
