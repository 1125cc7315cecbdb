// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Channel identifier type.

use std::fmt;
use std::sync::Arc;

/// Identifier of a device channel, e.g. `"living_room:lamp:brightness"`.
///
/// The identifier is cheap to clone: the string is shared behind an `Arc`
/// since it is copied into every pending command and every event.
///
/// # Examples
///
/// ```
/// use chanctl::types::ChannelId;
///
/// let id = ChannelId::new("lamp:power");
/// assert_eq!(id.as_str(), "lamp:power");
/// assert_eq!(id.to_string(), "lamp:power");
/// ```
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize)]
#[serde(from = "String", into = "String")]
pub struct ChannelId(Arc<str>);

impl ChannelId {
    /// Creates a channel identifier.
    #[must_use]
    pub fn new(id: impl AsRef<str>) -> Self {
        Self(Arc::from(id.as_ref()))
    }

    /// Returns the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ChannelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ChannelId({})", self.0)
    }
}

impl fmt::Display for ChannelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ChannelId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for ChannelId {
    fn from(value: String) -> Self {
        Self(Arc::from(value))
    }
}

impl From<ChannelId> for String {
    fn from(value: ChannelId) -> Self {
        value.0.to_string()
    }
}
