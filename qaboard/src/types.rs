//! Common type definitions.
//!
//! # ID Types
//!
//! All entity IDs are serial integer keys wrapped in type aliases:
//!
//! - [`UserId`]: registered device / user identifier
//! - [`QuestionId`]: question identifier
//! - [`AnswerId`]: answer identifier
//!
//! # Hardware addresses
//!
//! [`MacAddress`] is the only identity key the board knows about. It is normalised to lowercase
//! on construction, so every lookup and insert sees the same form regardless of how the client
//! spelled it.

use serde::{Deserialize, Serialize};
use std::fmt;

// Type aliases for IDs
pub type UserId = i32;
pub type QuestionId = i32;
pub type AnswerId = i32;

/// Length of a colon separated hardware address, e.g. `a4:5e:60:d1:22:9f`
pub const MAC_ADDRESS_LEN: usize = 17;

/// A device hardware address, always stored lowercased.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct MacAddress(String);

impl MacAddress {
    pub fn new(raw: &str) -> Self {
        Self(raw.trim().to_lowercase())
    }

    /// Registration only accepts addresses of the canonical length. Lookups don't check this:
    /// an address that could never have been registered simply isn't found.
    pub fn is_well_formed(&self) -> bool {
        self.0.chars().count() == MAC_ADDRESS_LEN
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for MacAddress {
    fn from(raw: String) -> Self {
        Self::new(&raw)
    }
}

impl From<MacAddress> for String {
    fn from(address: MacAddress) -> Self {
        address.0
    }
}

impl fmt::Display for MacAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
