//! Database models for users.

use crate::types::{MacAddress, UserId};

/// Database request for registering a new device
#[derive(Debug, Clone)]
pub struct UserCreateDBRequest {
    pub mac_address: MacAddress,
    pub username: String,
    /// Opening balance, taken from the points policy
    pub points: i32,
}

/// Database response for a user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserDBResponse {
    pub id: UserId,
    pub mac_address: MacAddress,
    pub username: String,
    pub points: i32,
}
