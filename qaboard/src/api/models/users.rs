use crate::db::models::users::UserDBResponse;
use crate::types::UserId;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

// Request models
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct AuthRequest {
    /// Hardware address of the device
    #[schema(example = "a4:5e:60:d1:22:9f")]
    pub mac_address: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct RegisterRequest {
    /// Hardware address of the device, 17 characters
    #[schema(example = "a4:5e:60:d1:22:9f")]
    pub mac_address: Option<String>,
    /// Display name shown next to questions and answers
    pub username: Option<String>,
}

// Response models
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct AuthResponse {
    pub username: String,
    /// Current point balance, may be negative
    pub points: i32,
    pub id: UserId,
}

impl From<UserDBResponse> for AuthResponse {
    fn from(db: UserDBResponse) -> Self {
        Self {
            username: db.username,
            points: db.points,
            id: db.id,
        }
    }
}
