use crate::types::{AnswerId, UserId};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Reward the author of an answer. The response body is the answer's new tip count.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct TipCreate {
    /// User paying the tip
    pub tip_source: Option<UserId>,
    /// User receiving the tip
    pub tip_destination: Option<UserId>,
    /// Answer being rewarded
    pub answer_id: Option<AnswerId>,
}
