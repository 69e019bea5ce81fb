//! HTTP API response DTOs.

use serde::{Deserialize, Serialize};

use crate::domain::RoomSummary;

/// One live room and its member count, as returned by `GET /api/rooms`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomSummaryDto {
    pub id: String,
    pub user_count: usize,
}

impl From<RoomSummary> for RoomSummaryDto {
    fn from(summary: RoomSummary) -> Self {
        Self {
            id: summary.id.into_string(),
            user_count: summary.size,
        }
    }
}
