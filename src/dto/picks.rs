use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::{
    dao::models::{PickEntity, PickSetEntity, PickStatus},
    dto::validation::validate_day_key,
};

/// Payload submitting a user's picks for one game day.
#[derive(Debug, Deserialize, ToSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SubmitPicksRequest {
    /// Day key the picks apply to.
    #[validate(custom(function = validate_day_key))]
    pub game_day_id: String,
    /// Selected winning team per game id. Games left out are stored as
    /// unselected picks.
    #[serde(default)]
    pub picks: IndexMap<i64, i64>,
}

/// One stored pick as exposed to clients.
#[derive(Debug, Clone, Copy, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PickDto {
    /// Team picked to win, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub selection_id: Option<i64>,
    /// PENDING until evaluation, then CORRECT or INCORRECT.
    pub status: PickStatus,
}

impl From<PickEntity> for PickDto {
    fn from(value: PickEntity) -> Self {
        Self {
            selection_id: value.selection_id,
            status: value.status,
        }
    }
}

/// A user's stored pick set for one game day.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PickSetDto {
    /// Synthetic pick-set id.
    pub id: Uuid,
    /// Owning user.
    pub user_id: i64,
    /// Day key the picks apply to.
    pub game_day_id: String,
    /// One entry per game in the day's report.
    pub picks: IndexMap<i64, PickDto>,
    /// Whether this set has been scored.
    pub evaluated: bool,
    /// Count of correct picks.
    pub score: i64,
    /// Submission time.
    #[serde(with = "time::serde::rfc3339")]
    #[schema(value_type = String)]
    pub submitted_at: OffsetDateTime,
}

impl From<PickSetEntity> for PickSetDto {
    fn from(value: PickSetEntity) -> Self {
        Self {
            id: value.id,
            user_id: value.user_id,
            game_day_id: value.game_day_id,
            picks: value
                .picks
                .into_iter()
                .map(|(id, pick)| (id, pick.into()))
                .collect(),
            evaluated: value.evaluated,
            score: value.score,
            submitted_at: value.submitted_at,
        }
    }
}
