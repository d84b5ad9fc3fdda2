use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::dto::validation::validate_day_key;

/// Payload forcing the evaluation pipeline for one game day.
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct EvaluateRequest {
    /// Day key to evaluate.
    #[validate(custom(function = validate_day_key))]
    pub date: String,
}

/// Payload forcing a provider re-fetch for one schedule date.
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct PollRequest {
    /// Schedule date to fetch from the provider.
    #[validate(custom(function = validate_day_key))]
    pub date: String,
}

/// Acknowledgement returned by admin actions.
#[derive(Debug, Serialize, ToSchema)]
pub struct ActionResponse {
    /// The date the action ran against.
    pub date: String,
}
