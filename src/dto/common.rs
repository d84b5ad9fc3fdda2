use serde::Serialize;
use time::OffsetDateTime;
use utoipa::ToSchema;

/// Response envelope wrapping every payload the API returns.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ApiEnvelope<T: Serialize> {
    /// HTTP status code echoed in the body.
    pub code: u16,
    /// Payload, present on success.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    /// Human-readable reason, present on failure.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// When this response was produced.
    #[serde(with = "time::serde::rfc3339")]
    #[schema(value_type = String)]
    pub created_at: OffsetDateTime,
}

impl<T: Serialize> ApiEnvelope<T> {
    /// Successful 200 envelope around `data`.
    pub fn ok(data: T) -> Self {
        Self {
            code: 200,
            data: Some(data),
            error: None,
            created_at: OffsetDateTime::now_utc(),
        }
    }

    /// Failure envelope carrying the reason.
    pub fn error(code: u16, message: String) -> Self {
        Self {
            code,
            data: None,
            error: Some(message),
            created_at: OffsetDateTime::now_utc(),
        }
    }
}
