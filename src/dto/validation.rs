use validator::ValidationError;

use crate::gameday;

/// Validate a `YYYY-MM-DD` day key supplied by a client.
pub fn validate_day_key(value: &str) -> Result<(), ValidationError> {
    gameday::parse_day(value).map(|_| ()).map_err(|_| {
        ValidationError::new("day_key").with_message("expected a YYYY-MM-DD date".into())
    })
}
