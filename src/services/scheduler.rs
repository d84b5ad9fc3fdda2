//! Once-daily trigger for the evaluation pipeline.
//!
//! Fires at 09:00 UTC, right at the game-day rollover: last night's games are
//! final, tonight's slate is published, and the previous day can be settled.

use time::{OffsetDateTime, macros::time};
use tokio::time::sleep;
use tracing::info;

use crate::{services::evaluation_service, state::SharedState};

/// UTC time of day the pipeline runs.
const FIRE_AT: time::Time = time!(09:00);

/// Run the daily pipeline forever, sleeping until the next 09:00 UTC.
pub async fn run(state: SharedState) {
    loop {
        let now = state.clock().now();
        let next = next_fire(now);
        let wait = (next - now).try_into().unwrap_or_default();
        info!(next = %next, "daily pipeline scheduled");
        sleep(wait).await;

        evaluation_service::run_daily(&state).await;
    }
}

/// First 09:00 UTC strictly after `now`.
fn next_fire(now: OffsetDateTime) -> OffsetDateTime {
    let today = OffsetDateTime::new_utc(now.date(), FIRE_AT);
    if now < today {
        today
    } else {
        OffsetDateTime::new_utc(now.date() + time::Duration::days(1), FIRE_AT)
    }
}

#[cfg(test)]
mod tests {
    use time::macros::datetime;

    use super::*;

    #[test]
    fn fires_later_today_before_nine() {
        assert_eq!(
            next_fire(datetime!(2020-01-18 03:15 UTC)),
            datetime!(2020-01-18 09:00 UTC)
        );
        assert_eq!(
            next_fire(datetime!(2020-01-18 08:59:59 UTC)),
            datetime!(2020-01-18 09:00 UTC)
        );
    }

    #[test]
    fn fires_tomorrow_from_nine_onwards() {
        assert_eq!(
            next_fire(datetime!(2020-01-18 09:00 UTC)),
            datetime!(2020-01-19 09:00 UTC)
        );
        assert_eq!(
            next_fire(datetime!(2020-01-18 22:00 UTC)),
            datetime!(2020-01-19 09:00 UTC)
        );
    }

    #[test]
    fn rolls_across_month_boundaries() {
        assert_eq!(
            next_fire(datetime!(2020-01-31 10:00 UTC)),
            datetime!(2020-02-01 09:00 UTC)
        );
    }
}
