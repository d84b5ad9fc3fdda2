//! Game-day resolution.
//!
//! The provider reports start times in UTC, so a Friday-evening game on the
//! US west coast is listed as Saturday morning. Two distinct boundaries keep
//! the service's calendar coherent:
//!
//! - games starting before noon UTC belong to the *previous* game day;
//! - "now" only rolls over to a new game day at 09:00 UTC, so overnight
//!   results still read as last night's slate in the morning.
//!
//! The thresholds are intentionally different; do not unify them.

use time::{
    Date, Duration, OffsetDateTime, error::Parse, format_description::BorrowedFormatItem,
    macros::format_description,
};

/// `YYYY-MM-DD`, the identity of a game day everywhere in the system.
const DAY_FORMAT: &[BorrowedFormatItem<'static>] = format_description!("[year]-[month]-[day]");

/// UTC start hour below which a game is attributed to the previous calendar day.
const GAME_ATTRIBUTION_HOUR: u8 = 12;

/// UTC hour at which the service's own game day rolls over.
const ROLLOVER_HOUR: u8 = 9;

/// Format a calendar date as a day key.
pub fn format_day(date: Date) -> String {
    // The year range of any date the provider can hand us is formattable.
    date.format(DAY_FORMAT).unwrap_or_else(|_| date.to_string())
}

/// Parse a `YYYY-MM-DD` day key back into a calendar date.
pub fn parse_day(day: &str) -> Result<Date, Parse> {
    Date::parse(day, DAY_FORMAT)
}

/// Day key a game belongs to, given its UTC start time.
///
/// Starts before noon UTC are evening games that crossed UTC midnight and are
/// attributed to the previous calendar day.
pub fn game_day_for_start(start: OffsetDateTime) -> String {
    if start.hour() < GAME_ATTRIBUTION_HOUR {
        format_day(start.date() - Duration::days(1))
    } else {
        format_day(start.date())
    }
}

/// Day key "now" belongs to: before 09:00 UTC the previous game day is still
/// the current one.
pub fn current_game_day(now: OffsetDateTime) -> String {
    if now.hour() < ROLLOVER_HOUR {
        format_day(now.date() - Duration::days(1))
    } else {
        format_day(now.date())
    }
}
