//! Client boundary to the external sports-data provider.
//!
//! The provider serves one calendar date per request, so callers needing a
//! full game night fetch the dates on either side of UTC midnight. Everything
//! behind [`ProviderClient`] is swappable; tests use [`mock::MockProviderClient`].

/// Canned-response client for tests and offline development.
pub mod mock;
/// Wire types for the provider's response envelope.
pub mod models;
/// HTTP implementation of the provider client.
pub mod rapid;

use futures::future::BoxFuture;
use thiserror::Error;

use self::models::ScheduleResponse;

/// Result alias for provider calls.
pub type ProviderResult<T> = Result<T, ProviderError>;

/// Failure while fetching or interpreting provider data.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// The HTTP client could not be constructed.
    #[error("failed to build provider HTTP client")]
    ClientBuilder {
        /// Builder failure.
        #[source]
        source: reqwest::Error,
    },
    /// The request never completed.
    #[error("provider request for date `{date}` failed")]
    RequestSend {
        /// Requested schedule date.
        date: String,
        /// Transport failure.
        #[source]
        source: reqwest::Error,
    },
    /// The provider answered with a non-success status.
    #[error("provider returned status {status} for date `{date}`")]
    RequestStatus {
        /// Requested schedule date.
        date: String,
        /// HTTP status received.
        status: reqwest::StatusCode,
    },
    /// The response body did not match the expected envelope.
    #[error("failed to decode provider response for date `{date}`")]
    DecodeResponse {
        /// Requested schedule date.
        date: String,
        /// Decode failure.
        #[source]
        source: reqwest::Error,
    },
    /// A numeric field in a game payload did not parse.
    #[error("malformed {field} `{value}` in provider game `{game_id}`")]
    MalformedField {
        /// Provider's game id, as received.
        game_id: String,
        /// Which field failed to parse.
        field: &'static str,
        /// The offending raw value.
        value: String,
    },
    /// The mock client has no fixture for the requested date.
    #[error("no canned response for date `{date}`")]
    MissingFixture {
        /// Requested schedule date.
        date: String,
    },
}

/// Fetches the raw schedule for a single calendar date.
pub trait ProviderClient: Send + Sync {
    /// All games the provider lists for the given `YYYY-MM-DD` date.
    fn games_by_date(&self, date: &str) -> BoxFuture<'static, ProviderResult<ScheduleResponse>>;
}
