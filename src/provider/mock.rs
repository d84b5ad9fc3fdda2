//! Canned-response provider client.
//!
//! Serves pre-loaded schedules keyed by date, so the evaluation pipeline can
//! run without a network — in tests, and in local setups replaying recorded
//! days.

use std::{collections::HashMap, sync::Arc};

use futures::future::BoxFuture;

use super::{ProviderClient, ProviderError, ProviderResult, models::ScheduleResponse};

/// Provider double returning fixed responses per date.
#[derive(Clone, Default)]
pub struct MockProviderClient {
    responses: Arc<std::sync::RwLock<HashMap<String, ScheduleResponse>>>,
}

impl MockProviderClient {
    /// Empty mock; every date misses until loaded.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load or replace the canned response for a date.
    pub fn set_response(&self, date: &str, response: ScheduleResponse) {
        if let Ok(mut guard) = self.responses.write() {
            guard.insert(date.to_owned(), response);
        }
    }

    /// Drop the canned response for a date, making later fetches fail.
    pub fn clear_response(&self, date: &str) {
        if let Ok(mut guard) = self.responses.write() {
            guard.remove(date);
        }
    }
}

impl ProviderClient for MockProviderClient {
    fn games_by_date(&self, date: &str) -> BoxFuture<'static, ProviderResult<ScheduleResponse>> {
        let responses = self.responses.clone();
        let date = date.to_owned();
        Box::pin(async move {
            let guard = responses
                .read()
                .map_err(|_| ProviderError::MissingFixture { date: date.clone() })?;
            guard
                .get(&date)
                .cloned()
                .ok_or(ProviderError::MissingFixture { date })
        })
    }
}
