//! HTTP provider client.
//!
//! The upstream API is date-addressed: `GET {base_url}{date}` with the
//! account key in the `x-rapidapi-key` header.

use std::sync::Arc;

use futures::future::BoxFuture;
use reqwest::Client;

use super::{ProviderClient, ProviderError, ProviderResult, models::ScheduleResponse};

const API_KEY_HEADER: &str = "x-rapidapi-key";

/// Live client talking to the hosted schedule API.
#[derive(Clone)]
pub struct RapidApiClient {
    client: Client,
    base_url: Arc<str>,
    api_key: Arc<str>,
}

impl RapidApiClient {
    /// Build a client for the given base URL and account key.
    pub fn new(base_url: &str, api_key: &str) -> ProviderResult<Self> {
        let client = Client::builder()
            .build()
            .map_err(|source| ProviderError::ClientBuilder { source })?;

        Ok(Self {
            client,
            base_url: Arc::from(base_url),
            api_key: Arc::from(api_key),
        })
    }

    async fn fetch(&self, date: String) -> ProviderResult<ScheduleResponse> {
        let url = format!("{}{}", self.base_url, date);
        let response = self
            .client
            .get(url)
            .header(API_KEY_HEADER, self.api_key.as_ref())
            .send()
            .await
            .map_err(|source| ProviderError::RequestSend {
                date: date.clone(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(ProviderError::RequestStatus { date, status });
        }

        response
            .json::<ScheduleResponse>()
            .await
            .map_err(|source| ProviderError::DecodeResponse { date, source })
    }
}

impl ProviderClient for RapidApiClient {
    fn games_by_date(&self, date: &str) -> BoxFuture<'static, ProviderResult<ScheduleResponse>> {
        let client = self.clone();
        let date = date.to_owned();
        Box::pin(async move { client.fetch(date).await })
    }
}
