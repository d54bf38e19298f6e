//! PolyRouter REST client.
//!
//! PolyRouter aggregates listings from every supported venue behind one
//! API, so a single client covers all platforms.

use std::time::Duration;

use reqwest::Client;
use serde::de::DeserializeOwned;
use tokio::time::sleep;
use tracing::{debug, warn};

use crate::types::ApiConfig;

use super::raw::{
    EventsResponse, GamesEnvelope, GamesResponse, MarketsResponse, RawEvent, RawGame, RawMarket,
    RawSeries, SeriesResponse,
};
use super::{
    ClientError, ClientResult, EventQuery, GamesQuery, MarketQuery, MarketSource, SeriesQuery,
};

const API_KEY_HEADER: &str = "X-API-Key";

pub struct PolyRouterClient {
    http: Client,
    base_url: String,
    api_key: String,
    max_retries: u32,
}

impl PolyRouterClient {
    pub fn new(config: &ApiConfig) -> ClientResult<Self> {
        if config.base_url.trim().is_empty() {
            return Err(ClientError::Config("api.base_url must not be empty".to_string()));
        }
        if config.api_key.is_empty() {
            warn!(target: "client", "POLYROUTER_API_KEY is not set; requests will likely be rejected");
        }

        let http = Client::builder()
            .user_agent("polymatch/0.1")
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(ClientError::Http)?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
            max_retries: config.max_retries,
        })
    }

    fn build_url(&self, endpoint: &str) -> String {
        format!("{}/{}", self.base_url, endpoint.trim_start_matches('/'))
    }

    fn backoff(attempt: u32) -> Duration {
        let capped = attempt.min(5);
        let millis = 500 * (1_u64 << capped);
        Duration::from_millis(millis.min(8_000))
    }

    async fn get<TResp>(&self, endpoint: &str, params: &[(&str, String)]) -> ClientResult<TResp>
    where
        TResp: DeserializeOwned,
    {
        let url = self.build_url(endpoint);
        let mut attempt = 0;
        loop {
            debug!(target: "client", %url, attempt, "GET");
            let req = self
                .http
                .get(&url)
                .header(API_KEY_HEADER, &self.api_key)
                .query(params);

            match req.send().await {
                Ok(resp) => {
                    if resp.status().is_success() {
                        let parsed = resp.json::<TResp>().await?;
                        return Ok(parsed);
                    }

                    if resp.status().is_server_error() && attempt < self.max_retries {
                        attempt += 1;
                        warn!(target: "client", status = %resp.status(), attempt, "server error, retrying");
                        sleep(Self::backoff(attempt)).await;
                        continue;
                    }

                    let status = resp.status();
                    let body = resp.text().await.unwrap_or_default();
                    return Err(ClientError::HttpStatus { status, body });
                }
                Err(err) => {
                    if attempt < self.max_retries {
                        attempt += 1;
                        warn!(target: "client", error = %err, attempt, "request failed, retrying");
                        sleep(Self::backoff(attempt)).await;
                        continue;
                    }

                    return Err(ClientError::Http(err));
                }
            }
        }
    }

    pub async fn get_markets(&self, query: &MarketQuery) -> ClientResult<MarketsResponse> {
        self.get("markets", &query.to_params()).await
    }

    pub async fn get_events(&self, query: &EventQuery) -> ClientResult<EventsResponse> {
        self.get("events", &query.to_params()).await
    }

    pub async fn get_series(&self, query: &SeriesQuery) -> ClientResult<SeriesResponse> {
        self.get("series", &query.to_params()).await
    }

    pub async fn get_games(&self, query: &GamesQuery) -> ClientResult<GamesResponse> {
        let envelope: GamesEnvelope = self.get("list-games", &query.to_params()).await?;
        Ok(envelope.into())
    }
}

impl MarketSource for PolyRouterClient {
    async fn markets(&self, query: &MarketQuery) -> ClientResult<Vec<RawMarket>> {
        Ok(self.get_markets(query).await?.markets)
    }

    async fn events(&self, query: &EventQuery) -> ClientResult<Vec<RawEvent>> {
        Ok(self.get_events(query).await?.events)
    }

    async fn series(&self, query: &SeriesQuery) -> ClientResult<Vec<RawSeries>> {
        Ok(self.get_series(query).await?.series)
    }

    async fn games(&self, query: &GamesQuery) -> ClientResult<Vec<RawGame>> {
        Ok(self.get_games(query).await?.games)
    }
}
