use std::time::Duration;

use common::{Config, TrendError, TrendResult};
use reqwest::Client;
use time::Date;
use tracing::info;

use crate::models::{ResponsePayload, ResponsesRequest};

const RESPONSES_PATH: &str = "/v1/responses";

#[derive(Clone)]
pub struct XaiClient {
    http_client: Client,
    api_key: String,
    base_url: String,
    model: String,
}

impl XaiClient {
    pub fn new(api_key: &str, base_url: &str, model: &str, timeout: Duration) -> TrendResult<Self> {
        let http_client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http_client,
            api_key: api_key.to_string(),
            base_url: base_url.trim_end_matches('/').to_string(),
            model: model.to_string(),
        })
    }

    pub fn from_config(config: &Config) -> TrendResult<Self> {
        let api_key = config.require_xai_api_key()?;
        Self::new(
            api_key,
            &config.xai.base_url,
            &config.xai.model,
            config.xai.timeout,
        )
    }

    pub async fn fetch_trend_digest(&self, date: Date) -> TrendResult<String> {
        let url = format!("{}{}", self.base_url, RESPONSES_PATH);
        let body = ResponsesRequest::trend_digest(&self.model, &date.to_string());

        info!("Requesting trend digest from xAI ({}) for {}", self.model, date);

        let res = self
            .http_client
            .post(&url)
            .header("Content-Type", "application/json")
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&body)
            .send()
            .await?;

        let status = res.status();
        let text = res.text().await?;
        if !status.is_success() {
            return Err(TrendError::Status {
                status: status.as_u16(),
                body: text,
            });
        }

        let payload: ResponsePayload = serde_json::from_str(&text)?;
        payload.into_text()
    }
}
