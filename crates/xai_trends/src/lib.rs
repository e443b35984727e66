pub mod client;
pub mod models;
pub mod slot;
pub mod store;

use async_trait::async_trait;
use common::{Config, CycleOutcome, ScheduledTask, TrendResult};
use time::OffsetDateTime;
use tracing::info;

pub use client::XaiClient;
pub use slot::{Slot, SlotKey};
pub use store::{TrendEntry, TrendStore};

pub struct XaiTrendFetcher {
    client: XaiClient,
    store: TrendStore,
}

impl XaiTrendFetcher {
    pub fn new(client: XaiClient, store: TrendStore) -> Self {
        Self { client, store }
    }

    pub async fn from_config(config: &Config) -> TrendResult<Self> {
        let client = XaiClient::from_config(config)?;
        let store = TrendStore::connect(&config.database_url).await?;
        Ok(Self::new(client, store))
    }

    pub fn store(&self) -> &TrendStore {
        &self.store
    }

    /// The upsert is the only write and comes last; a failed cycle leaves the
    /// store untouched.
    pub async fn run_cycle(&self, trigger: OffsetDateTime) -> TrendResult<CycleOutcome> {
        let key = SlotKey::from_trigger(trigger);

        if self.store.exists(&key).await? {
            info!("Trend entry for {} already recorded; skipping", key);
            return Ok(CycleOutcome::Skipped);
        }

        let raw_response = self.client.fetch_trend_digest(key.date).await?;

        let entry = TrendEntry {
            key,
            raw_response,
            fetched_at: OffsetDateTime::now_utc(),
        };
        self.store.upsert(&entry).await?;
        info!(
            "Recorded trend entry for {} ({} bytes)",
            key,
            entry.raw_response.len()
        );
        Ok(CycleOutcome::Recorded)
    }
}

#[async_trait]
impl ScheduledTask for XaiTrendFetcher {
    async fn run_cycle(&self, trigger: OffsetDateTime) -> TrendResult<CycleOutcome> {
        XaiTrendFetcher::run_cycle(self, trigger).await
    }

    fn name(&self) -> &'static str {
        "xAI trends"
    }
}

pub async fn run_xai_trends(config: &Config) -> anyhow::Result<CycleOutcome> {
    let fetcher = XaiTrendFetcher::from_config(config).await?;
    let outcome = fetcher.run_cycle(OffsetDateTime::now_utc()).await?;
    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::tests::memory_store;
    use common::TrendError;
    use serde_json::json;
    use std::time::Duration;
    use time::macros::{date, datetime};
    use wiremock::matchers::{body_partial_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn fetcher_for(server: &MockServer) -> XaiTrendFetcher {
        let client =
            XaiClient::new("test-key", &server.uri(), "grok-test", Duration::from_secs(5)).unwrap();
        XaiTrendFetcher::new(client, memory_store().await)
    }

    async fn mount_digest(server: &MockServer, text: &str) {
        Mock::given(method("POST"))
            .and(path("/v1/responses"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "output": [{"content": [{"type": "output_text", "text": text}]}]
            })))
            .up_to_n_times(1)
            .mount(server)
            .await;
    }

    #[tokio::test]
    async fn test_records_new_slot() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/responses"))
            .and(body_partial_json(json!({
                "tools": [{"type": "x_search", "from_date": "2024-03-01", "to_date": "2024-03-01"}]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"output_text": "Hello"})))
            .expect(1)
            .mount(&server)
            .await;

        let fetcher = fetcher_for(&server).await;
        let started = OffsetDateTime::now_utc();
        let outcome = fetcher.run_cycle(datetime!(2024-03-01 02:00 UTC)).await.unwrap();
        assert_eq!(outcome, CycleOutcome::Recorded);

        let key = SlotKey::new(date!(2024-03-01), Slot::Morning);
        assert_eq!(fetcher.store().count().await.unwrap(), 1);
        let stored = fetcher.store().get(&key).await.unwrap().unwrap();
        assert_eq!(stored.raw_response, "Hello");
        assert!(stored.fetched_at >= started - time::Duration::seconds(1));
    }

    #[tokio::test]
    async fn test_existing_slot_skips_request() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"output_text": "new"})))
            .expect(0)
            .mount(&server)
            .await;

        let fetcher = fetcher_for(&server).await;
        let key = SlotKey::new(date!(2024-03-01), Slot::Afternoon);
        let existing = TrendEntry {
            key,
            raw_response: "old".to_string(),
            fetched_at: datetime!(2024-03-01 04:00 UTC),
        };
        fetcher.store().upsert(&existing).await.unwrap();

        let outcome = fetcher.run_cycle(datetime!(2024-03-01 05:00 UTC)).await.unwrap();
        assert_eq!(outcome, CycleOutcome::Skipped);
        assert_eq!(fetcher.store().get(&key).await.unwrap().unwrap(), existing);
        assert_eq!(fetcher.store().count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_second_cycle_same_slot_is_skipped() {
        let server = MockServer::start().await;
        mount_digest(&server, "first").await;

        let fetcher = fetcher_for(&server).await;
        let first = fetcher.run_cycle(datetime!(2024-03-01 00:00 UTC)).await.unwrap();
        let second = fetcher.run_cycle(datetime!(2024-03-01 02:30 UTC)).await.unwrap();

        assert_eq!(first, CycleOutcome::Recorded);
        assert_eq!(second, CycleOutcome::Skipped);
        assert_eq!(server.received_requests().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_each_half_day_is_recorded_separately() {
        let server = MockServer::start().await;
        mount_digest(&server, "morning").await;
        mount_digest(&server, "afternoon").await;

        let fetcher = fetcher_for(&server).await;
        fetcher.run_cycle(datetime!(2024-03-01 02:00 UTC)).await.unwrap();
        fetcher.run_cycle(datetime!(2024-03-01 05:00 UTC)).await.unwrap();

        assert_eq!(fetcher.store().count().await.unwrap(), 2);
        let morning = SlotKey::new(date!(2024-03-01), Slot::Morning);
        let afternoon = SlotKey::new(date!(2024-03-01), Slot::Afternoon);
        assert!(fetcher.store().exists(&morning).await.unwrap());
        assert!(fetcher.store().exists(&afternoon).await.unwrap());
    }

    #[tokio::test]
    async fn test_failed_cycle_writes_nothing() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/responses"))
            .respond_with(ResponseTemplate::new(500).set_body_string("upstream exploded"))
            .expect(1)
            .mount(&server)
            .await;

        let fetcher = fetcher_for(&server).await;
        let err = fetcher
            .run_cycle(datetime!(2024-03-01 02:00 UTC))
            .await
            .unwrap_err();
        assert!(matches!(err, TrendError::Status { status: 500, .. }));
        assert!(err.to_string().contains("upstream exploded"));
        assert_eq!(fetcher.store().count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_empty_extraction_writes_nothing() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/responses"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"output_text": ""})))
            .mount(&server)
            .await;

        let fetcher = fetcher_for(&server).await;
        let err = fetcher
            .run_cycle(datetime!(2024-03-01 02:00 UTC))
            .await
            .unwrap_err();
        assert!(matches!(err, TrendError::EmptyResponse));
        assert_eq!(fetcher.store().count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_store_failure_is_terminal() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"output_text": "x"})))
            .expect(0)
            .mount(&server)
            .await;

        let fetcher = fetcher_for(&server).await;
        sqlx::query("DROP TABLE trend_entries")
            .execute(fetcher.store().pool())
            .await
            .unwrap();

        let err = fetcher
            .run_cycle(datetime!(2024-03-01 02:00 UTC))
            .await
            .unwrap_err();
        assert!(matches!(err, TrendError::Storage(_)));
    }

    #[tokio::test]
    async fn test_usable_as_scheduled_task() {
        let server = MockServer::start().await;
        mount_digest(&server, "via trait").await;

        let task: Box<dyn ScheduledTask> = Box::new(fetcher_for(&server).await);
        assert_eq!(task.name(), "xAI trends");
        let outcome = task.run_cycle(datetime!(2024-03-01 02:00 UTC)).await.unwrap();
        assert_eq!(outcome, CycleOutcome::Recorded);
    }
}
