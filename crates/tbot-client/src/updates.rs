//! `getUpdates` with retry of server failures.

use std::time::Duration;

use async_trait::async_trait;
use tokio::time::sleep;
use tracing::{debug, warn};

use tbot_core::{
    config::Config,
    ports::{sort_updates, UpdateSource},
    types::Update,
    Method, Result,
};

use crate::transport::Transport;

/// Long-polls `getUpdates`.
///
/// A 5xx is retried with the same offset after `retry_delay`, forever. Every
/// other failure is returned to the caller at once.
#[derive(Clone)]
pub struct UpdateFetcher {
    transport: Transport,
    long_poll_timeout: Duration,
    retry_delay: Duration,
}

impl UpdateFetcher {
    pub fn new(transport: Transport, config: &Config) -> Self {
        Self {
            transport,
            long_poll_timeout: config.long_poll_timeout,
            retry_delay: config.retry_delay,
        }
    }

    async fn fetch_once(&self, offset: Option<i64>) -> Result<Vec<Update>> {
        let mut query = vec![("timeout", self.long_poll_timeout.as_secs().to_string())];
        if let Some(offset) = offset {
            query.push(("offset", offset.to_string()));
        }

        let mut updates = self
            .transport
            .get::<Vec<Update>>(Method::GetUpdates, &query)
            .await?
            .into_result()?;
        sort_updates(&mut updates);
        debug!(?offset, count = updates.len(), "fetched updates");
        Ok(updates)
    }
}

#[async_trait]
impl UpdateSource for UpdateFetcher {
    async fn fetch_updates(&self, offset: Option<i64>) -> Result<Vec<Update>> {
        loop {
            match self.fetch_once(offset).await {
                Err(e) if e.is_retryable() => {
                    warn!(error = %e, retry_in = ?self.retry_delay, "getUpdates failed, retrying");
                    sleep(self.retry_delay).await;
                }
                other => return other,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::time::Instant;
    use tbot_core::Error;
    use wiremock::{
        matchers::{method, path, query_param},
        Mock, MockServer, ResponseTemplate,
    };

    fn fetcher_for(server: &MockServer, retry_delay: Duration) -> UpdateFetcher {
        let mut cfg = Config::new("T").with_api_url(server.uri());
        cfg.retry_delay = retry_delay;
        UpdateFetcher::new(Transport::new(&cfg).unwrap(), &cfg)
    }

    fn batch(ids: &[i64]) -> serde_json::Value {
        let result: Vec<_> = ids.iter().map(|id| json!({"update_id": id})).collect();
        json!({"ok": true, "result": result})
    }

    #[tokio::test]
    async fn first_fetch_has_no_offset_and_batch_is_sorted() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/botT/getUpdates"))
            .and(query_param("timeout", "60"))
            .respond_with(ResponseTemplate::new(200).set_body_json(batch(&[5, 3, 7])))
            .expect(1)
            .mount(&server)
            .await;

        let updates = fetcher_for(&server, Duration::from_secs(5))
            .fetch_updates(None)
            .await
            .unwrap();
        let ids: Vec<i64> = updates.iter().map(|u| u.id).collect();
        assert_eq!(ids, [3, 5, 7]);

        let requests = server.received_requests().await.unwrap();
        assert!(requests[0].url.query_pairs().all(|(k, _)| k != "offset"));
    }

    #[tokio::test]
    async fn server_error_is_retried_with_same_offset() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/botT/getUpdates"))
            .and(query_param("offset", "8"))
            .respond_with(ResponseTemplate::new(503))
            .up_to_n_times(1)
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/botT/getUpdates"))
            .and(query_param("offset", "8"))
            .respond_with(ResponseTemplate::new(200).set_body_json(batch(&[8])))
            .expect(1)
            .mount(&server)
            .await;

        let delay = Duration::from_millis(200);
        let started = Instant::now();
        let updates = fetcher_for(&server, delay)
            .fetch_updates(Some(8))
            .await
            .unwrap();
        assert!(started.elapsed() >= delay);
        assert_eq!(updates.len(), 1);
        assert_eq!(updates[0].id, 8);
    }

    #[tokio::test]
    async fn client_error_is_returned_without_retry() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404).set_body_json(json!({
                "ok": false,
                "error_code": 404,
                "description": "Not Found"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let err = fetcher_for(&server, Duration::from_millis(10))
            .fetch_updates(None)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Api { code: 404, .. }));
    }
}
