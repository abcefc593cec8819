use crate::state::messages::NetworkResponse;
use log::{debug, error, warn};
use rps_api::HistoryPage;
use rps_api::client::{ApiError, ApiResult, RpsApi};
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::sleep;

#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    /// Pause between successful page fetches.
    pub page_delay: Duration,
    /// Retries per cursor before the chain is abandoned.
    pub max_retries: u32,
    /// First retry wait; doubles on every further attempt.
    pub backoff: Duration,
}

impl RetryPolicy {
    pub fn backoff_for(&self, attempt: u32) -> Duration {
        self.backoff.saturating_mul(1u32 << attempt.min(16))
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct HistorySummary {
    pub pages: usize,
    pub games: usize,
}

/// Follows the history cursor chain, forwarding each page to the UI loop,
/// which owns the index and merges it there.
pub struct HistoryLoader {
    client: RpsApi,
    responses: mpsc::Sender<NetworkResponse>,
    policy: RetryPolicy,
}

impl HistoryLoader {
    pub fn new(client: RpsApi, responses: mpsc::Sender<NetworkResponse>, policy: RetryPolicy) -> Self {
        Self { client, responses, policy }
    }

    /// Fetch pages until the server hands back a null cursor. A cursor that
    /// still fails after `max_retries` retries ends the chain with its error.
    pub async fn run(&self, start: &str) -> ApiResult<HistorySummary> {
        let mut summary = HistorySummary::default();
        let mut cursor = Some(start.to_string());

        while let Some(current) = cursor.take() {
            let page = self.fetch_with_retry(&current).await?;
            summary.pages += 1;
            summary.games += page.games.len();
            debug!("history page {} from {current}: {} games", summary.pages, page.games.len());

            self.responses
                .send(NetworkResponse::HistoryPageLoaded { games: page.games })
                .await
                .map_err(|e| ApiError::Other(format!("history response channel closed: {e}")))?;

            cursor = page.cursor;
            if cursor.is_some() {
                sleep(self.policy.page_delay).await;
            }
        }

        Ok(summary)
    }

    async fn fetch_with_retry(&self, cursor: &str) -> ApiResult<HistoryPage> {
        let mut attempt = 0;
        loop {
            match self.client.fetch_history_page(cursor).await {
                Ok(page) => return Ok(page),
                Err(e) if attempt < self.policy.max_retries => {
                    let wait = self.policy.backoff_for(attempt);
                    attempt += 1;
                    warn!("history fetch failed ({attempt}/{}): {e}; retrying in {wait:?}", self.policy.max_retries);
                    sleep(wait).await;
                }
                Err(e) => {
                    error!("giving up on history at {cursor}: {e}");
                    return Err(e);
                }
            }
        }
    }
}
