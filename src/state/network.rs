use crate::state::app_settings::AppSettings;
use crate::state::history::{HistoryLoader, RetryPolicy};
use crate::state::messages::{NetworkRequest, NetworkResponse};
use log::{debug, error, info};
use rps_api::client::{ApiError, RpsApi};
use std::time::Duration;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;

const SPINNER_CHARS: [char; 10] = ['⠋', '⠙', '⠹', '⠸', '⠼', '⠴', '⠦', '⠧', '⠇', '⠏'];
const SPINNER_TICK: Duration = Duration::from_millis(100);
pub const ERROR_CHAR: char = '!';

/// What the status corner shows: a spinner frame while history loads, blank
/// when done, `ERROR_CHAR` when the last load failed.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct LoadingState {
    pub is_loading: bool,
    pub spinner_char: char,
}

impl Default for LoadingState {
    fn default() -> Self {
        Self::idle()
    }
}

impl LoadingState {
    pub fn idle() -> Self {
        Self { is_loading: false, spinner_char: ' ' }
    }

    pub fn failed() -> Self {
        Self { is_loading: false, spinner_char: ERROR_CHAR }
    }

    pub fn spinning(frame: usize) -> Self {
        Self {
            is_loading: true,
            spinner_char: SPINNER_CHARS[frame % SPINNER_CHARS.len()],
        }
    }
}

/// Sends spinner frames until finished or dropped.
struct Spinner {
    stop: Option<oneshot::Sender<()>>,
    task: Option<JoinHandle<()>>,
}

impl Spinner {
    fn start(responses: mpsc::Sender<NetworkResponse>) -> Self {
        let (stop, mut stopped) = oneshot::channel::<()>();
        let task = tokio::spawn(async move {
            let mut interval = tokio::time::interval(SPINNER_TICK);
            let mut frame = 0;
            loop {
                tokio::select! {
                    _ = &mut stopped => break,
                    _ = interval.tick() => {
                        let loading_state = LoadingState::spinning(frame);
                        frame += 1;
                        if responses.send(NetworkResponse::LoadingStateChanged { loading_state }).await.is_err() {
                            break;
                        }
                    }
                }
            }
        });
        Self { stop: Some(stop), task: Some(task) }
    }

    /// Stop the animation; no frame is sent after this returns.
    async fn finish(mut self) {
        if let Some(stop) = self.stop.take() {
            let _ = stop.send(());
        }
        if let Some(task) = self.task.take() {
            let _ = task.await;
        }
    }
}

impl Drop for Spinner {
    fn drop(&mut self) {
        if let Some(stop) = self.stop.take() {
            let _ = stop.send(());
        }
    }
}

pub struct NetworkWorker {
    client: RpsApi,
    policy: RetryPolicy,
    requests: mpsc::Receiver<NetworkRequest>,
    responses: mpsc::Sender<NetworkResponse>,
}

impl NetworkWorker {
    pub fn new(
        settings: &AppSettings,
        requests: mpsc::Receiver<NetworkRequest>,
        responses: mpsc::Sender<NetworkResponse>,
    ) -> Self {
        Self {
            client: RpsApi::with_base_url(settings.api_base.as_str()),
            policy: RetryPolicy {
                page_delay: settings.page_delay,
                max_retries: settings.history_retries,
                backoff: settings.retry_backoff,
            },
            requests,
            responses,
        }
    }

    pub async fn run(mut self) {
        while let Some(request) = self.requests.recv().await {
            let spinner = Spinner::start(self.responses.clone());

            let result = match request {
                NetworkRequest::LoadHistory { cursor } => self.handle_load_history(cursor).await,
            };

            debug!("network request complete");
            spinner.finish().await;
            let loading_state = if result.is_ok() { LoadingState::idle() } else { LoadingState::failed() };
            let _ = self
                .responses
                .send(NetworkResponse::LoadingStateChanged { loading_state })
                .await;

            let response = result.unwrap_or_else(|err| NetworkResponse::Error {
                message: err.to_string(),
            });

            if let Err(e) = self.responses.send(response).await {
                error!("Failed to send network response: {e}");
                break;
            }
        }
    }

    async fn handle_load_history(&self, cursor: String) -> Result<NetworkResponse, ApiError> {
        info!("loading match history from {}", self.client.history_url(&cursor));
        let loader = HistoryLoader::new(self.client.clone(), self.responses.clone(), self.policy);
        let summary = loader.run(&cursor).await?;
        info!("history complete: {} pages, {} games", summary.pages, summary.games);
        Ok(NetworkResponse::HistoryFinished {
            pages: summary.pages,
            games: summary.games,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spinner_frames_wrap_around() {
        assert_eq!(LoadingState::spinning(0).spinner_char, SPINNER_CHARS[0]);
        assert_eq!(LoadingState::spinning(SPINNER_CHARS.len() + 2).spinner_char, SPINNER_CHARS[2]);
        assert!(LoadingState::spinning(3).is_loading);
    }

    #[test]
    fn finished_states_stop_spinning() {
        assert_eq!(LoadingState::default(), LoadingState::idle());
        assert!(!LoadingState::failed().is_loading);
        assert_eq!(LoadingState::failed().spinner_char, ERROR_CHAR);
    }

    #[tokio::test]
    async fn finished_spinner_sends_no_more_frames() {
        let (tx, mut rx) = mpsc::channel(16);
        let spinner = Spinner::start(tx);
        let first = rx.recv().await;
        assert!(matches!(
            first,
            Some(NetworkResponse::LoadingStateChanged { loading_state }) if loading_state.is_loading
        ));

        spinner.finish().await;
        while rx.try_recv().is_ok() {}
        tokio::time::sleep(SPINNER_TICK * 3).await;
        assert!(rx.recv().await.is_none());
    }
}
