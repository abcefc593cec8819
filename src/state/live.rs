use futures_util::StreamExt;
use log::{debug, warn};
use rps_api::LiveEvent;
use rps_api::client::decode_live_frame;
use tokio::sync::mpsc;
use tokio::time::{Duration, sleep};
use tokio_tungstenite::{connect_async, tungstenite::Message};

const RECONNECT_DELAY: Duration = Duration::from_secs(2);

#[derive(Debug, Clone)]
pub enum LiveMessage {
    Connected,
    Disconnected,
    Event(LiveEvent),
    Error(String),
}

/// Subscribes to the live game channel and forwards decoded events.
#[derive(Debug)]
pub struct LiveWorker {
    pub url: String,
    pub events: mpsc::Sender<LiveMessage>,
}

impl LiveWorker {
    pub async fn run(self) {
        loop {
            match connect_async(self.url.as_str()).await {
                Ok((stream, _)) => {
                    if self.events.send(LiveMessage::Connected).await.is_err() {
                        return;
                    }
                    let (_write, mut read) = stream.split();

                    loop {
                        match read.next().await {
                            Some(Ok(Message::Text(text))) => {
                                if let Some(msg) = handle_frame(text.as_str())
                                    && self.events.send(msg).await.is_err()
                                {
                                    return;
                                }
                            }
                            Some(Ok(Message::Close(_))) | None => {
                                let _ = self.events.send(LiveMessage::Disconnected).await;
                                break;
                            }
                            Some(Ok(_)) => {}
                            Some(Err(e)) => {
                                let _ = self.events.send(LiveMessage::Error(format!("live read failed: {e}"))).await;
                                let _ = self.events.send(LiveMessage::Disconnected).await;
                                break;
                            }
                        }
                    }
                }
                Err(e) => {
                    let _ = self
                        .events
                        .send(LiveMessage::Error(format!("live connect failed: {e}")))
                        .await;
                    if self.events.send(LiveMessage::Disconnected).await.is_err() {
                        return;
                    }
                }
            }

            sleep(RECONNECT_DELAY).await;
        }
    }
}

/// Decode one text frame. Malformed frames are logged and dropped.
fn handle_frame(text: &str) -> Option<LiveMessage> {
    match decode_live_frame(text) {
        Ok(event) => {
            debug!("live {} for game {}", event.kind(), event.game().game_id);
            Some(LiveMessage::Event(event))
        }
        Err(e) => {
            warn!("{e}");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_frame_becomes_event() {
        let inner = r#"{"type":"GAME_BEGIN","gameId":"x1","t":5,"playerA":{"name":"A"},"playerB":{"name":"B"}}"#;
        let frame = serde_json::to_string(inner).unwrap();
        let Some(LiveMessage::Event(LiveEvent::Begin(game))) = handle_frame(&frame) else {
            panic!("expected a begin event");
        };
        assert_eq!(game.game_id, "x1");
    }

    #[test]
    fn malformed_frame_is_dropped() {
        assert!(handle_frame("{not json").is_none());
        assert!(handle_frame(r#""{\"type\":\"GAME_BEGIN\"}""#).is_none());
    }
}
