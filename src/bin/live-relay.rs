//! Local stand-in for the live endpoint. Reads one game event per stdin line
//! (`{"type":"GAME_BEGIN","gameId":...}`), wraps it in the second JSON string
//! layer the real feed uses and broadcasts it to every connected client.
//!
//!   RPSTUI_LIVE_WS=ws://127.0.0.1:8787 rpstui
use futures_util::{SinkExt, StreamExt};
use serde::{Deserialize, Serialize};
use std::env;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::broadcast;
use tokio_tungstenite::{accept_async, tungstenite::Message};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let addr = env::var("RPSTUI_RELAY_BIND").unwrap_or_else(|_| "127.0.0.1:8787".to_string());
    let listener = TcpListener::bind(&addr).await?;
    let (tx, _rx) = broadcast::channel::<String>(512);

    eprintln!("live relay listening on {addr}, reading events from stdin");

    tokio::spawn(read_stdin(tx.clone()));

    loop {
        let (stream, peer) = listener.accept().await?;
        let rx = tx.subscribe();
        tokio::spawn(async move {
            if let Err(e) = handle_client(stream, rx).await {
                eprintln!("client {peer} disconnected: {e}");
            }
        });
    }
}

async fn read_stdin(tx: broadcast::Sender<String>) -> anyhow::Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        match encode_frame(line) {
            Ok(frame) => {
                let _ = tx.send(frame);
            }
            Err(e) => eprintln!("skipping line, not a game event: {e}"),
        }
    }
    Ok(())
}

/// One game event as the live endpoint sends it, before the outer string layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RelayEvent {
    #[serde(rename = "type")]
    kind: String,
    game_id: String,
    t: i64,
    player_a: RelayPlayer,
    player_b: RelayPlayer,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct RelayPlayer {
    name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    played: Option<String>,
}

/// Parse the event, then encode its compact form again as a JSON string.
fn encode_frame(line: &str) -> serde_json::Result<String> {
    let event: RelayEvent = serde_json::from_str(line)?;
    serde_json::to_string(&serde_json::to_string(&event)?)
}

async fn handle_client(stream: TcpStream, mut rx: broadcast::Receiver<String>) -> anyhow::Result<()> {
    let ws = accept_async(stream).await?;
    let (mut write, mut read) = ws.split();

    loop {
        tokio::select! {
            inbound = read.next() => {
                match inbound {
                    Some(Ok(Message::Close(_))) | None => break,
                    Some(Ok(_)) => {}
                    Some(Err(e)) => return Err(e.into()),
                }
            }
            outbound = rx.recv() => {
                match outbound {
                    Ok(text) => {
                        write.send(Message::Text(text.into())).await?;
                    }
                    Err(broadcast::error::RecvError::Lagged(_)) => {}
                    Err(broadcast::error::RecvError::Closed) => break,
                }
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frames_decode_with_the_client_decoder() {
        let line = r#"{"type":"GAME_RESULT","gameId":"r1","t":7,"playerA":{"name":"A","played":"ROCK"},"playerB":{"name":"B","played":"PAPER"}}"#;
        let frame = encode_frame(line).unwrap();
        let event = rps_api::client::decode_live_frame(&frame).expect("relay frames must decode");
        assert_eq!(event.game().game_id, "r1");
    }

    #[test]
    fn begin_frames_omit_hands() {
        let line = r#"{"type":"GAME_BEGIN","gameId":"b1","t":7,"playerA":{"name":"A"},"playerB":{"name":"B"}}"#;
        let frame = encode_frame(line).unwrap();
        assert!(!frame.contains("played"));
        let event = rps_api::client::decode_live_frame(&frame).expect("begin frames must decode");
        assert_eq!(event.kind(), "GAME_BEGIN");
    }

    #[test]
    fn lines_that_are_not_game_events_are_rejected() {
        assert!(encode_frame("hello").is_err());
        assert!(encode_frame(r#"{"type":"GAME_BEGIN","t":7}"#).is_err());
    }
}
