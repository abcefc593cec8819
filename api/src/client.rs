use crate::wire::{HistoryResponse, WireGame, WirePlayer};
use crate::{GameRecord, Hand, HistoryPage, LiveEvent, PlayerHand};
use chrono::{DateTime, Utc};
use reqwest::Client;
use std::fmt;
use std::time::Duration;

pub type ApiResult<T> = Result<T, ApiError>;

pub const DEFAULT_BASE_URL: &str = "https://bad-api-assignment.reaktor.com";
pub const HISTORY_START: &str = "/rps/history";

/// Client for the paginated rock-paper-scissors history API.
#[derive(Debug, Clone)]
pub struct RpsApi {
    client: Client,
    timeout: Duration,
    base_url: String,
}

impl Default for RpsApi {
    fn default() -> Self {
        Self::with_base_url(DEFAULT_BASE_URL)
    }
}

#[derive(Debug)]
pub enum ApiError {
    Network(reqwest::Error, String),
    Api(reqwest::Error, String),
    Parsing(reqwest::Error, String),
    Frame(String),
    Other(String),
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::Network(e, url) => write!(f, "Network error for {url}: {e}"),
            ApiError::Api(e, url) => write!(f, "API error for {url}: {e}"),
            ApiError::Parsing(e, url) => write!(f, "Parse error for {url}: {e}"),
            ApiError::Frame(msg) => write!(f, "Malformed live frame: {msg}"),
            ApiError::Other(msg) => write!(f, "Error: {msg}"),
        }
    }
}

impl std::error::Error for ApiError {}

impl RpsApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        let base_url: String = base_url.into();
        Self {
            client: Client::builder()
                .user_agent("rpstui/0.1 (terminal match viewer)")
                .build()
                .unwrap_or_default(),
            timeout: Duration::from_secs(10),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Resolve a cursor to a request URL. Server cursors are paths relative to
    /// the API host; anything else is taken as an absolute URL.
    pub fn history_url(&self, cursor: &str) -> String {
        if cursor.starts_with('/') {
            format!("{}{cursor}", self.base_url)
        } else {
            cursor.to_string()
        }
    }

    /// Fetch one page of historical results.
    pub async fn fetch_history_page(&self, cursor: &str) -> ApiResult<HistoryPage> {
        let url = self.history_url(cursor);
        let raw: HistoryResponse = self.get(&url).await?;
        Ok(HistoryPage {
            games: raw.data.into_iter().map(map_history_game).collect(),
            cursor: raw.cursor.filter(|c| !c.is_empty()),
        })
    }

    async fn get<T: serde::de::DeserializeOwned>(&self, url: &str) -> ApiResult<T> {
        let response = self
            .client
            .get(url)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| ApiError::Network(e, url.to_owned()))?;

        response
            .error_for_status()
            .map_err(|e| ApiError::Api(e, url.to_owned()))?
            .json::<T>()
            .await
            .map_err(|e| ApiError::Parsing(e, url.to_owned()))
    }
}

// ---------------------------------------------------------------------------
// Live frames
// ---------------------------------------------------------------------------

/// Decode one live text frame. The payload is a JSON string whose content is
/// itself JSON, so it is decoded exactly twice and then validated.
pub fn decode_live_frame(text: &str) -> ApiResult<LiveEvent> {
    let inner: String = serde_json::from_str(text)
        .map_err(|e| ApiError::Frame(format!("outer layer is not a JSON string: {e}")))?;
    let wire: WireGame = serde_json::from_str(&inner)
        .map_err(|e| ApiError::Frame(format!("inner layer: {e}")))?;

    if wire.game_id.trim().is_empty() {
        return Err(ApiError::Frame("empty gameId".into()));
    }

    match wire.kind.as_deref() {
        Some("GAME_BEGIN") => Ok(LiveEvent::Begin(map_begin(wire))),
        Some("GAME_RESULT") => map_result(wire).map(LiveEvent::Result),
        Some(other) => Err(ApiError::Frame(format!("unknown event type {other}"))),
        None => Err(ApiError::Frame("missing event type".into())),
    }
}

// ---------------------------------------------------------------------------
// Mapping: wire types → clean domain types
// ---------------------------------------------------------------------------

fn parse_hand(s: &str) -> Option<Hand> {
    match s {
        "ROCK" => Some(Hand::Rock),
        "PAPER" => Some(Hand::Paper),
        "SCISSORS" => Some(Hand::Scissors),
        _ => None,
    }
}

fn parse_time(millis: i64) -> DateTime<Utc> {
    DateTime::from_timestamp_millis(millis).unwrap_or_default()
}

fn map_player(p: WirePlayer) -> PlayerHand {
    PlayerHand {
        played: p.played.as_deref().and_then(parse_hand),
        name: p.name,
    }
}

fn map_history_game(g: WireGame) -> GameRecord {
    GameRecord {
        game_id: g.game_id,
        t: parse_time(g.t),
        player_a: map_player(g.player_a),
        player_b: map_player(g.player_b),
    }
}

fn map_begin(g: WireGame) -> GameRecord {
    GameRecord {
        game_id: g.game_id,
        t: parse_time(g.t),
        player_a: PlayerHand { name: g.player_a.name, played: None },
        player_b: PlayerHand { name: g.player_b.name, played: None },
    }
}

fn map_result(g: WireGame) -> ApiResult<GameRecord> {
    let record = map_history_game(g);
    for side in [&record.player_a, &record.player_b] {
        if side.played.is_none() {
            return Err(ApiError::Frame(format!(
                "result {} has no valid hand for {}",
                record.game_id, side.name
            )));
        }
    }
    Ok(record)
}
