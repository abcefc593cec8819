/// Wire types for the rock-paper-scissors API.
/// History endpoint: {base}/rps/history, live endpoint: wss://{host}/rps/live
use serde::Deserialize;

#[derive(Deserialize, Default, Debug)]
pub struct HistoryResponse {
    #[serde(default)]
    pub data: Vec<WireGame>,
    pub cursor: Option<String>,
}

#[derive(Deserialize, Default, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct WireGame {
    /// Present on live frames ("GAME_BEGIN" / "GAME_RESULT"), usually on history records too.
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub game_id: String,
    /// Epoch milliseconds.
    pub t: i64,
    pub player_a: WirePlayer,
    pub player_b: WirePlayer,
}

#[derive(Deserialize, Default, Debug, Clone)]
pub struct WirePlayer {
    pub name: String,
    /// Raw hand name, mapped to `Hand` when the record is converted.
    pub played: Option<String>,
}
