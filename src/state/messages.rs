use crate::state::network::LoadingState;
use crossterm::event::KeyEvent;
use rps_api::GameRecord;

#[derive(Debug, Clone)]
pub enum NetworkRequest {
    /// Walk the history feed starting at `cursor` until it runs out.
    LoadHistory { cursor: String },
}

#[derive(Debug)]
pub enum NetworkResponse {
    LoadingStateChanged { loading_state: LoadingState },
    /// One decoded history page, merged into the index in feed order.
    HistoryPageLoaded { games: Vec<GameRecord> },
    HistoryFinished { pages: usize, games: usize },
    Error { message: String },
}

#[derive(Debug, Clone)]
pub enum UiEvent {
    KeyPressed(KeyEvent),
    Resize,
    AppStarted,
}
