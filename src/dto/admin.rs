use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{
    dto::quiz::QuizSummary,
    state::{game::Game, machine::GamePhase},
};

/// Credentials returned when an admin session is opened.
#[derive(Debug, Serialize, ToSchema)]
pub struct SessionResponse {
    /// Opaque bearer token for the `X-Session-Token` header.
    pub token: String,
    pub user_id: u64,
}

/// Payload starting a new game from a quiz.
#[derive(Debug, Deserialize, ToSchema)]
pub struct StartGameRequest {
    /// Player-count threshold for auto-start; at most 50. Recorded on the
    /// game but never acted on.
    #[serde(default)]
    pub auto_start_num: Option<u32>,
}

/// Identifier of a freshly started game.
#[derive(Debug, Serialize, ToSchema)]
pub struct StartGameResponse {
    pub game_id: u64,
}

/// Admin action posted against a game session.
#[derive(Debug, Deserialize, ToSchema)]
pub struct GameActionRequest {
    /// One of NEXT_QUESTION, SKIP_COUNTDOWN, GO_TO_ANSWER,
    /// GO_TO_FINAL_RESULTS, END.
    pub action: String,
}

/// Game ids of a quiz, partitioned by whether the game has ended.
#[derive(Debug, Serialize, ToSchema)]
pub struct GameListResponse {
    /// Ids of games not yet in the terminal phase, ascending.
    pub active_games: Vec<u64>,
    /// Ids of ended games, ascending.
    pub inactive_games: Vec<u64>,
}

/// Full status of one game as seen by the quiz owner.
#[derive(Debug, Serialize, ToSchema)]
pub struct GameStatusResponse {
    pub state: GamePhase,
    /// 1-based position of the question the game is on.
    pub at_question: u64,
    /// Names of joined players, in join order.
    pub players: Vec<String>,
    /// Quiz snapshot the game was started from.
    pub metadata: QuizSummary,
}

impl From<&Game> for GameStatusResponse {
    fn from(game: &Game) -> Self {
        Self {
            state: game.phase,
            at_question: game.current_question_index as u64 + 1,
            players: game
                .players
                .iter()
                .map(|player| player.player_name.clone())
                .collect(),
            metadata: (&game.snapshot).into(),
        }
    }
}
