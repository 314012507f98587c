use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::state::{
    game::{Game, Question},
    machine::GamePhase,
};

/// Payload for a guest joining a game lobby.
#[derive(Debug, Deserialize, ToSchema)]
pub struct JoinGameRequest {
    pub game_id: u64,
    /// Desired display name. Leave empty to have one generated.
    #[serde(default)]
    pub player_name: String,
}

/// Identifier assigned to a joined guest.
///
/// The player id is the bearer credential for every player-facing
/// operation; there is no separate session token for guests.
#[derive(Debug, Serialize, ToSchema)]
pub struct JoinGameResponse {
    pub player_id: u64,
}

/// Progress of the game a player is in.
#[derive(Debug, Serialize, ToSchema)]
pub struct PlayerStatusResponse {
    pub state: GamePhase,
    pub num_questions: usize,
    /// 1-based position of the question the game is on.
    pub at_question: u64,
}

impl From<&Game> for PlayerStatusResponse {
    fn from(game: &Game) -> Self {
        Self {
            state: game.phase,
            num_questions: game.snapshot.questions.len(),
            at_question: game.current_question_index as u64 + 1,
        }
    }
}

/// Question as shown to players: correctness flags are stripped.
#[derive(Debug, Serialize, ToSchema)]
pub struct QuestionInfoResponse {
    pub question_id: u64,
    pub question: String,
    pub time_limit: u64,
    pub points: u32,
    pub thumbnail_url: String,
    pub answer_options: Vec<AnswerOptionInfo>,
}

/// Answer option as shown to players.
#[derive(Debug, Serialize, ToSchema)]
pub struct AnswerOptionInfo {
    pub answer_id: u64,
    pub answer: String,
    pub colour: String,
}

impl From<&Question> for QuestionInfoResponse {
    fn from(question: &Question) -> Self {
        Self {
            question_id: question.question_id,
            question: question.question.clone(),
            time_limit: question.time_limit,
            points: question.points,
            thumbnail_url: question.thumbnail_url.clone(),
            answer_options: question
                .answer_options
                .iter()
                .map(|option| AnswerOptionInfo {
                    answer_id: option.answer_id,
                    answer: option.answer.clone(),
                    colour: option.colour.clone(),
                })
                .collect(),
        }
    }
}

/// Payload submitting a player's chosen answer ids for a question.
#[derive(Debug, Deserialize, ToSchema)]
pub struct SubmitAnswersRequest {
    pub answer_ids: Vec<u64>,
}
