use serde::Serialize;
use utoipa::ToSchema;

use crate::state::game::{PlayerScore, QuestionResults, ResultsFinal};

/// Empty success body, returned by operations with no payload.
#[derive(Debug, Serialize, ToSchema)]
pub struct Empty {}

/// Leaderboard entry exposed to admins and players alike.
#[derive(Debug, Serialize, ToSchema)]
pub struct PlayerScoreDto {
    pub player_name: String,
    pub score: u32,
}

/// Per-question statistics exposed to admins and players alike.
#[derive(Debug, Serialize, ToSchema)]
pub struct QuestionResultsDto {
    pub question_id: u64,
    pub players_correct: Vec<String>,
    pub average_answer_time: u64,
    pub percent_correct: u32,
}

/// Final results payload: ranked leaderboard plus per-question statistics.
#[derive(Debug, Serialize, ToSchema)]
pub struct GameResultsResponse {
    pub users_ranked_by_score: Vec<PlayerScoreDto>,
    pub question_results: Vec<QuestionResultsDto>,
}

impl From<&PlayerScore> for PlayerScoreDto {
    fn from(entry: &PlayerScore) -> Self {
        Self {
            player_name: entry.name.clone(),
            score: entry.score,
        }
    }
}

impl From<&QuestionResults> for QuestionResultsDto {
    fn from(results: &QuestionResults) -> Self {
        Self {
            question_id: results.question_id,
            players_correct: results.players_correct.clone(),
            average_answer_time: results.average_answer_time,
            percent_correct: results.percent_correct,
        }
    }
}

impl From<&ResultsFinal> for GameResultsResponse {
    fn from(results: &ResultsFinal) -> Self {
        Self {
            users_ranked_by_score: results.users_ranked_by_score.iter().map(Into::into).collect(),
            question_results: results.question_results.iter().map(Into::into).collect(),
        }
    }
}
