//! Service error taxonomy and its HTTP projection.

use axum::{Json, http::StatusCode, response::IntoResponse};
use serde::Serialize;
use thiserror::Error;
use validator::ValidationErrors;

use crate::state::machine::{InvalidTransition, UnknownAction};

/// Failures produced by the core operations.
///
/// Every variant is a local, deterministic validation failure: given the
/// same store state and input the operation fails the same way, nothing is
/// retryable, and a failed operation leaves the catalog exactly as it was.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ServiceError {
    /// Missing or invalid session token.
    #[error("unauthorised: {0}")]
    Unauthorised(String),
    /// Quiz does not exist or is not owned by the caller.
    #[error("invalid quiz id: {0}")]
    InvalidQuizId(String),
    /// Game id absent from the requested partition of the quiz's games.
    #[error("invalid game id: {0}")]
    InvalidGameId(String),
    /// Player id resolves to no game.
    #[error("invalid player id: {0}")]
    InvalidPlayerId(String),
    /// Guest name rejected (bad characters or already in use).
    #[error("invalid player name: {0}")]
    InvalidPlayerName(String),
    /// Action string names no known game action.
    #[error("invalid action: {0}")]
    InvalidAction(String),
    /// Action or query not legal in the game's current phase.
    #[error("incompatible game state: {0}")]
    IncompatibleGameState(String),
    /// Question position out of range or not the current question.
    #[error("invalid question position: {0}")]
    InvalidPosition(String),
    /// Submitted answer ids empty, duplicated, or unknown to the question.
    #[error("invalid answer ids: {0}")]
    InvalidAnswerIds(String),
    /// Game start rejected because the quiz has no questions.
    #[error("quiz is empty: {0}")]
    QuizIsEmpty(String),
    /// Game start rejected because ten non-ended games already exist.
    #[error("too many active games: {0}")]
    MaxActiveGames(String),
    /// Game start rejected because of a bad auto-start threshold.
    #[error("invalid game: {0}")]
    InvalidGame(String),
    /// Quiz registration payload breaks the validated-questions contract.
    #[error("invalid question: {0}")]
    InvalidQuestion(String),
    /// Answer options of a registered question are malformed.
    #[error("invalid answers: {0}")]
    InvalidAnswers(String),
    /// Question time limits exceed the per-quiz budget.
    #[error("invalid time limit: {0}")]
    InvalidTimeLimit(String),
}

impl ServiceError {
    /// Stable machine-readable tag carried in error response bodies.
    pub fn kind(&self) -> &'static str {
        match self {
            ServiceError::Unauthorised(_) => "UNAUTHORISED",
            ServiceError::InvalidQuizId(_) => "INVALID_QUIZ_ID",
            ServiceError::InvalidGameId(_) => "INVALID_GAME_ID",
            ServiceError::InvalidPlayerId(_) => "INVALID_PLAYER_ID",
            ServiceError::InvalidPlayerName(_) => "INVALID_PLAYER_NAME",
            ServiceError::InvalidAction(_) => "INVALID_ACTION",
            ServiceError::IncompatibleGameState(_) => "INCOMPATIBLE_GAME_STATE",
            ServiceError::InvalidPosition(_) => "INVALID_POSITION",
            ServiceError::InvalidAnswerIds(_) => "INVALID_ANSWER_IDS",
            ServiceError::QuizIsEmpty(_) => "QUIZ_IS_EMPTY",
            ServiceError::MaxActiveGames(_) => "MAX_ACTIVE_GAMES",
            ServiceError::InvalidGame(_) => "INVALID_GAME",
            ServiceError::InvalidQuestion(_) => "INVALID_QUESTION",
            ServiceError::InvalidAnswers(_) => "INVALID_ANSWERS",
            ServiceError::InvalidTimeLimit(_) => "INVALID_TIMELIMIT",
        }
    }

    /// Human-readable detail without the kind prefix.
    pub fn message(&self) -> &str {
        match self {
            ServiceError::Unauthorised(message)
            | ServiceError::InvalidQuizId(message)
            | ServiceError::InvalidGameId(message)
            | ServiceError::InvalidPlayerId(message)
            | ServiceError::InvalidPlayerName(message)
            | ServiceError::InvalidAction(message)
            | ServiceError::IncompatibleGameState(message)
            | ServiceError::InvalidPosition(message)
            | ServiceError::InvalidAnswerIds(message)
            | ServiceError::QuizIsEmpty(message)
            | ServiceError::MaxActiveGames(message)
            | ServiceError::InvalidGame(message)
            | ServiceError::InvalidQuestion(message)
            | ServiceError::InvalidAnswers(message)
            | ServiceError::InvalidTimeLimit(message) => message,
        }
    }

    fn status(&self) -> StatusCode {
        match self {
            ServiceError::Unauthorised(_) => StatusCode::UNAUTHORIZED,
            ServiceError::InvalidQuizId(_) => StatusCode::FORBIDDEN,
            _ => StatusCode::BAD_REQUEST,
        }
    }
}

impl From<InvalidTransition> for ServiceError {
    fn from(err: InvalidTransition) -> Self {
        ServiceError::IncompatibleGameState(err.to_string())
    }
}

impl From<UnknownAction> for ServiceError {
    fn from(err: UnknownAction) -> Self {
        ServiceError::InvalidAction(err.to_string())
    }
}

impl From<ValidationErrors> for ServiceError {
    fn from(err: ValidationErrors) -> Self {
        ServiceError::InvalidQuestion(format!("validation failed: {err}"))
    }
}

/// Wire shape of an error response.
#[derive(Serialize)]
struct ErrorBody {
    error: &'static str,
    message: String,
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> axum::response::Response {
        let status = self.status();
        let payload = Json(ErrorBody {
            error: self.kind(),
            message: self.message().to_owned(),
        });

        (status, payload).into_response()
    }
}
