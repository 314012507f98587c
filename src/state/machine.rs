use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

/// Phases a game session moves through, from lobby to terminal end.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GamePhase {
    /// Players can join; no question has been presented yet.
    Lobby,
    /// Short countdown running before the current question opens.
    QuestionCountdown,
    /// The current question accepts answer submissions.
    QuestionOpen,
    /// The current question no longer accepts submissions.
    QuestionClose,
    /// Per-question results for the current question are on display.
    AnswerShow,
    /// The final leaderboard has been computed and is on display.
    FinalResults,
    /// Terminal phase: the game is over and no further action succeeds.
    End,
}

/// Actions an administrator can post against a game session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AdminAction {
    /// Present the next question (or the first, from the lobby).
    NextQuestion,
    /// Cut the countdown short and open the question immediately.
    SkipCountdown,
    /// Stop accepting answers and reveal the per-question results.
    GoToAnswer,
    /// Compute and display the final leaderboard.
    GoToFinalResults,
    /// Terminate the game from any phase.
    End,
}

/// Error for action strings that name no known action.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("`{0}` is not a recognised game action")]
pub struct UnknownAction(pub String);

impl FromStr for AdminAction {
    type Err = UnknownAction;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "NEXT_QUESTION" => Ok(AdminAction::NextQuestion),
            "SKIP_COUNTDOWN" => Ok(AdminAction::SkipCountdown),
            "GO_TO_ANSWER" => Ok(AdminAction::GoToAnswer),
            "GO_TO_FINAL_RESULTS" => Ok(AdminAction::GoToFinalResults),
            "END" => Ok(AdminAction::End),
            other => Err(UnknownAction(other.to_owned())),
        }
    }
}

/// Error returned when attempting to apply an invalid transition.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid transition: {action:?} cannot be applied while in {from:?}")]
pub struct InvalidTransition {
    /// The phase the game was in when the invalid action was received.
    pub from: GamePhase,
    /// The action that cannot be applied from this phase.
    pub action: AdminAction,
}

/// Compute the phase an action moves the game to, if the action is legal.
///
/// The transition is validated before any caller-side mutation happens, so a
/// rejected action leaves the game untouched. `has_next_question` gates
/// [`AdminAction::NextQuestion`] once play has started: advancing past the
/// last question is rejected rather than wrapping or clamping. [`GamePhase::End`]
/// is terminal; nothing is applicable from it, including a repeated end.
pub fn compute_transition(
    phase: GamePhase,
    action: AdminAction,
    has_next_question: bool,
) -> Result<GamePhase, InvalidTransition> {
    let next = match (phase, action) {
        (GamePhase::Lobby, AdminAction::NextQuestion) => GamePhase::QuestionCountdown,
        (GamePhase::QuestionClose | GamePhase::AnswerShow, AdminAction::NextQuestion)
            if has_next_question =>
        {
            GamePhase::QuestionCountdown
        }
        (GamePhase::QuestionCountdown, AdminAction::SkipCountdown) => GamePhase::QuestionOpen,
        (GamePhase::QuestionOpen | GamePhase::QuestionClose, AdminAction::GoToAnswer) => {
            GamePhase::AnswerShow
        }
        (GamePhase::QuestionClose | GamePhase::AnswerShow, AdminAction::GoToFinalResults) => {
            GamePhase::FinalResults
        }
        (GamePhase::End, action) => {
            return Err(InvalidTransition {
                from: GamePhase::End,
                action,
            });
        }
        (_, AdminAction::End) => GamePhase::End,
        (from, action) => return Err(InvalidTransition { from, action }),
    };

    Ok(next)
}
