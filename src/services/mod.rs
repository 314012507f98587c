//! Business logic powering the REST routes. These helpers coordinate
//! catalog mutations, state-machine transitions, and snapshot persistence.

/// Admin game management operations.
pub mod admin_service;
/// OpenAPI documentation generation.
pub mod documentation;
/// Health check service.
pub mod health_service;
/// Stand-in identity collaborator issuing admin session tokens.
pub mod identity;
/// Player-facing game operations.
pub mod player_service;
/// Quiz catalog collaborator.
pub mod quiz_service;
/// Results aggregation over answer submissions.
pub mod results;

#[cfg(test)]
pub(crate) mod testing {
    //! Shared fixtures for the service-layer tests.

    use crate::{
        config::AppConfig,
        dto::{
            admin::{GameActionRequest, StartGameRequest},
            quiz::{AnswerOptionInput, QuestionInput, QuizInput},
        },
        services::{admin_service, quiz_service},
        state::{AppState, SharedState, machine::GamePhase},
    };

    pub(crate) fn test_state() -> SharedState {
        AppState::new(AppConfig::default())
    }

    /// A question with one correct and one incorrect option.
    pub(crate) fn two_option_question(text: &str, time_limit: u64, points: u32) -> QuestionInput {
        QuestionInput {
            question: text.into(),
            time_limit,
            points,
            thumbnail_url: "https://example.com/q.png".into(),
            answer_options: vec![
                AnswerOptionInput {
                    answer: "right".into(),
                    correct: true,
                },
                AnswerOptionInput {
                    answer: "wrong".into(),
                    correct: false,
                },
            ],
        }
    }

    pub(crate) fn quiz_input(questions: Vec<QuestionInput>) -> QuizInput {
        QuizInput {
            name: "Capitals".into(),
            description: String::new(),
            questions,
        }
    }

    pub(crate) fn open_user(state: &SharedState) -> u64 {
        state.sessions().open().1
    }

    pub(crate) async fn seed_quiz(
        state: &SharedState,
        user_id: u64,
        questions: Vec<QuestionInput>,
    ) -> u64 {
        quiz_service::register_quiz(state, user_id, quiz_input(questions))
            .await
            .unwrap()
            .quiz_id
    }

    pub(crate) async fn start_game(state: &SharedState, user_id: u64, quiz_id: u64) -> u64 {
        admin_service::start_game(
            state,
            user_id,
            quiz_id,
            StartGameRequest {
                auto_start_num: None,
            },
        )
        .await
        .unwrap()
        .game_id
    }

    pub(crate) async fn act(
        state: &SharedState,
        user_id: u64,
        quiz_id: u64,
        game_id: u64,
        action: &str,
    ) {
        admin_service::update_game_state(
            state,
            user_id,
            quiz_id,
            game_id,
            GameActionRequest {
                action: action.into(),
            },
        )
        .await
        .unwrap();
    }

    pub(crate) async fn phase_of(state: &SharedState, game_id: u64) -> GamePhase {
        state
            .catalog()
            .read()
            .await
            .games
            .get(&game_id)
            .unwrap()
            .phase
    }

    /// Answer ids of one question of a game's snapshot, filtered by
    /// correctness flag.
    pub(crate) async fn answer_ids(
        state: &SharedState,
        game_id: u64,
        question_index: usize,
        correct: bool,
    ) -> Vec<u64> {
        state
            .catalog()
            .read()
            .await
            .games
            .get(&game_id)
            .unwrap()
            .snapshot
            .questions[question_index]
            .answer_options
            .iter()
            .filter(|option| option.correct == correct)
            .map(|option| option.answer_id)
            .collect()
    }
}
