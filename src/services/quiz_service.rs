//! Quiz catalog collaborator: registers already-validated quiz definitions
//! and resolves quiz ownership for the game operations.

use rand::seq::IndexedRandom;
use validator::Validate;

use crate::{
    config::AppConfig,
    dto::quiz::{QuizInput, QuizSummary},
    error::ServiceError,
    state::{
        Catalog, SharedState,
        game::{AnswerOption, Question, QuizDef},
        now_secs,
    },
};

/// Per-quiz ceiling on the summed question time limits, in seconds.
const MAX_TOTAL_TIME_SECS: u64 = 180;

/// Resolve a quiz the caller owns, or fail with `INVALID_QUIZ_ID`.
///
/// A quiz that exists but belongs to someone else fails the same way as a
/// missing one; the distinction from a bad session token is drawn earlier,
/// by the session middleware.
pub(crate) fn owned_quiz<'a>(
    catalog: &'a Catalog,
    user_id: u64,
    quiz_id: u64,
) -> Result<&'a QuizDef, ServiceError> {
    catalog
        .quiz(quiz_id)
        .filter(|quiz| quiz.owner_id == user_id)
        .ok_or_else(|| {
            ServiceError::InvalidQuizId(
                "quiz does not exist or is not owned by this user".into(),
            )
        })
}

/// Register a quiz definition on behalf of its owner.
///
/// The payload is checked against the contract the game core depends on:
/// valid question shape, 2-6 options with at least one correct, points in
/// range, and a per-quiz time budget. Answer ids are assigned monotonically
/// across the whole quiz so they never collide across edits, and each
/// option gets a display colour from the configured palette.
pub async fn register_quiz(
    state: &SharedState,
    user_id: u64,
    input: QuizInput,
) -> Result<QuizSummary, ServiceError> {
    input.validate()?;
    check_question_contract(&input)?;

    let summary = {
        let mut catalog = state.catalog().write().await;
        let quiz_id = catalog.next_quiz_id();
        let now = now_secs();

        let mut rng = rand::rng();
        let mut next_answer_id = 1u64;
        let questions = input
            .questions
            .into_iter()
            .enumerate()
            .map(|(index, question)| {
                let answer_options = question
                    .answer_options
                    .into_iter()
                    .map(|option| {
                        let answer_id = next_answer_id;
                        next_answer_id += 1;
                        AnswerOption {
                            answer_id,
                            answer: option.answer,
                            correct: option.correct,
                            colour: assign_colour(state.config(), &mut rng),
                        }
                    })
                    .collect();

                Question {
                    question_id: index as u64 + 1,
                    question: question.question,
                    time_limit: question.time_limit,
                    points: question.points,
                    thumbnail_url: question.thumbnail_url,
                    answer_options,
                }
            })
            .collect();

        let quiz = QuizDef {
            quiz_id,
            owner_id: user_id,
            name: input.name,
            description: input.description,
            time_created: now,
            time_last_edited: now,
            questions,
        };
        let summary = QuizSummary::from(&quiz);
        catalog.quizzes.insert(quiz_id, quiz);
        summary
    };

    state.persist().await;
    Ok(summary)
}

/// Return the full definition of a quiz the caller owns.
pub async fn quiz_info(
    state: &SharedState,
    user_id: u64,
    quiz_id: u64,
) -> Result<QuizSummary, ServiceError> {
    let catalog = state.catalog().read().await;
    let quiz = owned_quiz(&catalog, user_id, quiz_id)?;
    Ok(quiz.into())
}

/// Cross-field checks the derive-level validation cannot express.
fn check_question_contract(input: &QuizInput) -> Result<(), ServiceError> {
    for question in &input.questions {
        let mut seen = std::collections::HashSet::new();
        for option in &question.answer_options {
            if !seen.insert(option.answer.trim()) {
                return Err(ServiceError::InvalidAnswers(
                    "duplicate answers detected within a question".into(),
                ));
            }
        }

        if !question.answer_options.iter().any(|option| option.correct) {
            return Err(ServiceError::InvalidAnswers(
                "at least one correct answer is required".into(),
            ));
        }
    }

    let total_time: u64 = input.questions.iter().map(|q| q.time_limit).sum();
    if total_time > MAX_TOTAL_TIME_SECS {
        return Err(ServiceError::InvalidTimeLimit(
            "summed question time limits exceed 3 minutes".into(),
        ));
    }

    Ok(())
}

fn assign_colour(config: &AppConfig, rng: &mut impl rand::Rng) -> String {
    config
        .colours()
        .choose(rng)
        .cloned()
        .unwrap_or_else(|| "red".into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        config::AppConfig,
        dto::quiz::{AnswerOptionInput, QuestionInput},
        state::AppState,
    };

    fn option(answer: &str, correct: bool) -> AnswerOptionInput {
        AnswerOptionInput {
            answer: answer.into(),
            correct,
        }
    }

    fn question(text: &str, time_limit: u64) -> QuestionInput {
        QuestionInput {
            question: text.into(),
            time_limit,
            points: 5,
            thumbnail_url: "https://example.com/q.png".into(),
            answer_options: vec![option("Paris", true), option("Rome", false)],
        }
    }

    fn quiz_input(questions: Vec<QuestionInput>) -> QuizInput {
        QuizInput {
            name: "Capitals".into(),
            description: "geography".into(),
            questions,
        }
    }

    #[tokio::test]
    async fn registered_quiz_is_owned_and_numbered() {
        let state = AppState::new(AppConfig::default());
        let summary = register_quiz(&state, 1, quiz_input(vec![question("Capital of France?", 30)]))
            .await
            .unwrap();

        assert_eq!(summary.quiz_id, 1);
        assert_eq!(summary.num_questions, 1);

        let catalog = state.catalog().read().await;
        assert!(owned_quiz(&catalog, 1, 1).is_ok());
        assert!(matches!(
            owned_quiz(&catalog, 2, 1),
            Err(ServiceError::InvalidQuizId(_))
        ));
        assert!(matches!(
            owned_quiz(&catalog, 1, 99),
            Err(ServiceError::InvalidQuizId(_))
        ));
    }

    #[tokio::test]
    async fn answer_ids_are_monotonic_across_questions() {
        let state = AppState::new(AppConfig::default());
        register_quiz(
            &state,
            1,
            quiz_input(vec![
                question("Capital of France?", 30),
                question("Capital of Italy?", 30),
            ]),
        )
        .await
        .unwrap();

        let catalog = state.catalog().read().await;
        let quiz = catalog.quiz(1).unwrap();
        let ids: Vec<u64> = quiz
            .questions
            .iter()
            .flat_map(|q| q.answer_options.iter().map(|a| a.answer_id))
            .collect();
        assert_eq!(ids, vec![1, 2, 3, 4]);
    }

    #[tokio::test]
    async fn duplicate_answers_are_rejected() {
        let state = AppState::new(AppConfig::default());
        let mut bad = question("Capital of France?", 30);
        bad.answer_options = vec![option("Paris", true), option("Paris", false)];

        let err = register_quiz(&state, 1, quiz_input(vec![bad])).await.unwrap_err();
        assert!(matches!(err, ServiceError::InvalidAnswers(_)));
    }

    #[tokio::test]
    async fn missing_correct_answer_is_rejected() {
        let state = AppState::new(AppConfig::default());
        let mut bad = question("Capital of France?", 30);
        bad.answer_options = vec![option("Lyon", false), option("Rome", false)];

        let err = register_quiz(&state, 1, quiz_input(vec![bad])).await.unwrap_err();
        assert!(matches!(err, ServiceError::InvalidAnswers(_)));
    }

    #[tokio::test]
    async fn over_budget_total_time_is_rejected() {
        let state = AppState::new(AppConfig::default());
        let err = register_quiz(
            &state,
            1,
            quiz_input(vec![
                question("Capital of France?", 100),
                question("Capital of Italy?", 100),
            ]),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, ServiceError::InvalidTimeLimit(_)));
    }

    #[tokio::test]
    async fn shape_violations_fail_derive_validation() {
        let state = AppState::new(AppConfig::default());
        let mut bad = question("hm?", 30); // too short
        bad.points = 5;

        let err = register_quiz(&state, 1, quiz_input(vec![bad])).await.unwrap_err();
        assert!(matches!(err, ServiceError::InvalidQuestion(_)));
    }

    #[tokio::test]
    async fn colours_come_from_the_palette() {
        let state = AppState::new(AppConfig::default());
        register_quiz(&state, 1, quiz_input(vec![question("Capital of France?", 30)]))
            .await
            .unwrap();

        let catalog = state.catalog().read().await;
        let quiz = catalog.quiz(1).unwrap();
        for option in &quiz.questions[0].answer_options {
            assert!(
                state
                    .config()
                    .colours()
                    .contains(&option.colour)
            );
        }
    }
}
