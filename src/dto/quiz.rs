use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::{
    dto::{format_unix_timestamp, validation::validate_thumbnail_url},
    state::game::{AnswerOption, Question, QuizDef, QuizSnapshot},
};

/// Payload registering a quiz definition with the catalog.
///
/// Field-level rules mirror the contract the game core relies on: by the
/// time a quiz is handed to a game, its questions are valid and every
/// question has a resolved correct answer set.
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct QuizInput {
    /// Display name of the quiz.
    pub name: String,
    /// Free-form description.
    #[serde(default)]
    pub description: String,
    /// Ordered question list; may be empty (an empty quiz cannot start games).
    #[validate(nested)]
    pub questions: Vec<QuestionInput>,
}

/// Incoming question definition.
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct QuestionInput {
    #[validate(length(min = 5, max = 50))]
    pub question: String,
    /// Seconds the question stays open once presented.
    #[validate(range(min = 1))]
    pub time_limit: u64,
    #[validate(range(min = 1, max = 10))]
    pub points: u32,
    #[validate(custom(function = validate_thumbnail_url))]
    pub thumbnail_url: String,
    #[validate(length(min = 2, max = 6), nested)]
    pub answer_options: Vec<AnswerOptionInput>,
}

/// Incoming answer option definition.
#[derive(Debug, Serialize, Deserialize, ToSchema, Validate)]
pub struct AnswerOptionInput {
    #[validate(length(min = 1, max = 30))]
    pub answer: String,
    pub correct: bool,
}

/// Quiz definition as returned to its owner.
#[derive(Debug, Serialize, ToSchema)]
pub struct QuizSummary {
    pub quiz_id: u64,
    pub name: String,
    pub description: String,
    pub created_at: String,
    pub updated_at: String,
    pub num_questions: usize,
    pub questions: Vec<QuestionSummary>,
}

/// Question projection inside a [`QuizSummary`].
#[derive(Debug, Serialize, ToSchema)]
pub struct QuestionSummary {
    pub question_id: u64,
    pub question: String,
    pub time_limit: u64,
    pub points: u32,
    pub thumbnail_url: String,
    pub answer_options: Vec<AnswerOptionSummary>,
}

/// Answer option projection inside a [`QuestionSummary`].
///
/// Correctness flags are included: this shape is only served to the quiz
/// owner, never to players.
#[derive(Debug, Serialize, ToSchema)]
pub struct AnswerOptionSummary {
    pub answer_id: u64,
    pub answer: String,
    pub correct: bool,
    pub colour: String,
}

impl From<&AnswerOption> for AnswerOptionSummary {
    fn from(option: &AnswerOption) -> Self {
        Self {
            answer_id: option.answer_id,
            answer: option.answer.clone(),
            correct: option.correct,
            colour: option.colour.clone(),
        }
    }
}

impl From<&Question> for QuestionSummary {
    fn from(question: &Question) -> Self {
        Self {
            question_id: question.question_id,
            question: question.question.clone(),
            time_limit: question.time_limit,
            points: question.points,
            thumbnail_url: question.thumbnail_url.clone(),
            answer_options: question.answer_options.iter().map(Into::into).collect(),
        }
    }
}

impl From<&QuizDef> for QuizSummary {
    fn from(quiz: &QuizDef) -> Self {
        Self {
            quiz_id: quiz.quiz_id,
            name: quiz.name.clone(),
            description: quiz.description.clone(),
            created_at: format_unix_timestamp(quiz.time_created),
            updated_at: format_unix_timestamp(quiz.time_last_edited),
            num_questions: quiz.questions.len(),
            questions: quiz.questions.iter().map(Into::into).collect(),
        }
    }
}

impl From<&QuizSnapshot> for QuizSummary {
    fn from(snapshot: &QuizSnapshot) -> Self {
        Self {
            quiz_id: snapshot.quiz_id,
            name: snapshot.name.clone(),
            description: snapshot.description.clone(),
            created_at: format_unix_timestamp(snapshot.time_created),
            updated_at: format_unix_timestamp(snapshot.time_last_edited),
            num_questions: snapshot.questions.len(),
            questions: snapshot.questions.iter().map(Into::into).collect(),
        }
    }
}
