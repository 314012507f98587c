use serde::{Deserialize, Serialize};

use crate::state::{
    Catalog,
    game::{
        AnswerOption, Game, Player, PlayerAnswer, PlayerScore, Question, QuestionAnswers,
        QuestionResults, QuizDef, QuizSnapshot, ResultsFinal,
    },
    machine::GamePhase,
};

/// Answer option entry persisted inside a question.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AnswerOptionEntity {
    /// Identifier unique across the owning quiz.
    pub answer_id: u64,
    /// Display text of the option.
    pub answer: String,
    /// Whether the option belongs to the correct answer set.
    pub correct: bool,
    /// Display colour assigned at registration.
    pub colour: String,
}

/// Question entry persisted inside a quiz or game snapshot.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct QuestionEntity {
    /// Stable identifier within the quiz.
    pub question_id: u64,
    /// Question text.
    pub question: String,
    /// Seconds the question stays open.
    pub time_limit: u64,
    /// Points awarded for a correct submission.
    pub points: u32,
    /// Thumbnail image URL.
    pub thumbnail_url: String,
    /// Selectable options.
    pub answer_options: Vec<AnswerOptionEntity>,
}

/// Quiz definition persisted by the storage layer.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct QuizEntity {
    /// Primary key of the quiz.
    pub quiz_id: u64,
    /// User id of the owning administrator.
    pub owner_id: u64,
    /// Display name.
    pub name: String,
    /// Free-form description.
    pub description: String,
    /// Creation timestamp (seconds since the Unix epoch).
    pub time_created: u64,
    /// Last-edit timestamp (seconds since the Unix epoch).
    pub time_last_edited: u64,
    /// Ordered question list.
    pub questions: Vec<QuestionEntity>,
}

/// Immutable quiz copy persisted inside a game.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct QuizSnapshotEntity {
    /// Id of the quiz the snapshot was taken from.
    pub quiz_id: u64,
    /// Quiz name at snapshot time.
    pub name: String,
    /// Quiz description at snapshot time.
    pub description: String,
    /// Creation timestamp of the source quiz.
    pub time_created: u64,
    /// Last-edit timestamp of the source quiz at snapshot time.
    pub time_last_edited: u64,
    /// The question list the game plays through.
    pub questions: Vec<QuestionEntity>,
}

/// Player entry persisted inside a game.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PlayerEntity {
    /// Sequentially assigned id, unique within the game.
    pub player_id: u64,
    /// Display name, unique within the game.
    pub player_name: String,
    /// Back-reference to the owning game.
    pub game_id: u64,
}

/// One recorded submission persisted inside a batch.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PlayerAnswerEntity {
    /// Submitting player.
    pub player_id: u64,
    /// Chosen option ids.
    pub answer_ids: Vec<u64>,
    /// Submission timestamp (seconds since the Unix epoch).
    pub submitted_at: u64,
    /// Whether the submission matched the correct set exactly.
    pub is_correct: bool,
    /// Points awarded for the submission.
    pub points_awarded: u32,
}

/// Per-question submission batch persisted inside a game.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct QuestionAnswersEntity {
    /// Question the submissions belong to.
    pub question_id: u64,
    /// Milliseconds since the Unix epoch when the batch was created.
    pub question_start_time: u64,
    /// Recorded submissions, at most one per player.
    pub submissions: Vec<PlayerAnswerEntity>,
}

/// Per-question statistics persisted inside a game.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct QuestionResultsEntity {
    /// Question the statistics describe.
    pub question_id: u64,
    /// Names of players who answered correctly.
    pub players_correct: Vec<String>,
    /// Mean answer latency in whole seconds.
    pub average_answer_time: u64,
    /// Rounded share of correct submissions.
    pub percent_correct: u32,
}

/// Leaderboard entry persisted inside final results.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PlayerScoreEntity {
    /// Player display name.
    pub name: String,
    /// Total score.
    pub score: u32,
}

/// Final results persisted inside a game.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ResultsFinalEntity {
    /// Ranked leaderboard.
    pub users_ranked_by_score: Vec<PlayerScoreEntity>,
    /// Per-question statistics, one entry per snapshot question.
    pub question_results: Vec<QuestionResultsEntity>,
}

/// Aggregate game entity persisted by the storage layer.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct GameEntity {
    /// Primary key of the game.
    pub game_id: u64,
    /// Quiz the game was started from.
    pub quiz_id: u64,
    /// Phase of the session state machine at persist time.
    pub phase: GamePhase,
    /// 0-based index of the question being played.
    pub current_question_index: usize,
    /// Recorded auto-start threshold.
    pub auto_start_num: u32,
    /// Immutable quiz copy taken at start time.
    pub snapshot: QuizSnapshotEntity,
    /// Joined guests.
    pub players: Vec<PlayerEntity>,
    /// Per-question submission batches.
    pub answers: Vec<QuestionAnswersEntity>,
    /// Per-question statistics computed so far.
    pub question_results: Vec<QuestionResultsEntity>,
    /// Final leaderboard, present once the game reached final results.
    pub final_results: Option<ResultsFinalEntity>,
    /// Start timestamp (seconds since the Unix epoch).
    pub time_started: u64,
    /// End timestamp, set when the game reached the terminal phase.
    pub time_ended: Option<u64>,
}

/// Whole-catalog snapshot persisted as one document.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct CatalogEntity {
    /// Registered quizzes.
    pub quizzes: Vec<QuizEntity>,
    /// All games, ended ones included.
    pub games: Vec<GameEntity>,
}

impl From<&AnswerOption> for AnswerOptionEntity {
    fn from(option: &AnswerOption) -> Self {
        Self {
            answer_id: option.answer_id,
            answer: option.answer.clone(),
            correct: option.correct,
            colour: option.colour.clone(),
        }
    }
}

impl From<AnswerOptionEntity> for AnswerOption {
    fn from(entity: AnswerOptionEntity) -> Self {
        Self {
            answer_id: entity.answer_id,
            answer: entity.answer,
            correct: entity.correct,
            colour: entity.colour,
        }
    }
}

impl From<&Question> for QuestionEntity {
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

impl From<QuestionEntity> for Question {
    fn from(entity: QuestionEntity) -> Self {
        Self {
            question_id: entity.question_id,
            question: entity.question,
            time_limit: entity.time_limit,
            points: entity.points,
            thumbnail_url: entity.thumbnail_url,
            answer_options: entity.answer_options.into_iter().map(Into::into).collect(),
        }
    }
}

impl From<&QuizDef> for QuizEntity {
    fn from(quiz: &QuizDef) -> Self {
        Self {
            quiz_id: quiz.quiz_id,
            owner_id: quiz.owner_id,
            name: quiz.name.clone(),
            description: quiz.description.clone(),
            time_created: quiz.time_created,
            time_last_edited: quiz.time_last_edited,
            questions: quiz.questions.iter().map(Into::into).collect(),
        }
    }
}

impl From<QuizEntity> for QuizDef {
    fn from(entity: QuizEntity) -> Self {
        Self {
            quiz_id: entity.quiz_id,
            owner_id: entity.owner_id,
            name: entity.name,
            description: entity.description,
            time_created: entity.time_created,
            time_last_edited: entity.time_last_edited,
            questions: entity.questions.into_iter().map(Into::into).collect(),
        }
    }
}

impl From<&QuizSnapshot> for QuizSnapshotEntity {
    fn from(snapshot: &QuizSnapshot) -> Self {
        Self {
            quiz_id: snapshot.quiz_id,
            name: snapshot.name.clone(),
            description: snapshot.description.clone(),
            time_created: snapshot.time_created,
            time_last_edited: snapshot.time_last_edited,
            questions: snapshot.questions.iter().map(Into::into).collect(),
        }
    }
}

impl From<QuizSnapshotEntity> for QuizSnapshot {
    fn from(entity: QuizSnapshotEntity) -> Self {
        Self {
            quiz_id: entity.quiz_id,
            name: entity.name,
            description: entity.description,
            time_created: entity.time_created,
            time_last_edited: entity.time_last_edited,
            questions: entity.questions.into_iter().map(Into::into).collect(),
        }
    }
}

impl From<&Player> for PlayerEntity {
    fn from(player: &Player) -> Self {
        Self {
            player_id: player.player_id,
            player_name: player.player_name.clone(),
            game_id: player.game_id,
        }
    }
}

impl From<PlayerEntity> for Player {
    fn from(entity: PlayerEntity) -> Self {
        Self {
            player_id: entity.player_id,
            player_name: entity.player_name,
            game_id: entity.game_id,
        }
    }
}

impl From<&PlayerAnswer> for PlayerAnswerEntity {
    fn from(answer: &PlayerAnswer) -> Self {
        Self {
            player_id: answer.player_id,
            answer_ids: answer.answer_ids.clone(),
            submitted_at: answer.submitted_at,
            is_correct: answer.is_correct,
            points_awarded: answer.points_awarded,
        }
    }
}

impl From<PlayerAnswerEntity> for PlayerAnswer {
    fn from(entity: PlayerAnswerEntity) -> Self {
        Self {
            player_id: entity.player_id,
            answer_ids: entity.answer_ids,
            submitted_at: entity.submitted_at,
            is_correct: entity.is_correct,
            points_awarded: entity.points_awarded,
        }
    }
}

impl From<&QuestionAnswers> for QuestionAnswersEntity {
    fn from(batch: &QuestionAnswers) -> Self {
        Self {
            question_id: batch.question_id,
            question_start_time: batch.question_start_time,
            submissions: batch.submissions.iter().map(Into::into).collect(),
        }
    }
}

impl From<QuestionAnswersEntity> for QuestionAnswers {
    fn from(entity: QuestionAnswersEntity) -> Self {
        Self {
            question_id: entity.question_id,
            question_start_time: entity.question_start_time,
            submissions: entity.submissions.into_iter().map(Into::into).collect(),
        }
    }
}

impl From<&QuestionResults> for QuestionResultsEntity {
    fn from(results: &QuestionResults) -> Self {
        Self {
            question_id: results.question_id,
            players_correct: results.players_correct.clone(),
            average_answer_time: results.average_answer_time,
            percent_correct: results.percent_correct,
        }
    }
}

impl From<QuestionResultsEntity> for QuestionResults {
    fn from(entity: QuestionResultsEntity) -> Self {
        Self {
            question_id: entity.question_id,
            players_correct: entity.players_correct,
            average_answer_time: entity.average_answer_time,
            percent_correct: entity.percent_correct,
        }
    }
}

impl From<&PlayerScore> for PlayerScoreEntity {
    fn from(score: &PlayerScore) -> Self {
        Self {
            name: score.name.clone(),
            score: score.score,
        }
    }
}

impl From<PlayerScoreEntity> for PlayerScore {
    fn from(entity: PlayerScoreEntity) -> Self {
        Self {
            name: entity.name,
            score: entity.score,
        }
    }
}

impl From<&ResultsFinal> for ResultsFinalEntity {
    fn from(results: &ResultsFinal) -> Self {
        Self {
            users_ranked_by_score: results.users_ranked_by_score.iter().map(Into::into).collect(),
            question_results: results.question_results.iter().map(Into::into).collect(),
        }
    }
}

impl From<ResultsFinalEntity> for ResultsFinal {
    fn from(entity: ResultsFinalEntity) -> Self {
        Self {
            users_ranked_by_score: entity
                .users_ranked_by_score
                .into_iter()
                .map(Into::into)
                .collect(),
            question_results: entity.question_results.into_iter().map(Into::into).collect(),
        }
    }
}

impl From<&Game> for GameEntity {
    fn from(game: &Game) -> Self {
        Self {
            game_id: game.game_id,
            quiz_id: game.quiz_id,
            phase: game.phase,
            current_question_index: game.current_question_index,
            auto_start_num: game.auto_start_num,
            snapshot: (&game.snapshot).into(),
            players: game.players.iter().map(Into::into).collect(),
            answers: game.answers.iter().map(Into::into).collect(),
            question_results: game.question_results.iter().map(Into::into).collect(),
            final_results: game.final_results.as_ref().map(Into::into),
            time_started: game.time_started,
            time_ended: game.time_ended,
        }
    }
}

impl From<GameEntity> for Game {
    fn from(entity: GameEntity) -> Self {
        Self {
            game_id: entity.game_id,
            quiz_id: entity.quiz_id,
            phase: entity.phase,
            current_question_index: entity.current_question_index,
            auto_start_num: entity.auto_start_num,
            snapshot: entity.snapshot.into(),
            players: entity.players.into_iter().map(Into::into).collect(),
            answers: entity.answers.into_iter().map(Into::into).collect(),
            question_results: entity.question_results.into_iter().map(Into::into).collect(),
            final_results: entity.final_results.map(Into::into),
            time_started: entity.time_started,
            time_ended: entity.time_ended,
            // Phase timers are runtime-only and are not resurrected on load;
            // a restored game stays in its phase until an admin acts.
            timer: Default::default(),
        }
    }
}

impl From<&Catalog> for CatalogEntity {
    fn from(catalog: &Catalog) -> Self {
        Self {
            quizzes: catalog.quizzes.values().map(Into::into).collect(),
            games: catalog.games.values().map(Into::into).collect(),
        }
    }
}

impl From<CatalogEntity> for Catalog {
    fn from(entity: CatalogEntity) -> Self {
        Self {
            quizzes: entity
                .quizzes
                .into_iter()
                .map(|quiz| (quiz.quiz_id, quiz.into()))
                .collect(),
            games: entity
                .games
                .into_iter()
                .map(|game| (game.game_id, game.into()))
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_game_entity() -> GameEntity {
        GameEntity {
            game_id: 3,
            quiz_id: 1,
            phase: GamePhase::FinalResults,
            current_question_index: 1,
            auto_start_num: 4,
            snapshot: QuizSnapshotEntity {
                quiz_id: 1,
                name: "Capitals".into(),
                description: "geography".into(),
                time_created: 100,
                time_last_edited: 150,
                questions: vec![QuestionEntity {
                    question_id: 1,
                    question: "Capital of France?".into(),
                    time_limit: 30,
                    points: 5,
                    thumbnail_url: "https://example.com/q.png".into(),
                    answer_options: vec![AnswerOptionEntity {
                        answer_id: 1,
                        answer: "Paris".into(),
                        correct: true,
                        colour: "red".into(),
                    }],
                }],
            },
            players: vec![PlayerEntity {
                player_id: 1,
                player_name: "ada".into(),
                game_id: 3,
            }],
            answers: vec![QuestionAnswersEntity {
                question_id: 1,
                question_start_time: 200_000,
                submissions: vec![PlayerAnswerEntity {
                    player_id: 1,
                    answer_ids: vec![1],
                    submitted_at: 203,
                    is_correct: true,
                    points_awarded: 5,
                }],
            }],
            question_results: vec![QuestionResultsEntity {
                question_id: 1,
                players_correct: vec!["ada".into()],
                average_answer_time: 3,
                percent_correct: 100,
            }],
            final_results: Some(ResultsFinalEntity {
                users_ranked_by_score: vec![PlayerScoreEntity {
                    name: "ada".into(),
                    score: 5,
                }],
                question_results: vec![QuestionResultsEntity {
                    question_id: 1,
                    players_correct: vec!["ada".into()],
                    average_answer_time: 3,
                    percent_correct: 100,
                }],
            }),
            time_started: 200,
            time_ended: None,
        }
    }

    #[test]
    fn catalog_round_trips_through_json() {
        let entity = CatalogEntity {
            quizzes: vec![QuizEntity {
                quiz_id: 1,
                owner_id: 9,
                name: "Capitals".into(),
                description: "geography".into(),
                time_created: 100,
                time_last_edited: 150,
                questions: Vec::new(),
            }],
            games: vec![sample_game_entity()],
        };

        let encoded = serde_json::to_string(&entity).unwrap();
        let decoded: CatalogEntity = serde_json::from_str(&encoded).unwrap();
        assert_eq!(entity, decoded);
    }

    #[test]
    fn runtime_round_trip_preserves_submission_history() {
        let entity = sample_game_entity();
        let game: Game = entity.clone().into();
        let back: GameEntity = (&game).into();
        assert_eq!(entity, back);
    }
}
