//! Runtime representation of quizzes, games, players, and answer submissions.

use crate::state::machine::GamePhase;
use crate::state::timer::PhaseTimer;

/// One selectable option of a multiple-choice question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnswerOption {
    /// Identifier unique across the owning quiz, never reused across edits.
    pub answer_id: u64,
    /// Display text of the option.
    pub answer: String,
    /// Whether this option belongs to the question's correct answer set.
    pub correct: bool,
    /// Display colour assigned when the quiz was registered.
    pub colour: String,
}

/// A timed multiple-choice question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Question {
    /// Stable identifier within the quiz.
    pub question_id: u64,
    /// Question text shown to players.
    pub question: String,
    /// Seconds the question stays open once presented.
    pub time_limit: u64,
    /// Points awarded for an exactly correct submission.
    pub points: u32,
    /// Thumbnail image shown alongside the question.
    pub thumbnail_url: String,
    /// Selectable options; at least one is flagged correct.
    pub answer_options: Vec<AnswerOption>,
}

impl Question {
    /// Identifiers of the options flagged correct.
    pub fn correct_answer_ids(&self) -> Vec<u64> {
        self.answer_options
            .iter()
            .filter(|option| option.correct)
            .map(|option| option.answer_id)
            .collect()
    }

    /// Whether `answer_id` names one of this question's options.
    pub fn has_answer_id(&self, answer_id: u64) -> bool {
        self.answer_options
            .iter()
            .any(|option| option.answer_id == answer_id)
    }
}

/// A quiz definition registered by an administrator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizDef {
    /// Primary key of the quiz.
    pub quiz_id: u64,
    /// User id of the administrator owning this quiz.
    pub owner_id: u64,
    /// Display name.
    pub name: String,
    /// Free-form description.
    pub description: String,
    /// Seconds since the Unix epoch at registration time.
    pub time_created: u64,
    /// Seconds since the Unix epoch at the last edit.
    pub time_last_edited: u64,
    /// Ordered question list.
    pub questions: Vec<Question>,
}

/// Immutable copy of a quiz taken when a game starts.
///
/// Games hold their own copy so concurrent edits to the live quiz never
/// affect a running game.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizSnapshot {
    /// Id of the quiz this snapshot was taken from.
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
    pub questions: Vec<Question>,
}

impl From<&QuizDef> for QuizSnapshot {
    fn from(quiz: &QuizDef) -> Self {
        Self {
            quiz_id: quiz.quiz_id,
            name: quiz.name.clone(),
            description: quiz.description.clone(),
            time_created: quiz.time_created,
            time_last_edited: quiz.time_last_edited,
            questions: quiz.questions.clone(),
        }
    }
}

/// Anonymous guest joined to a specific game.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Player {
    /// Sequentially assigned id, unique within the game, never reused.
    pub player_id: u64,
    /// Display name, unique within the game (case-sensitive).
    pub player_name: String,
    /// Back-reference to the owning game.
    pub game_id: u64,
}

/// One player's recorded submission for a question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerAnswer {
    /// Submitting player.
    pub player_id: u64,
    /// Chosen option ids (set semantics, no duplicates).
    pub answer_ids: Vec<u64>,
    /// Seconds since the Unix epoch at submission time.
    pub submitted_at: u64,
    /// Whether the submitted set exactly matched the correct set.
    pub is_correct: bool,
    /// Question points if correct, zero otherwise.
    pub points_awarded: u32,
}

/// All submissions recorded for one question of one game.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionAnswers {
    /// Question these submissions belong to.
    pub question_id: u64,
    /// Milliseconds since the Unix epoch when the batch was created, i.e.
    /// when the first submission arrived. Approximates the instant the
    /// question opened and anchors answer-latency statistics.
    pub question_start_time: u64,
    /// At most one entry per player; resubmission replaces in place.
    pub submissions: Vec<PlayerAnswer>,
}

/// Derived statistics for one question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionResults {
    /// Question the statistics describe.
    pub question_id: u64,
    /// Names of players who answered correctly, in submission order.
    pub players_correct: Vec<String>,
    /// Mean answer latency in whole seconds, zero without submissions.
    pub average_answer_time: u64,
    /// Rounded share of correct submissions, zero without submissions.
    pub percent_correct: u32,
}

impl QuestionResults {
    /// The zero/empty statistics served for a question nobody answered.
    pub fn empty(question_id: u64) -> Self {
        Self {
            question_id,
            players_correct: Vec::new(),
            average_answer_time: 0,
            percent_correct: 0,
        }
    }
}

/// A player's final score on the leaderboard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerScore {
    /// Player display name.
    pub name: String,
    /// Sum of points awarded across every submission.
    pub score: u32,
}

/// Final leaderboard plus per-question statistics for a whole game.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultsFinal {
    /// Players sorted by score descending, ties broken by name ascending.
    pub users_ranked_by_score: Vec<PlayerScore>,
    /// One entry per snapshot question, in question order.
    pub question_results: Vec<QuestionResults>,
}

/// One live playthrough instance of a quiz.
///
/// Games are created in [`GamePhase::Lobby`], mutated only by admin actions,
/// timer firings, and answer submissions, and never deleted: a game that
/// reaches [`GamePhase::End`] stays in the catalog for historical results
/// queries.
#[derive(Debug)]
pub struct Game {
    /// Primary key, monotonically allocated and never reused.
    pub game_id: u64,
    /// Quiz this game was started from.
    pub quiz_id: u64,
    /// Current phase of the session state machine.
    pub phase: GamePhase,
    /// 0-based index of the question being played; meaningful once play
    /// has started.
    pub current_question_index: usize,
    /// Player-count threshold for auto-start. Recorded at game start but
    /// never acted on; see DESIGN.md.
    pub auto_start_num: u32,
    /// Immutable quiz copy taken at start time.
    pub snapshot: QuizSnapshot,
    /// Guests joined to this game, in join order.
    pub players: Vec<Player>,
    /// Per-question submission batches, created lazily on first submission.
    pub answers: Vec<QuestionAnswers>,
    /// Per-question statistics, populated when each question's answer is
    /// revealed.
    pub question_results: Vec<QuestionResults>,
    /// Leaderboard computed once when the game reaches final results.
    pub final_results: Option<ResultsFinal>,
    /// Seconds since the Unix epoch at game start.
    pub time_started: u64,
    /// Seconds since the Unix epoch when the game ended, if it has.
    pub time_ended: Option<u64>,
    /// Single pending phase-advance timer slot.
    pub timer: PhaseTimer,
}

impl Game {
    /// Build a fresh game in the lobby from a quiz snapshot.
    pub fn new(game_id: u64, snapshot: QuizSnapshot, auto_start_num: u32, time_started: u64) -> Self {
        Self {
            game_id,
            quiz_id: snapshot.quiz_id,
            phase: GamePhase::Lobby,
            current_question_index: 0,
            auto_start_num,
            snapshot,
            players: Vec::new(),
            answers: Vec::new(),
            question_results: Vec::new(),
            final_results: None,
            time_started,
            time_ended: None,
            timer: PhaseTimer::default(),
        }
    }

    /// A game counts as active until it reaches the terminal phase.
    pub fn is_active(&self) -> bool {
        self.phase != GamePhase::End
    }

    /// The question the game is currently on.
    pub fn current_question(&self) -> Option<&Question> {
        self.snapshot.questions.get(self.current_question_index)
    }

    /// Whether a question follows the current one.
    pub fn has_next_question(&self) -> bool {
        self.current_question_index + 1 < self.snapshot.questions.len()
    }

    /// Display name of a joined player.
    pub fn player_name(&self, player_id: u64) -> Option<&str> {
        self.players
            .iter()
            .find(|player| player.player_id == player_id)
            .map(|player| player.player_name.as_str())
    }

    /// Submission batch recorded for `question_id`, if any player answered.
    pub fn submission_batch(&self, question_id: u64) -> Option<&QuestionAnswers> {
        self.answers
            .iter()
            .find(|batch| batch.question_id == question_id)
    }

    /// Submission batch for `question_id`, created on first use.
    ///
    /// A freshly created batch records `now_millis` as the question start
    /// reference for latency statistics.
    pub fn submission_batch_mut(&mut self, question_id: u64, now_millis: u64) -> &mut QuestionAnswers {
        let index = match self
            .answers
            .iter()
            .position(|batch| batch.question_id == question_id)
        {
            Some(index) => index,
            None => {
                self.answers.push(QuestionAnswers {
                    question_id,
                    question_start_time: now_millis,
                    submissions: Vec::new(),
                });
                self.answers.len() - 1
            }
        };
        &mut self.answers[index]
    }

    /// Insert or replace the stored statistics for one question.
    pub fn store_question_results(&mut self, results: QuestionResults) {
        match self
            .question_results
            .iter_mut()
            .find(|entry| entry.question_id == results.question_id)
        {
            Some(entry) => *entry = results,
            None => self.question_results.push(results),
        }
    }

    /// Stored statistics for `question_id`, if already computed.
    pub fn stored_question_results(&self, question_id: u64) -> Option<&QuestionResults> {
        self.question_results
            .iter()
            .find(|entry| entry.question_id == question_id)
    }
}
