//! Business logic powering the admin REST routes: session bootstrap, game
//! start, the state-machine action driver with its phase timers, and the
//! owner-facing status/results projections.

use std::{sync::Arc, time::Duration};

use tracing::debug;

use crate::{
    dto::{
        admin::{
            GameActionRequest, GameListResponse, GameStatusResponse, SessionResponse,
            StartGameRequest, StartGameResponse,
        },
        common::GameResultsResponse,
    },
    error::ServiceError,
    services::{quiz_service::owned_quiz, results},
    state::{
        SharedState,
        game::{Game, QuizSnapshot},
        machine::{AdminAction, GamePhase, compute_transition},
        now_secs,
    },
};

/// Most games of one quiz allowed outside the terminal phase at once.
const MAX_ACTIVE_GAMES_PER_QUIZ: usize = 10;
/// Largest accepted auto-start threshold.
const MAX_AUTO_START_NUM: u32 = 50;

/// Open a fresh admin session and return its bearer credentials.
pub fn open_session(state: &SharedState) -> SessionResponse {
    let (token, user_id) = state.sessions().open();
    SessionResponse { token, user_id }
}

/// Start a new game from a quiz the caller owns.
///
/// The game takes an immutable snapshot of the quiz, so edits made while it
/// runs do not affect it. Ids are allocated max-plus-one and never reused;
/// games are never deleted, only ended.
pub async fn start_game(
    state: &SharedState,
    user_id: u64,
    quiz_id: u64,
    request: StartGameRequest,
) -> Result<StartGameResponse, ServiceError> {
    let game_id = {
        let mut catalog = state.catalog().write().await;
        let quiz = owned_quiz(&catalog, user_id, quiz_id)?;

        if let Some(auto_start_num) = request.auto_start_num {
            if auto_start_num > MAX_AUTO_START_NUM {
                return Err(ServiceError::InvalidGame(
                    "auto-start threshold is greater than 50".into(),
                ));
            }
        }

        if quiz.questions.is_empty() {
            return Err(ServiceError::QuizIsEmpty(
                "the quiz does not have any questions in it".into(),
            ));
        }

        if catalog.active_game_count(quiz_id) >= MAX_ACTIVE_GAMES_PER_QUIZ {
            return Err(ServiceError::MaxActiveGames(
                "10 games that have not ended already exist for this quiz".into(),
            ));
        }

        let snapshot = QuizSnapshot::from(quiz);
        let game_id = catalog.next_game_id();
        let game = Game::new(
            game_id,
            snapshot,
            request.auto_start_num.unwrap_or(0),
            now_secs(),
        );
        catalog.games.insert(game_id, game);
        game_id
    };

    state.persist().await;
    Ok(StartGameResponse { game_id })
}

/// List a quiz's game ids, partitioned into active and ended games.
pub async fn list_games(
    state: &SharedState,
    user_id: u64,
    quiz_id: u64,
) -> Result<GameListResponse, ServiceError> {
    let catalog = state.catalog().read().await;
    owned_quiz(&catalog, user_id, quiz_id)?;

    let mut active_games = Vec::new();
    let mut inactive_games = Vec::new();
    for game in catalog.games.values().filter(|g| g.quiz_id == quiz_id) {
        if game.is_active() {
            active_games.push(game.game_id);
        } else {
            inactive_games.push(game.game_id);
        }
    }
    active_games.sort_unstable();
    inactive_games.sort_unstable();

    Ok(GameListResponse {
        active_games,
        inactive_games,
    })
}

/// Apply one admin action to a game's state machine.
///
/// Preconditions are checked in order (ownership, game existence, action
/// validity, phase compatibility) and the game is only mutated once the
/// transition is known to be legal, so a rejected action leaves everything
/// untouched.
pub async fn update_game_state(
    state: &SharedState,
    user_id: u64,
    quiz_id: u64,
    game_id: u64,
    request: GameActionRequest,
) -> Result<(), ServiceError> {
    {
        let mut catalog = state.catalog().write().await;
        owned_quiz(&catalog, user_id, quiz_id)?;

        if catalog.game_in_quiz(quiz_id, game_id).is_none() {
            return Err(ServiceError::InvalidGameId(
                "game does not exist in this quiz".into(),
            ));
        }

        let action: AdminAction = request.action.parse()?;

        let game = catalog
            .game_in_quiz_mut(quiz_id, game_id)
            .expect("game existence checked above");
        let next = compute_transition(game.phase, action, game.has_next_question())?;

        apply_action(state, game, action, next);
        debug!(game_id, ?action, phase = ?game.phase, "applied game action");
    }

    state.persist().await;
    Ok(())
}

/// Report a game's phase, question position, players, and snapshot metadata.
pub async fn game_status(
    state: &SharedState,
    user_id: u64,
    quiz_id: u64,
    game_id: u64,
) -> Result<GameStatusResponse, ServiceError> {
    let catalog = state.catalog().read().await;
    owned_quiz(&catalog, user_id, quiz_id)?;

    let game = catalog.game_in_quiz(quiz_id, game_id).ok_or_else(|| {
        ServiceError::InvalidGameId("game id does not refer to a valid game within this quiz".into())
    })?;

    Ok(game.into())
}

/// Serve the stored final results of a game that has reached FINAL_RESULTS.
pub async fn game_results(
    state: &SharedState,
    user_id: u64,
    quiz_id: u64,
    game_id: u64,
) -> Result<GameResultsResponse, ServiceError> {
    let catalog = state.catalog().read().await;
    owned_quiz(&catalog, user_id, quiz_id)?;

    let game = catalog.game_in_quiz(quiz_id, game_id).ok_or_else(|| {
        ServiceError::InvalidGameId("game id does not refer to a valid game within this quiz".into())
    })?;

    if game.phase != GamePhase::FinalResults {
        return Err(ServiceError::IncompatibleGameState(
            "game is not in FINAL_RESULTS state".into(),
        ));
    }

    let final_results = game.final_results.as_ref().ok_or_else(|| {
        ServiceError::IncompatibleGameState("game is not in FINAL_RESULTS state".into())
    })?;

    Ok(final_results.into())
}

/// Perform the side effects of a validated transition.
///
/// Any pending timer is cancelled first; NEXT_QUESTION and SKIP_COUNTDOWN
/// arm the next one, so exactly one timer is pending per game at any time.
fn apply_action(state: &SharedState, game: &mut Game, action: AdminAction, next: GamePhase) {
    game.timer.cancel();

    match action {
        AdminAction::NextQuestion => {
            if game.phase != GamePhase::Lobby {
                game.current_question_index += 1;
            }
            game.phase = next;
            schedule_phase_timeout(state, game, state.config().countdown());
        }
        AdminAction::SkipCountdown => {
            game.phase = next;
            let limit = game
                .current_question()
                .map(|question| question.time_limit)
                .unwrap_or_default();
            schedule_phase_timeout(state, game, Duration::from_secs(limit));
        }
        AdminAction::GoToAnswer => {
            game.phase = next;
            if let Some(question) = game.current_question().cloned() {
                let computed = results::question_results(game, &question);
                game.store_question_results(computed);
            }
        }
        AdminAction::GoToFinalResults => {
            game.phase = next;
            game.final_results = Some(results::final_results(game));
        }
        AdminAction::End => {
            game.phase = next;
            game.time_ended = Some(now_secs());
        }
    }
}

/// Arm the game's timer slot with a one-shot phase timeout.
fn schedule_phase_timeout(state: &SharedState, game: &mut Game, delay: Duration) {
    game.timer.cancel();
    let seq = game.timer.seq();
    let state = Arc::clone(state);
    let game_id = game.game_id;

    let handle = tokio::spawn(async move {
        tokio::time::sleep(delay).await;
        handle_phase_timeout(state, game_id, seq).await;
    })
    .abort_handle();
    game.timer.arm(handle);
}

/// Timer callback advancing a game past an expired countdown or question.
///
/// The sequence check under the write lock makes cancellation unconditional:
/// a timer superseded by a manual action finds a newer sequence and backs
/// out without touching the game.
async fn handle_phase_timeout(state: SharedState, game_id: u64, seq: u64) {
    let advanced = {
        let mut catalog = state.catalog().write().await;
        let Some(game) = catalog.games.get_mut(&game_id) else {
            return;
        };
        if !game.timer.matches(seq) {
            debug!(game_id, "stale phase timer ignored");
            return;
        }

        // The slot still holds this callback's own handle; disarm rather
        // than cancel so the running task is not aborted mid-flight.
        match game.phase {
            GamePhase::QuestionCountdown => {
                game.timer.disarm();
                game.phase = GamePhase::QuestionOpen;
                let limit = game
                    .current_question()
                    .map(|question| question.time_limit)
                    .unwrap_or_default();
                schedule_phase_timeout(&state, game, Duration::from_secs(limit));
                debug!(game_id, "countdown expired; question opened");
                true
            }
            GamePhase::QuestionOpen => {
                game.timer.disarm();
                game.phase = GamePhase::QuestionClose;
                debug!(game_id, "question duration expired; question closed");
                true
            }
            _ => false,
        }
    };

    if advanced {
        state.persist().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::testing::{
        act, open_user, phase_of, seed_quiz, start_game, test_state, two_option_question,
    };

    async fn seeded(state: &SharedState) -> (u64, u64) {
        let user_id = open_user(state);
        let quiz_id = seed_quiz(
            state,
            user_id,
            vec![
                two_option_question("Capital of France?", 30, 5),
                two_option_question("Capital of Italy?", 40, 10),
            ],
        )
        .await;
        (user_id, quiz_id)
    }

    async fn update(
        state: &SharedState,
        user_id: u64,
        quiz_id: u64,
        game_id: u64,
        action: &str,
    ) -> Result<(), ServiceError> {
        update_game_state(
            state,
            user_id,
            quiz_id,
            game_id,
            GameActionRequest {
                action: action.into(),
            },
        )
        .await
    }

    #[tokio::test(start_paused = true)]
    async fn game_ids_allocate_monotonically() {
        let state = test_state();
        let (user_id, quiz_id) = seeded(&state).await;

        assert_eq!(start_game(&state, user_id, quiz_id).await, 1);
        assert_eq!(start_game(&state, user_id, quiz_id).await, 2);

        let list = list_games(&state, user_id, quiz_id).await.unwrap();
        assert_eq!(list.active_games, vec![1, 2]);
        assert!(list.inactive_games.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn start_rejects_empty_quiz() {
        let state = test_state();
        let user_id = open_user(&state);
        let quiz_id = seed_quiz(&state, user_id, Vec::new()).await;

        let err = super::start_game(
            &state,
            user_id,
            quiz_id,
            StartGameRequest {
                auto_start_num: None,
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(err, ServiceError::QuizIsEmpty(_)));
    }

    #[tokio::test(start_paused = true)]
    async fn start_rejects_auto_start_above_cap() {
        let state = test_state();
        let (user_id, quiz_id) = seeded(&state).await;

        let err = super::start_game(
            &state,
            user_id,
            quiz_id,
            StartGameRequest {
                auto_start_num: Some(51),
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(err, ServiceError::InvalidGame(_)));

        // The cap itself is accepted and recorded.
        let response = super::start_game(
            &state,
            user_id,
            quiz_id,
            StartGameRequest {
                auto_start_num: Some(50),
            },
        )
        .await
        .unwrap();
        let catalog = state.catalog().read().await;
        assert_eq!(catalog.games.get(&response.game_id).unwrap().auto_start_num, 50);
    }

    #[tokio::test(start_paused = true)]
    async fn start_caps_active_games_and_frees_after_end() {
        let state = test_state();
        let (user_id, quiz_id) = seeded(&state).await;

        for _ in 0..10 {
            start_game(&state, user_id, quiz_id).await;
        }

        let err = super::start_game(
            &state,
            user_id,
            quiz_id,
            StartGameRequest {
                auto_start_num: None,
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(err, ServiceError::MaxActiveGames(_)));

        act(&state, user_id, quiz_id, 1, "END").await;
        assert_eq!(start_game(&state, user_id, quiz_id).await, 11);

        let list = list_games(&state, user_id, quiz_id).await.unwrap();
        assert_eq!(list.inactive_games, vec![1]);
        assert_eq!(list.active_games.len(), 10);
    }

    #[tokio::test(start_paused = true)]
    async fn foreign_quizzes_are_invisible() {
        let state = test_state();
        let (owner, quiz_id) = seeded(&state).await;
        let intruder = open_user(&state);
        let game_id = start_game(&state, owner, quiz_id).await;

        let err = super::start_game(
            &state,
            intruder,
            quiz_id,
            StartGameRequest {
                auto_start_num: None,
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(err, ServiceError::InvalidQuizId(_)));

        let err = game_status(&state, intruder, quiz_id, game_id)
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::InvalidQuizId(_)));
    }

    #[tokio::test(start_paused = true)]
    async fn unknown_game_checked_before_action_string() {
        let state = test_state();
        let (user_id, quiz_id) = seeded(&state).await;

        let err = update(&state, user_id, quiz_id, 99, "FREEZE").await.unwrap_err();
        assert!(matches!(err, ServiceError::InvalidGameId(_)));

        let game_id = start_game(&state, user_id, quiz_id).await;
        let err = update(&state, user_id, quiz_id, game_id, "FREEZE")
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::InvalidAction(_)));
    }

    #[tokio::test(start_paused = true)]
    async fn countdown_and_question_timers_advance_phases() {
        let state = test_state();
        let (user_id, quiz_id) = seeded(&state).await;
        let game_id = start_game(&state, user_id, quiz_id).await;

        act(&state, user_id, quiz_id, game_id, "NEXT_QUESTION").await;
        assert_eq!(phase_of(&state, game_id).await, GamePhase::QuestionCountdown);

        tokio::time::sleep(Duration::from_millis(3_100)).await;
        assert_eq!(phase_of(&state, game_id).await, GamePhase::QuestionOpen);

        // First question stays open for its 30-second limit.
        tokio::time::sleep(Duration::from_secs(31)).await;
        assert_eq!(phase_of(&state, game_id).await, GamePhase::QuestionClose);
    }

    #[tokio::test(start_paused = true)]
    async fn skip_countdown_supersedes_pending_countdown_timer() {
        let state = test_state();
        let (user_id, quiz_id) = seeded(&state).await;
        let game_id = start_game(&state, user_id, quiz_id).await;

        act(&state, user_id, quiz_id, game_id, "NEXT_QUESTION").await;
        act(&state, user_id, quiz_id, game_id, "SKIP_COUNTDOWN").await;
        assert_eq!(phase_of(&state, game_id).await, GamePhase::QuestionOpen);

        // Where the cancelled countdown would have fired, nothing happens:
        // the question keeps running on its own 30-second timer.
        tokio::time::sleep(Duration::from_millis(3_100)).await;
        assert_eq!(phase_of(&state, game_id).await, GamePhase::QuestionOpen);

        tokio::time::sleep(Duration::from_secs(28)).await;
        assert_eq!(phase_of(&state, game_id).await, GamePhase::QuestionClose);
    }

    #[tokio::test(start_paused = true)]
    async fn go_to_answer_cancels_question_timer() {
        let state = test_state();
        let (user_id, quiz_id) = seeded(&state).await;
        let game_id = start_game(&state, user_id, quiz_id).await;

        act(&state, user_id, quiz_id, game_id, "NEXT_QUESTION").await;
        act(&state, user_id, quiz_id, game_id, "SKIP_COUNTDOWN").await;
        act(&state, user_id, quiz_id, game_id, "GO_TO_ANSWER").await;
        assert_eq!(phase_of(&state, game_id).await, GamePhase::AnswerShow);

        // The question-duration timer must not fire after the manual move.
        tokio::time::sleep(Duration::from_secs(60)).await;
        assert_eq!(phase_of(&state, game_id).await, GamePhase::AnswerShow);
    }

    #[tokio::test(start_paused = true)]
    async fn next_question_rejected_on_last_question() {
        let state = test_state();
        let user_id = open_user(&state);
        let quiz_id = seed_quiz(
            &state,
            user_id,
            vec![two_option_question("Capital of France?", 30, 5)],
        )
        .await;
        let game_id = start_game(&state, user_id, quiz_id).await;

        act(&state, user_id, quiz_id, game_id, "NEXT_QUESTION").await;
        act(&state, user_id, quiz_id, game_id, "SKIP_COUNTDOWN").await;
        act(&state, user_id, quiz_id, game_id, "GO_TO_ANSWER").await;

        let err = update(&state, user_id, quiz_id, game_id, "NEXT_QUESTION")
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::IncompatibleGameState(_)));
        assert_eq!(phase_of(&state, game_id).await, GamePhase::AnswerShow);

        let catalog = state.catalog().read().await;
        assert_eq!(catalog.games.get(&game_id).unwrap().current_question_index, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn end_is_reachable_from_lobby_and_terminal() {
        let state = test_state();
        let (user_id, quiz_id) = seeded(&state).await;
        let game_id = start_game(&state, user_id, quiz_id).await;

        act(&state, user_id, quiz_id, game_id, "END").await;
        assert_eq!(phase_of(&state, game_id).await, GamePhase::End);

        let catalog = state.catalog().read().await;
        assert!(catalog.games.get(&game_id).unwrap().time_ended.is_some());
        drop(catalog);

        for action in [
            "NEXT_QUESTION",
            "SKIP_COUNTDOWN",
            "GO_TO_ANSWER",
            "GO_TO_FINAL_RESULTS",
            "END",
        ] {
            let err = update(&state, user_id, quiz_id, game_id, action)
                .await
                .unwrap_err();
            assert!(matches!(err, ServiceError::IncompatibleGameState(_)));
        }
    }

    #[tokio::test(start_paused = true)]
    async fn results_require_final_results_phase_and_stay_identical() {
        let state = test_state();
        let (user_id, quiz_id) = seeded(&state).await;
        let game_id = start_game(&state, user_id, quiz_id).await;

        let err = game_results(&state, user_id, quiz_id, game_id)
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::IncompatibleGameState(_)));

        act(&state, user_id, quiz_id, game_id, "NEXT_QUESTION").await;
        act(&state, user_id, quiz_id, game_id, "SKIP_COUNTDOWN").await;
        act(&state, user_id, quiz_id, game_id, "GO_TO_ANSWER").await;
        act(&state, user_id, quiz_id, game_id, "GO_TO_FINAL_RESULTS").await;

        let first = game_results(&state, user_id, quiz_id, game_id).await.unwrap();
        let second = game_results(&state, user_id, quiz_id, game_id).await.unwrap();
        assert_eq!(
            serde_json::to_string(&first).unwrap(),
            serde_json::to_string(&second).unwrap()
        );
        // One entry per snapshot question, answered or not.
        assert_eq!(first.question_results.len(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn status_reports_snapshot_metadata() {
        let state = test_state();
        let (user_id, quiz_id) = seeded(&state).await;
        let game_id = start_game(&state, user_id, quiz_id).await;

        let status = game_status(&state, user_id, quiz_id, game_id).await.unwrap();
        assert_eq!(status.state, GamePhase::Lobby);
        assert_eq!(status.at_question, 1);
        assert!(status.players.is_empty());
        assert_eq!(status.metadata.num_questions, 2);
        assert_eq!(status.metadata.name, "Capitals");
    }
}
