//! Player-facing game operations: guest join, answer submission, and the
//! question/results queries. Players carry no session token; the player id
//! handed out at join time is the credential for everything that follows.

use std::collections::HashSet;

use rand::Rng;

use crate::{
    dto::{
        common::{GameResultsResponse, QuestionResultsDto},
        player::{
            JoinGameRequest, JoinGameResponse, PlayerStatusResponse, QuestionInfoResponse,
            SubmitAnswersRequest,
        },
    },
    error::ServiceError,
    state::{
        Catalog, SharedState,
        game::{Game, Player, PlayerAnswer, QuestionResults},
        machine::GamePhase,
        now_millis, now_secs,
    },
};

/// Join a game lobby as an anonymous guest.
///
/// An empty desired name is replaced with a generated one (five lowercase
/// letters followed by three digits, regenerated until no character repeats
/// and the name is unused in this game). A supplied name must be
/// alphanumeric/spaces and unused. Player ids are assigned sequentially and
/// never reused.
pub async fn join_game(
    state: &SharedState,
    request: JoinGameRequest,
) -> Result<JoinGameResponse, ServiceError> {
    let player_id = {
        let mut catalog = state.catalog().write().await;
        let Some(game) = catalog.games.get_mut(&request.game_id) else {
            return Err(ServiceError::InvalidGameId(
                "game id does not refer to a valid game".into(),
            ));
        };

        if game.phase != GamePhase::Lobby {
            return Err(ServiceError::IncompatibleGameState(
                "game is not in LOBBY state".into(),
            ));
        }

        let player_name = if request.player_name.is_empty() {
            generate_unique_guest_name(game)
        } else {
            if game
                .players
                .iter()
                .any(|player| player.player_name == request.player_name)
            {
                return Err(ServiceError::InvalidPlayerName(
                    "name is already in use in this game".into(),
                ));
            }
            if !is_valid_player_name(&request.player_name) {
                return Err(ServiceError::InvalidPlayerName(
                    "name contains invalid characters; valid characters are alphanumeric and spaces"
                        .into(),
                ));
            }
            request.player_name
        };

        let player_id = game.players.len() as u64 + 1;
        game.players.push(Player {
            player_id,
            player_name,
            game_id: game.game_id,
        });
        player_id
    };

    state.persist().await;
    Ok(JoinGameResponse { player_id })
}

/// Report the phase and question progress of the game a player is in.
pub async fn player_status(
    state: &SharedState,
    player_id: u64,
) -> Result<PlayerStatusResponse, ServiceError> {
    let catalog = state.catalog().read().await;
    let game = resolve_player(&catalog, player_id)?;
    Ok(game.into())
}

/// Return the current question as shown to players, without correctness
/// flags.
pub async fn question_info(
    state: &SharedState,
    player_id: u64,
    question_position: u64,
) -> Result<QuestionInfoResponse, ServiceError> {
    let catalog = state.catalog().read().await;
    let game = resolve_player(&catalog, player_id)?;

    check_position_range(game, question_position)?;
    check_position_current(game, question_position)?;

    match game.phase {
        GamePhase::QuestionOpen | GamePhase::QuestionClose | GamePhase::AnswerShow => {}
        _ => {
            return Err(ServiceError::IncompatibleGameState(
                "question information is not available in the game's current state".into(),
            ));
        }
    }

    let question = game.current_question().ok_or_else(invalid_position)?;
    Ok(question.into())
}

/// Record a player's answer for the question the game is currently on.
///
/// The submission is only legal while the question is open; resubmitting
/// replaces the earlier entry in place, so at most one answer per player is
/// recorded per question. Correctness requires the submitted id set to
/// equal the question's correct set exactly; there is no partial credit.
pub async fn submit_answer(
    state: &SharedState,
    player_id: u64,
    question_position: u64,
    request: SubmitAnswersRequest,
) -> Result<(), ServiceError> {
    if question_position < 1 {
        return Err(invalid_position());
    }

    {
        let mut catalog = state.catalog().write().await;
        let game = catalog
            .find_game_from_player_mut(player_id)
            .ok_or_else(|| ServiceError::InvalidPlayerId("player id does not exist".into()))?;

        check_position_range(game, question_position)?;
        check_position_current(game, question_position)?;

        if game.phase != GamePhase::QuestionOpen {
            return Err(ServiceError::IncompatibleGameState(
                "game is not in QUESTION_OPEN state".into(),
            ));
        }

        let question = game.current_question().ok_or_else(invalid_position)?;

        let answer_ids = request.answer_ids;
        if answer_ids.is_empty() {
            return Err(ServiceError::InvalidAnswerIds(
                "at least one answer id must be submitted".into(),
            ));
        }

        let unique: HashSet<u64> = answer_ids.iter().copied().collect();
        if unique.len() != answer_ids.len() {
            return Err(ServiceError::InvalidAnswerIds(
                "duplicate answer ids provided".into(),
            ));
        }

        if answer_ids.iter().any(|id| !question.has_answer_id(*id)) {
            return Err(ServiceError::InvalidAnswerIds(
                "one or more answer ids are not valid for this question".into(),
            ));
        }

        let correct_ids = question.correct_answer_ids();
        let question_id = question.question_id;
        let points = question.points;

        let is_correct = correct_ids.len() == answer_ids.len()
            && answer_ids.iter().all(|id| correct_ids.contains(id));

        let submission = PlayerAnswer {
            player_id,
            answer_ids,
            submitted_at: now_secs(),
            is_correct,
            points_awarded: if is_correct { points } else { 0 },
        };

        let batch = game.submission_batch_mut(question_id, now_millis());
        match batch
            .submissions
            .iter_mut()
            .find(|existing| existing.player_id == player_id)
        {
            Some(existing) => *existing = submission,
            None => batch.submissions.push(submission),
        }
    }

    state.persist().await;
    Ok(())
}

/// Serve the per-question statistics while the answer is on display.
pub async fn question_results(
    state: &SharedState,
    player_id: u64,
    question_position: u64,
) -> Result<QuestionResultsDto, ServiceError> {
    let catalog = state.catalog().read().await;
    let game = resolve_player(&catalog, player_id)?;

    if game.phase != GamePhase::AnswerShow {
        return Err(ServiceError::IncompatibleGameState(
            "game is not in ANSWER_SHOW state".into(),
        ));
    }

    check_position_range(game, question_position)?;
    check_position_current(game, question_position)?;

    let question = game.current_question().ok_or_else(invalid_position)?;
    match game.stored_question_results(question.question_id) {
        Some(stored) => Ok(stored.into()),
        None => Ok((&QuestionResults::empty(question.question_id)).into()),
    }
}

/// Serve the stored final results of the game a player is in.
pub async fn final_results(
    state: &SharedState,
    player_id: u64,
) -> Result<GameResultsResponse, ServiceError> {
    let catalog = state.catalog().read().await;
    let game = resolve_player(&catalog, player_id)?;

    if game.phase != GamePhase::FinalResults {
        return Err(ServiceError::IncompatibleGameState(
            "game is not in FINAL_RESULTS state".into(),
        ));
    }

    let stored = game.final_results.as_ref().ok_or_else(|| {
        ServiceError::IncompatibleGameState("game is not in FINAL_RESULTS state".into())
    })?;

    Ok(stored.into())
}

fn resolve_player<'a>(catalog: &'a Catalog, player_id: u64) -> Result<&'a Game, ServiceError> {
    catalog
        .find_game_from_player(player_id)
        .ok_or_else(|| ServiceError::InvalidPlayerId("player id does not exist".into()))
}

fn invalid_position() -> ServiceError {
    ServiceError::InvalidPosition("question position is not valid for this game".into())
}

fn check_position_range(game: &Game, question_position: u64) -> Result<(), ServiceError> {
    let num_questions = game.snapshot.questions.len() as u64;
    if question_position < 1 || question_position > num_questions {
        return Err(invalid_position());
    }
    Ok(())
}

fn check_position_current(game: &Game, question_position: u64) -> Result<(), ServiceError> {
    if game.current_question_index as u64 + 1 != question_position {
        return Err(ServiceError::InvalidPosition(
            "game is not currently on this question".into(),
        ));
    }
    Ok(())
}

fn is_valid_player_name(name: &str) -> bool {
    name.chars()
        .all(|ch| ch.is_ascii_alphanumeric() || ch == ' ')
}

fn has_repeated_chars(name: &str) -> bool {
    let mut seen = HashSet::new();
    name.chars().any(|ch| !seen.insert(ch))
}

fn random_guest_name(rng: &mut impl Rng) -> String {
    let mut name = String::with_capacity(8);
    for _ in 0..5 {
        name.push(rng.random_range(b'a'..=b'z') as char);
    }
    for _ in 0..3 {
        name.push(rng.random_range(b'0'..=b'9') as char);
    }
    name
}

/// Generate a guest name that has no repeated character and is unused in
/// `game`.
fn generate_unique_guest_name(game: &Game) -> String {
    let mut rng = rand::rng();
    loop {
        let candidate = random_guest_name(&mut rng);
        if has_repeated_chars(&candidate) {
            continue;
        }
        if game
            .players
            .iter()
            .any(|player| player.player_name == candidate)
        {
            continue;
        }
        return candidate;
    }
}
