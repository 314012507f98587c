use axum::{
    Json, Router,
    extract::{Path, State},
    routing::{get, post, put},
};

use crate::{
    dto::{
        common::{Empty, GameResultsResponse, QuestionResultsDto},
        player::{
            JoinGameRequest, JoinGameResponse, PlayerStatusResponse, QuestionInfoResponse,
            SubmitAnswersRequest,
        },
    },
    error::ServiceError,
    services::player_service,
    state::SharedState,
};

/// Guest-facing endpoints: join, answer, and query progress/results.
///
/// No session middleware applies here; the player id in the path is the
/// credential.
pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/play/join", post(join_game))
        .route("/play/{player_id}", get(player_status))
        .route(
            "/play/{player_id}/question/{question_position}",
            get(question_info),
        )
        .route(
            "/play/{player_id}/question/{question_position}/answer",
            put(submit_answer),
        )
        .route(
            "/play/{player_id}/question/{question_position}/results",
            get(question_results),
        )
        .route("/play/{player_id}/results", get(final_results))
}

/// Join a game lobby as an anonymous guest.
#[utoipa::path(
    post,
    path = "/play/join",
    tag = "play",
    request_body = JoinGameRequest,
    responses((status = 200, description = "Joined the game", body = JoinGameResponse))
)]
pub async fn join_game(
    State(state): State<SharedState>,
    Json(payload): Json<JoinGameRequest>,
) -> Result<Json<JoinGameResponse>, ServiceError> {
    Ok(Json(player_service::join_game(&state, payload).await?))
}

/// Report the phase and question progress of the player's game.
#[utoipa::path(
    get,
    path = "/play/{player_id}",
    tag = "play",
    params(("player_id" = u64, Path, description = "Identifier returned by /play/join")),
    responses((status = 200, description = "Player status", body = PlayerStatusResponse))
)]
pub async fn player_status(
    State(state): State<SharedState>,
    Path(player_id): Path<u64>,
) -> Result<Json<PlayerStatusResponse>, ServiceError> {
    Ok(Json(player_service::player_status(&state, player_id).await?))
}

/// Return the current question without correctness flags.
#[utoipa::path(
    get,
    path = "/play/{player_id}/question/{question_position}",
    tag = "play",
    params(("player_id" = u64, Path, description = "Identifier returned by /play/join"),
    ("question_position" = u64, Path, description = "1-based question position")),
    responses((status = 200, description = "Question information", body = QuestionInfoResponse))
)]
pub async fn question_info(
    State(state): State<SharedState>,
    Path((player_id, question_position)): Path<(u64, u64)>,
) -> Result<Json<QuestionInfoResponse>, ServiceError> {
    Ok(Json(
        player_service::question_info(&state, player_id, question_position).await?,
    ))
}

/// Submit the player's chosen answer ids for the open question.
#[utoipa::path(
    put,
    path = "/play/{player_id}/question/{question_position}/answer",
    tag = "play",
    params(("player_id" = u64, Path, description = "Identifier returned by /play/join"),
    ("question_position" = u64, Path, description = "1-based question position")),
    request_body = SubmitAnswersRequest,
    responses((status = 200, description = "Answer recorded", body = Empty))
)]
pub async fn submit_answer(
    State(state): State<SharedState>,
    Path((player_id, question_position)): Path<(u64, u64)>,
    Json(payload): Json<SubmitAnswersRequest>,
) -> Result<Json<Empty>, ServiceError> {
    player_service::submit_answer(&state, player_id, question_position, payload).await?;
    Ok(Json(Empty {}))
}

/// Serve the statistics of the current question during answer reveal.
#[utoipa::path(
    get,
    path = "/play/{player_id}/question/{question_position}/results",
    tag = "play",
    params(("player_id" = u64, Path, description = "Identifier returned by /play/join"),
    ("question_position" = u64, Path, description = "1-based question position")),
    responses((status = 200, description = "Question results", body = QuestionResultsDto))
)]
pub async fn question_results(
    State(state): State<SharedState>,
    Path((player_id, question_position)): Path<(u64, u64)>,
) -> Result<Json<QuestionResultsDto>, ServiceError> {
    Ok(Json(
        player_service::question_results(&state, player_id, question_position).await?,
    ))
}

/// Serve the final results of the player's game.
#[utoipa::path(
    get,
    path = "/play/{player_id}/results",
    tag = "play",
    params(("player_id" = u64, Path, description = "Identifier returned by /play/join")),
    responses((status = 200, description = "Final results", body = GameResultsResponse))
)]
pub async fn final_results(
    State(state): State<SharedState>,
    Path(player_id): Path<u64>,
) -> Result<Json<GameResultsResponse>, ServiceError> {
    Ok(Json(player_service::final_results(&state, player_id).await?))
}
