use axum::{
    Json, Router,
    body::Body,
    extract::{Path, State},
    http::Request,
    middleware::{self, Next},
    response::Response,
    routing::{get, post},
};

use crate::{
    dto::{
        admin::{
            GameActionRequest, GameListResponse, GameStatusResponse, SessionResponse,
            StartGameRequest, StartGameResponse,
        },
        common::{Empty, GameResultsResponse},
        quiz::{QuizInput, QuizSummary},
    },
    error::ServiceError,
    services::{admin_service, quiz_service},
    state::SharedState,
};

const SESSION_TOKEN_HEADER: &str = "x-session-token";

/// Identity of the authenticated admin, resolved by the session middleware.
#[derive(Debug, Clone, Copy)]
pub struct AuthedUser(pub u64);

/// Admin endpoints for registering quizzes and driving game sessions.
pub fn router(state: SharedState) -> Router<SharedState> {
    let open = Router::new().route("/admin/session", post(open_session));

    let authed = Router::new()
        .route("/admin/quizzes", post(register_quiz))
        .route("/admin/quizzes/{quiz_id}", get(quiz_info))
        .route(
            "/admin/quizzes/{quiz_id}/games",
            get(list_games).post(start_game),
        )
        .route(
            "/admin/quizzes/{quiz_id}/games/{game_id}",
            get(game_status).put(update_game_state),
        )
        .route(
            "/admin/quizzes/{quiz_id}/games/{game_id}/results",
            get(game_results),
        )
        .route_layer(middleware::from_fn_with_state(state, require_session));

    open.merge(authed)
}

/// Open a fresh admin session and return its bearer token.
#[utoipa::path(
    post,
    path = "/admin/session",
    tag = "admin",
    responses((status = 200, description = "Session opened", body = SessionResponse))
)]
pub async fn open_session(State(state): State<SharedState>) -> Json<SessionResponse> {
    Json(admin_service::open_session(&state))
}

/// Register a quiz definition with the catalog.
#[utoipa::path(
    post,
    path = "/admin/quizzes",
    tag = "admin",
    params(("X-Session-Token" = String, Header, description = "Token issued by /admin/session")),
    request_body = QuizInput,
    responses((status = 200, description = "Quiz registered", body = QuizSummary))
)]
pub async fn register_quiz(
    State(state): State<SharedState>,
    axum::Extension(AuthedUser(user_id)): axum::Extension<AuthedUser>,
    Json(payload): Json<QuizInput>,
) -> Result<Json<QuizSummary>, ServiceError> {
    Ok(Json(
        quiz_service::register_quiz(&state, user_id, payload).await?,
    ))
}

/// Retrieve the full definition of a quiz the caller owns.
#[utoipa::path(
    get,
    path = "/admin/quizzes/{quiz_id}",
    tag = "admin",
    params(("X-Session-Token" = String, Header, description = "Token issued by /admin/session"),
    ("quiz_id" = u64, Path, description = "Identifier of the quiz")),
    responses((status = 200, description = "Quiz definition", body = QuizSummary))
)]
pub async fn quiz_info(
    State(state): State<SharedState>,
    axum::Extension(AuthedUser(user_id)): axum::Extension<AuthedUser>,
    Path(quiz_id): Path<u64>,
) -> Result<Json<QuizSummary>, ServiceError> {
    Ok(Json(quiz_service::quiz_info(&state, user_id, quiz_id).await?))
}

/// Start a new game session from a quiz.
#[utoipa::path(
    post,
    path = "/admin/quizzes/{quiz_id}/games",
    tag = "admin",
    params(("X-Session-Token" = String, Header, description = "Token issued by /admin/session"),
    ("quiz_id" = u64, Path, description = "Identifier of the quiz")),
    request_body = StartGameRequest,
    responses((status = 200, description = "Game started", body = StartGameResponse))
)]
pub async fn start_game(
    State(state): State<SharedState>,
    axum::Extension(AuthedUser(user_id)): axum::Extension<AuthedUser>,
    Path(quiz_id): Path<u64>,
    Json(payload): Json<StartGameRequest>,
) -> Result<Json<StartGameResponse>, ServiceError> {
    Ok(Json(
        admin_service::start_game(&state, user_id, quiz_id, payload).await?,
    ))
}

/// List a quiz's games, partitioned into active and ended.
#[utoipa::path(
    get,
    path = "/admin/quizzes/{quiz_id}/games",
    tag = "admin",
    params(("X-Session-Token" = String, Header, description = "Token issued by /admin/session"),
    ("quiz_id" = u64, Path, description = "Identifier of the quiz")),
    responses((status = 200, description = "Game id lists", body = GameListResponse))
)]
pub async fn list_games(
    State(state): State<SharedState>,
    axum::Extension(AuthedUser(user_id)): axum::Extension<AuthedUser>,
    Path(quiz_id): Path<u64>,
) -> Result<Json<GameListResponse>, ServiceError> {
    Ok(Json(
        admin_service::list_games(&state, user_id, quiz_id).await?,
    ))
}

/// Apply an admin action to a game's state machine.
#[utoipa::path(
    put,
    path = "/admin/quizzes/{quiz_id}/games/{game_id}",
    tag = "admin",
    params(("X-Session-Token" = String, Header, description = "Token issued by /admin/session"),
    ("quiz_id" = u64, Path, description = "Identifier of the quiz"),
    ("game_id" = u64, Path, description = "Identifier of the game")),
    request_body = GameActionRequest,
    responses((status = 200, description = "Action applied", body = Empty))
)]
pub async fn update_game_state(
    State(state): State<SharedState>,
    axum::Extension(AuthedUser(user_id)): axum::Extension<AuthedUser>,
    Path((quiz_id, game_id)): Path<(u64, u64)>,
    Json(payload): Json<GameActionRequest>,
) -> Result<Json<Empty>, ServiceError> {
    admin_service::update_game_state(&state, user_id, quiz_id, game_id, payload).await?;
    Ok(Json(Empty {}))
}

/// Report a game's phase, players, and snapshot metadata.
#[utoipa::path(
    get,
    path = "/admin/quizzes/{quiz_id}/games/{game_id}",
    tag = "admin",
    params(("X-Session-Token" = String, Header, description = "Token issued by /admin/session"),
    ("quiz_id" = u64, Path, description = "Identifier of the quiz"),
    ("game_id" = u64, Path, description = "Identifier of the game")),
    responses((status = 200, description = "Game status", body = GameStatusResponse))
)]
pub async fn game_status(
    State(state): State<SharedState>,
    axum::Extension(AuthedUser(user_id)): axum::Extension<AuthedUser>,
    Path((quiz_id, game_id)): Path<(u64, u64)>,
) -> Result<Json<GameStatusResponse>, ServiceError> {
    Ok(Json(
        admin_service::game_status(&state, user_id, quiz_id, game_id).await?,
    ))
}

/// Serve the final results of a game that reached FINAL_RESULTS.
#[utoipa::path(
    get,
    path = "/admin/quizzes/{quiz_id}/games/{game_id}/results",
    tag = "admin",
    params(("X-Session-Token" = String, Header, description = "Token issued by /admin/session"),
    ("quiz_id" = u64, Path, description = "Identifier of the quiz"),
    ("game_id" = u64, Path, description = "Identifier of the game")),
    responses((status = 200, description = "Final results", body = GameResultsResponse))
)]
pub async fn game_results(
    State(state): State<SharedState>,
    axum::Extension(AuthedUser(user_id)): axum::Extension<AuthedUser>,
    Path((quiz_id, game_id)): Path<(u64, u64)>,
) -> Result<Json<GameResultsResponse>, ServiceError> {
    Ok(Json(
        admin_service::game_results(&state, user_id, quiz_id, game_id).await?,
    ))
}

async fn require_session(
    State(state): State<SharedState>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, ServiceError> {
    let provided = req
        .headers()
        .get(SESSION_TOKEN_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(|value| value.to_owned())
        .ok_or_else(|| {
            ServiceError::Unauthorised("missing session token header `X-Session-Token`".into())
        })?;

    let user_id = state
        .sessions()
        .resolve(&provided)
        .ok_or_else(|| ServiceError::Unauthorised("session is empty or invalid".into()))?;

    req.extensions_mut().insert(AuthedUser(user_id));
    Ok(next.run(req).await)
}
