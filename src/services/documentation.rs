use utoipa::OpenApi;

#[derive(OpenApi)]
/// Aggregated OpenAPI specification for Hotseat Back.
#[openapi(
    paths(
        crate::routes::health::healthcheck,
        crate::routes::admin::open_session,
        crate::routes::admin::register_quiz,
        crate::routes::admin::quiz_info,
        crate::routes::admin::start_game,
        crate::routes::admin::list_games,
        crate::routes::admin::update_game_state,
        crate::routes::admin::game_status,
        crate::routes::admin::game_results,
        crate::routes::player::join_game,
        crate::routes::player::player_status,
        crate::routes::player::question_info,
        crate::routes::player::submit_answer,
        crate::routes::player::question_results,
        crate::routes::player::final_results,
    ),
    components(
        schemas(
            crate::dto::health::HealthResponse,
            crate::dto::admin::SessionResponse,
            crate::dto::admin::StartGameRequest,
            crate::dto::admin::StartGameResponse,
            crate::dto::admin::GameActionRequest,
            crate::dto::admin::GameListResponse,
            crate::dto::admin::GameStatusResponse,
            crate::dto::common::Empty,
            crate::dto::common::PlayerScoreDto,
            crate::dto::common::QuestionResultsDto,
            crate::dto::common::GameResultsResponse,
            crate::dto::quiz::QuizInput,
            crate::dto::quiz::QuestionInput,
            crate::dto::quiz::AnswerOptionInput,
            crate::dto::quiz::QuizSummary,
            crate::dto::quiz::QuestionSummary,
            crate::dto::quiz::AnswerOptionSummary,
            crate::dto::player::JoinGameRequest,
            crate::dto::player::JoinGameResponse,
            crate::dto::player::PlayerStatusResponse,
            crate::dto::player::QuestionInfoResponse,
            crate::dto::player::AnswerOptionInfo,
            crate::dto::player::SubmitAnswersRequest,
            crate::state::machine::GamePhase,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "admin", description = "Quiz catalog and game management for administrators"),
        (name = "play", description = "Guest join, answer submission, and result queries"),
    )
)]
pub struct ApiDoc;
