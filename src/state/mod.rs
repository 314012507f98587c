//! Shared application state: the quiz/game catalog and the session registry.

pub mod game;
pub mod machine;
pub mod timer;

use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use indexmap::IndexMap;
use tokio::sync::RwLock;
use tracing::warn;

use crate::{
    config::AppConfig,
    dao::{models::CatalogEntity, storage::GameStore},
    services::identity::SessionRegistry,
    state::game::{Game, QuizDef},
};

/// Shared handle to the application state.
pub type SharedState = Arc<AppState>;

/// In-memory catalog of quiz definitions and game sessions.
///
/// Every operation on the catalog runs under the [`AppState`] lock for its
/// whole validate-then-mutate span, so admin actions, player submissions,
/// and timer firings never interleave on the same game.
#[derive(Debug, Default)]
pub struct Catalog {
    /// Registered quizzes keyed by id, in registration order.
    pub quizzes: IndexMap<u64, QuizDef>,
    /// Games keyed by id, in creation order. Ended games are retained for
    /// historical results queries.
    pub games: IndexMap<u64, Game>,
}

impl Catalog {
    /// Next quiz id to allocate (max existing + 1; ids are never reused).
    pub fn next_quiz_id(&self) -> u64 {
        self.quizzes.keys().max().map_or(1, |max| max + 1)
    }

    /// Next game id to allocate (max existing + 1; ids are never reused).
    pub fn next_game_id(&self) -> u64 {
        self.games.keys().max().map_or(1, |max| max + 1)
    }

    /// Look up a quiz by id.
    pub fn quiz(&self, quiz_id: u64) -> Option<&QuizDef> {
        self.quizzes.get(&quiz_id)
    }

    /// Look up a game by id, scoped to its owning quiz.
    pub fn game_in_quiz(&self, quiz_id: u64, game_id: u64) -> Option<&Game> {
        self.games
            .get(&game_id)
            .filter(|game| game.quiz_id == quiz_id)
    }

    /// Mutable variant of [`game_in_quiz`](Self::game_in_quiz).
    pub fn game_in_quiz_mut(&mut self, quiz_id: u64, game_id: u64) -> Option<&mut Game> {
        self.games
            .get_mut(&game_id)
            .filter(|game| game.quiz_id == quiz_id)
    }

    /// Number of games of `quiz_id` that have not reached the terminal phase.
    pub fn active_game_count(&self, quiz_id: u64) -> usize {
        self.games
            .values()
            .filter(|game| game.quiz_id == quiz_id && game.is_active())
            .count()
    }

    /// Resolve the game a player joined. This is the single identity
    /// mechanism for player-facing operations: the player id itself is the
    /// bearer credential.
    pub fn find_game_from_player(&self, player_id: u64) -> Option<&Game> {
        self.games
            .values()
            .find(|game| game.players.iter().any(|p| p.player_id == player_id))
    }

    /// Mutable variant of [`find_game_from_player`](Self::find_game_from_player).
    pub fn find_game_from_player_mut(&mut self, player_id: u64) -> Option<&mut Game> {
        self.games
            .values_mut()
            .find(|game| game.players.iter().any(|p| p.player_id == player_id))
    }
}

/// Central application state shared across routes, services, and timer tasks.
pub struct AppState {
    config: AppConfig,
    sessions: SessionRegistry,
    store: RwLock<Option<Arc<dyn GameStore>>>,
    catalog: RwLock<Catalog>,
}

impl AppState {
    /// Construct a new [`AppState`] wrapped in an [`Arc`] so it can be
    /// cloned cheaply into timer tasks and middleware.
    pub fn new(config: AppConfig) -> SharedState {
        Arc::new(Self {
            config,
            sessions: SessionRegistry::default(),
            store: RwLock::new(None),
            catalog: RwLock::new(Catalog::default()),
        })
    }

    /// Immutable runtime configuration.
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Registry of admin bearer sessions.
    pub fn sessions(&self) -> &SessionRegistry {
        &self.sessions
    }

    /// Lock guarding the quiz/game catalog.
    pub fn catalog(&self) -> &RwLock<Catalog> {
        &self.catalog
    }

    /// Install the persistence backend.
    pub async fn install_store(&self, store: Arc<dyn GameStore>) {
        let mut guard = self.store.write().await;
        *guard = Some(store);
    }

    /// Obtain a handle to the persistence backend, if one is installed.
    pub async fn store(&self) -> Option<Arc<dyn GameStore>> {
        let guard = self.store.read().await;
        guard.as_ref().cloned()
    }

    /// Replace the in-memory catalog with a persisted snapshot.
    pub async fn restore(&self, snapshot: CatalogEntity) {
        let mut guard = self.catalog.write().await;
        *guard = snapshot.into();
    }

    /// Write the current catalog through the installed store.
    ///
    /// Persistence failures are logged, not surfaced: every core failure is
    /// a deterministic validation failure, and a completed operation is not
    /// retracted because the snapshot could not be written.
    pub async fn persist(&self) {
        let Some(store) = self.store().await else {
            return;
        };

        let snapshot = {
            let catalog = self.catalog.read().await;
            CatalogEntity::from(&*catalog)
        };

        if let Err(err) = store.save_snapshot(snapshot).await {
            warn!(error = %err, "failed to persist catalog snapshot");
        }
    }
}

/// Seconds since the Unix epoch.
pub fn now_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}

/// Milliseconds since the Unix epoch.
pub fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}
