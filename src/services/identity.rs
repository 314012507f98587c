//! Stand-in identity collaborator issuing bearer session tokens for admins.

use std::sync::atomic::{AtomicU64, Ordering};

use dashmap::DashMap;
use uuid::Uuid;

/// Registry of admin bearer sessions.
///
/// The backend does not manage accounts: opening a session mints a fresh
/// user id, and the opaque token is the sole credential tying later
/// requests to it. Sessions live in memory only and are not persisted.
#[derive(Debug)]
pub struct SessionRegistry {
    sessions: DashMap<String, u64>,
    next_user_id: AtomicU64,
}

impl Default for SessionRegistry {
    fn default() -> Self {
        Self {
            sessions: DashMap::new(),
            next_user_id: AtomicU64::new(1),
        }
    }
}

impl SessionRegistry {
    /// Mint a new user id and the bearer token identifying it.
    pub fn open(&self) -> (String, u64) {
        let user_id = self.next_user_id.fetch_add(1, Ordering::Relaxed);
        let token = Uuid::new_v4().to_string();
        self.sessions.insert(token.clone(), user_id);
        (token, user_id)
    }

    /// Resolve a bearer token to the user id it was issued for.
    pub fn resolve(&self, token: &str) -> Option<u64> {
        self.sessions.get(token).map(|entry| *entry.value())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn opened_sessions_resolve_to_their_user() {
        let registry = SessionRegistry::default();
        let (token_a, user_a) = registry.open();
        let (token_b, user_b) = registry.open();

        assert_ne!(token_a, token_b);
        assert_ne!(user_a, user_b);
        assert_eq!(registry.resolve(&token_a), Some(user_a));
        assert_eq!(registry.resolve(&token_b), Some(user_b));
    }

    #[test]
    fn unknown_tokens_do_not_resolve() {
        let registry = SessionRegistry::default();
        assert_eq!(registry.resolve("not-a-token"), None);
    }
}
