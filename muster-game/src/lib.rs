//! Muster Companion Engine
//!
//! Platform-agnostic core logic for the Muster tabletop companion: the
//! play-session state machine, the army-list share codec, and the summary
//! derivations. No UI, network, or storage code lives here; hosts plug
//! those in through the traits at the bottom of this module.

pub mod actions;
pub mod events;
pub mod list;
pub mod mission;
pub mod session;
pub mod share;
pub mod state;
pub mod summary;

// Re-export commonly used types
pub use actions::{Action, PlayerPatch, apply};
pub use events::{GameEvent, GameEventKind};
pub use list::{SHARED_LIST_ID_PREFIX, SavedList, SelectedUnit};
pub use mission::{Mission, MissionData, ObjectiveMarker};
pub use session::GameSession;
pub use share::{decode_list, encode_list};
pub use state::{
    Faction, GamePhase, GameState, NOTE_FALLBACK_PLAYER_ID, Player, PlayerVerification, Turn,
    UNKNOWN_PLAYER_NAME, Unit,
};
pub use summary::{
    GameSummary, PlayerStanding, all_round_numbers, sort_players_by_score, summarize, winner,
};

/// Trait for abstracting army-list persistence
/// Host-specific implementations (local storage, hosted table) provide this
pub trait ListStore {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Persist a list under its id
    ///
    /// # Errors
    ///
    /// Returns an error if the list cannot be stored.
    fn save_list(&self, list: &SavedList) -> Result<(), Self::Error>;

    /// Load a list by id
    ///
    /// # Errors
    ///
    /// Returns an error if the backing store cannot be read.
    fn load_list(&self, id: &str) -> Result<Option<SavedList>, Self::Error>;

    /// Delete a list by id
    ///
    /// # Errors
    ///
    /// Returns an error if the list cannot be deleted.
    fn delete_list(&self, id: &str) -> Result<(), Self::Error>;
}

/// Trait for abstracting session snapshot persistence
pub trait SessionStore {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Persist a session snapshot under a caller-chosen key
    ///
    /// # Errors
    ///
    /// Returns an error if the snapshot cannot be stored.
    fn save_session(&self, key: &str, state: &GameState) -> Result<(), Self::Error>;

    /// Load a previously persisted session snapshot
    ///
    /// # Errors
    ///
    /// Returns an error if the backing store cannot be read.
    fn load_session(&self, key: &str) -> Result<Option<GameState>, Self::Error>;
}

/// Composition root tying list storage, session storage, and the codec
/// together for the host application.
pub struct CompanionEngine<L, S>
where
    L: ListStore,
    S: SessionStore,
{
    lists: L,
    sessions: S,
}

impl<L, S> CompanionEngine<L, S>
where
    L: ListStore,
    S: SessionStore,
{
    /// Create an engine around the provided stores
    pub const fn new(lists: L, sessions: S) -> Self {
        Self { lists, sessions }
    }

    /// Produce a share token for a stored list, if it exists.
    ///
    /// # Errors
    ///
    /// Returns an error if the list store cannot be read.
    pub fn share_token(&self, list_id: &str) -> Result<Option<String>, L::Error> {
        Ok(self
            .lists
            .load_list(list_id)?
            .as_ref()
            .map(encode_list))
    }

    /// Reconstruct a list from a share token. `None` means the token was
    /// malformed; the caller shows the "could not load" state.
    #[must_use]
    pub fn import_shared(&self, token: &str) -> Option<SavedList> {
        decode_list(token)
    }

    /// Persist the final state of a finished session and return its
    /// summary for display.
    ///
    /// # Errors
    ///
    /// Returns an error if the snapshot cannot be persisted.
    pub fn finish_session(
        &self,
        key: &str,
        session: GameSession,
    ) -> Result<GameSummary, anyhow::Error>
    where
        S::Error: Into<anyhow::Error>,
    {
        let state = session.into_state();
        self.sessions.save_session(key, &state).map_err(Into::into)?;
        Ok(summarize(&state))
    }

    /// Reload a persisted session snapshot into a live handle.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing store cannot be read.
    pub fn resume_session(&self, key: &str) -> Result<Option<GameSession>, S::Error> {
        Ok(self.sessions.load_session(key)?.map(GameSession::from_state))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::collections::HashMap;
    use std::convert::Infallible;
    use std::rc::Rc;

    #[derive(Clone, Default)]
    struct MemoryLists {
        lists: Rc<RefCell<HashMap<String, SavedList>>>,
    }

    impl ListStore for MemoryLists {
        type Error = Infallible;

        fn save_list(&self, list: &SavedList) -> Result<(), Self::Error> {
            self.lists
                .borrow_mut()
                .insert(list.id.clone(), list.clone());
            Ok(())
        }

        fn load_list(&self, id: &str) -> Result<Option<SavedList>, Self::Error> {
            Ok(self.lists.borrow().get(id).cloned())
        }

        fn delete_list(&self, id: &str) -> Result<(), Self::Error> {
            self.lists.borrow_mut().remove(id);
            Ok(())
        }
    }

    #[derive(Clone, Default)]
    struct MemorySessions {
        sessions: Rc<RefCell<HashMap<String, GameState>>>,
    }

    impl SessionStore for MemorySessions {
        type Error = Infallible;

        fn save_session(&self, key: &str, state: &GameState) -> Result<(), Self::Error> {
            self.sessions
                .borrow_mut()
                .insert(key.to_string(), state.clone());
            Ok(())
        }

        fn load_session(&self, key: &str) -> Result<Option<GameState>, Self::Error> {
            Ok(self.sessions.borrow().get(key).cloned())
        }
    }

    fn stored_list() -> SavedList {
        SavedList {
            id: String::from("list-1"),
            name: String::from("Vanguard"),
            faction_id: String::from("ravens"),
            units: Vec::new(),
            created_at: String::from("2026-08-01T10:00:00Z"),
            user_id: None,
        }
    }

    #[test]
    fn engine_shares_and_imports_lists() {
        let engine = CompanionEngine::new(MemoryLists::default(), MemorySessions::default());
        engine.lists.save_list(&stored_list()).unwrap();

        let token = engine.share_token("list-1").unwrap().expect("list exists");
        let imported = engine.import_shared(&token).expect("token decodes");
        assert_eq!(imported.name, "Vanguard");
        assert!(imported.is_shared());

        assert!(engine.share_token("missing").unwrap().is_none());
        assert!(engine.import_shared("garbage!!").is_none());
    }

    #[test]
    fn engine_persists_and_resumes_sessions() {
        let engine = CompanionEngine::new(MemoryLists::default(), MemorySessions::default());
        let mut session = GameSession::new(1_000);
        session.dispatch(&Action::SetPlayers {
            players: vec![Player::new("p1", "Ada")],
        });
        session.dispatch(&Action::SetGameEndTime { timestamp: 61_000 });

        let summary = engine.finish_session("slot-one", session).unwrap();
        assert_eq!(summary.winner_name, "Ada");
        assert_eq!(summary.duration_ms, Some(60_000));

        let resumed = engine.resume_session("slot-one").unwrap().expect("saved");
        assert_eq!(resumed.state().players.len(), 1);
        assert!(engine.resume_session("missing-slot").unwrap().is_none());
    }
}
