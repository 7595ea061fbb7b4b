//! Explicit session handle owning one [`GameState`].
//!
//! There is no ambient global state: the host constructs a session,
//! passes the handle to whichever views need it, and those views read
//! through [`GameSession::state`] and write through
//! [`GameSession::dispatch`].

use rand::Rng;

use crate::actions::{Action, apply};
use crate::events::{GameEvent, GameEventKind};
use crate::state::GameState;

#[derive(Debug, Clone, Default)]
pub struct GameSession {
    state: GameState,
}

impl GameSession {
    /// Start a fresh session, stamping the start time (epoch milliseconds).
    #[must_use]
    pub fn new(start_time_ms: i64) -> Self {
        Self {
            state: GameState::default().with_start_time(start_time_ms),
        }
    }

    /// Rebuild a session handle around a previously captured state.
    #[must_use]
    pub const fn from_state(state: GameState) -> Self {
        Self { state }
    }

    /// Current state snapshot. Views diff against clones of this.
    #[must_use]
    pub const fn state(&self) -> &GameState {
        &self.state
    }

    /// Consume the handle, keeping the final state.
    #[must_use]
    pub fn into_state(self) -> GameState {
        self.state
    }

    /// Apply one action through the reducer.
    pub fn dispatch(&mut self, action: &Action) {
        log::debug!(
            "dispatch in phase {}: {action:?}",
            self.state.current_phase
        );
        self.state = apply(&self.state, action);
    }

    /// Roll off for deployment: pick a winner uniformly among the current
    /// players, record the result and a matching initiative ledger entry.
    /// Deterministic for a given roster and seeded RNG.
    ///
    /// Returns the winning player id, or `None` with no players.
    pub fn roll_off<R: Rng>(&mut self, rng: &mut R, timestamp: i64) -> Option<String> {
        let mut ids: Vec<&String> = self.state.players.keys().collect();
        ids.sort();
        if ids.is_empty() {
            return None;
        }
        let winner = ids[rng.random_range(0..ids.len())].clone();

        self.dispatch(&Action::SetRollOffWinner {
            player_id: Some(winner.clone()),
        });
        let description = format!("{} won the roll-off", self.state.player_name(&winner));
        self.dispatch(&Action::AddGameEvent {
            event: GameEvent::new(
                format!("roll-off-{timestamp}"),
                timestamp,
                GameEventKind::Initiative,
                winner.clone(),
                description,
            ),
        });
        Some(winner)
    }
}
