//! Tagged action union and the pure session reducer.
//!
//! Every state change is an [`Action`] applied through [`apply`], which
//! returns a fresh [`GameState`] snapshot and never mutates its input.
//! Actions arriving over the wire with a tag this version does not know
//! deserialize to [`Action::Unknown`] and apply as a no-op.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::events::GameEvent;
use crate::mission::Mission;
use crate::state::{Faction, GamePhase, GameState, Player, PlayerVerification, Turn, Unit};

/// Optional-field update for one player. Present fields replace the
/// current value; absent fields leave it alone (shallow merge).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct PlayerPatch {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub faction: Option<Faction>,
    #[serde(default)]
    pub score: Option<i32>,
    #[serde(default)]
    pub round_scores: Option<HashMap<String, i32>>,
    #[serde(default)]
    pub verification: Option<PlayerVerification>,
}

impl PlayerPatch {
    fn apply_to(&self, player: &mut Player) {
        if let Some(name) = &self.name {
            player.name = name.clone();
        }
        if let Some(faction) = &self.faction {
            player.faction = Some(faction.clone());
        }
        if let Some(score) = self.score {
            player.score = Some(score);
        }
        if let Some(round_scores) = &self.round_scores {
            player.round_scores = round_scores.clone();
        }
        if let Some(verification) = &self.verification {
            player.verification = Some(verification.clone());
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Action {
    /// Set the current phase. Transitions are caller-driven; no legality
    /// check is applied, so free navigation and back-editing stay possible.
    SetPhase { phase: GamePhase },
    /// Append a caller-built event to the ledger, unmodified.
    AddGameEvent { event: GameEvent },
    /// Set a player's absolute score and record the delta for the round.
    /// The caller computes the new total from prior state before dispatch.
    UpdateScore {
        player_id: String,
        score: i32,
        round_number: u32,
    },
    /// Shallow-merge a patch into one player.
    UpdatePlayer { id: String, updates: PlayerPatch },
    /// Stamp the session end time (epoch milliseconds). Set once; later
    /// dispatches are no-ops rather than errors.
    SetGameEndTime { timestamp: i64 },
    /// Replace the player roster, keyed by player id.
    SetPlayers { players: Vec<Player> },
    SetMission { mission: Option<Mission> },
    SetUnits { units: Vec<Unit> },
    SetRollOffWinner { player_id: Option<String> },
    SetFirstToDeploy { player_id: Option<String> },
    SetInitialInitiative { player_id: Option<String> },
    /// Append one round record to the turn history.
    RecordTurn { turn: Turn },
    /// Replace the whole state with the initial default.
    ResetGame,
    /// Forward-compatibility arm for tags this version does not know.
    #[serde(other)]
    Unknown,
}

/// Apply one action, producing the next state snapshot.
///
/// Total over its input domain: unknown actions and dangling player ids
/// are no-ops, never errors. The previous state is left untouched so
/// views holding a stale snapshot can still diff against it.
#[must_use]
pub fn apply(state: &GameState, action: &Action) -> GameState {
    let mut next = state.clone();
    match action {
        Action::SetPhase { phase } => {
            next.current_phase = *phase;
        }
        Action::AddGameEvent { event } => {
            next.game_events.push(event.clone());
        }
        Action::UpdateScore {
            player_id,
            score,
            round_number,
        } => {
            if let Some(player) = next.players.get_mut(player_id) {
                let delta = score - player.effective_score();
                player.score = Some(*score);
                player
                    .round_scores
                    .insert(round_number.to_string(), delta);
            }
        }
        Action::UpdatePlayer { id, updates } => {
            if let Some(player) = next.players.get_mut(id) {
                updates.apply_to(player);
            }
        }
        Action::SetGameEndTime { timestamp } => {
            if next.game_end_time.is_none() {
                next.game_end_time = Some(*timestamp);
            }
        }
        Action::SetPlayers { players } => {
            next.players = players
                .iter()
                .map(|p| (p.id.clone(), p.clone()))
                .collect();
        }
        Action::SetMission { mission } => {
            next.mission = mission.clone();
        }
        Action::SetUnits { units } => {
            next.units = units.clone();
        }
        Action::SetRollOffWinner { player_id } => {
            next.roll_off_winner = player_id.clone();
        }
        Action::SetFirstToDeploy { player_id } => {
            next.first_to_deploy_player_id = player_id.clone();
        }
        Action::SetInitialInitiative { player_id } => {
            next.initial_initiative_player_id = player_id.clone();
        }
        Action::RecordTurn { turn } => {
            next.current_turn = next.current_turn.max(turn.number).saturating_add(1);
            next.turns.push(turn.clone());
        }
        Action::ResetGame => {
            next = GameState::default();
        }
        Action::Unknown => {}
    }
    next
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::GameEventKind;

    fn two_player_state() -> GameState {
        apply(
            &GameState::default(),
            &Action::SetPlayers {
                players: vec![Player::new("p1", "Ada"), Player::new("p2", "Grace")],
            },
        )
    }

    fn event(id: &str, round: u32) -> GameEvent {
        GameEvent::new(id, 1_000, GameEventKind::Score, "p1", "scored").with_round(round)
    }

    #[test]
    fn ledger_is_append_only_and_ordered() {
        let mut state = GameState::default();
        for i in 0..5 {
            let before = state.clone();
            state = apply(
                &state,
                &Action::AddGameEvent {
                    event: event(&format!("e{i}"), i),
                },
            );
            // Earlier entries are never edited, and the input is untouched.
            assert_eq!(state.game_events[..before.game_events.len()], before.game_events);
        }
        assert_eq!(state.game_events.len(), 5);
        let ids: Vec<&str> = state.game_events.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, ["e0", "e1", "e2", "e3", "e4"]);
    }

    #[test]
    fn update_score_sets_absolute_and_records_round_delta() {
        let state = two_player_state();
        let state = apply(
            &state,
            &Action::UpdateScore {
                player_id: String::from("p1"),
                score: 4,
                round_number: 1,
            },
        );
        let state = apply(
            &state,
            &Action::UpdateScore {
                player_id: String::from("p1"),
                score: 7,
                round_number: 2,
            },
        );
        let player = state.player("p1").unwrap();
        assert_eq!(player.score, Some(7));
        assert_eq!(player.round_scores.get("1"), Some(&4));
        assert_eq!(player.round_scores.get("2"), Some(&3));
    }

    #[test]
    fn update_score_for_missing_player_is_a_noop() {
        let state = two_player_state();
        let next = apply(
            &state,
            &Action::UpdateScore {
                player_id: String::from("p9"),
                score: 10,
                round_number: 1,
            },
        );
        assert_eq!(next, state);
    }

    #[test]
    fn update_player_merges_only_present_fields() {
        let state = two_player_state();
        let state = apply(
            &state,
            &Action::UpdatePlayer {
                id: String::from("p2"),
                updates: PlayerPatch {
                    faction: Some(Faction {
                        id: Some(String::from("ravens")),
                        name: String::from("Ravens"),
                        icon: None,
                    }),
                    ..PlayerPatch::default()
                },
            },
        );
        let player = state.player("p2").unwrap();
        assert_eq!(player.name, "Grace");
        assert_eq!(player.faction.as_ref().unwrap().name, "Ravens");
        assert!(player.score.is_none());
    }

    #[test]
    fn game_end_time_is_set_once() {
        let state = apply(
            &GameState::default(),
            &Action::SetGameEndTime { timestamp: 5_000 },
        );
        let state = apply(&state, &Action::SetGameEndTime { timestamp: 9_000 });
        assert_eq!(state.game_end_time, Some(5_000));
    }

    #[test]
    fn phase_changes_are_not_validated() {
        let state = apply(
            &GameState::default(),
            &Action::SetPhase {
                phase: GamePhase::Scoring,
            },
        );
        // Back-navigation is allowed by design.
        let state = apply(
            &state,
            &Action::SetPhase {
                phase: GamePhase::Setup,
            },
        );
        assert_eq!(state.current_phase, GamePhase::Setup);
    }

    #[test]
    fn reset_restores_the_initial_default() {
        let mut state = two_player_state();
        state = apply(
            &state,
            &Action::SetPhase {
                phase: GamePhase::Game,
            },
        );
        state = apply(&state, &Action::AddGameEvent { event: event("e1", 1) });
        state = apply(&state, &Action::SetGameEndTime { timestamp: 1 });
        state = apply(&state, &Action::ResetGame);
        assert_eq!(state, GameState::default());
    }

    #[test]
    fn unknown_action_tag_is_a_noop() {
        let action: Action =
            serde_json::from_str(r#"{"type":"TOGGLE_FOG_OF_WAR","density":3}"#).unwrap();
        assert_eq!(action, Action::Unknown);
        let state = two_player_state();
        assert_eq!(apply(&state, &action), state);
    }

    #[test]
    fn action_tags_use_screaming_snake_case() {
        let json = serde_json::to_value(&Action::SetPhase {
            phase: GamePhase::Deployment,
        })
        .unwrap();
        assert_eq!(json["type"], "SET_PHASE");
        assert_eq!(json["phase"], "deployment");
    }

    #[test]
    fn record_turn_advances_the_round_counter() {
        let state = apply(
            &GameState::default(),
            &Action::RecordTurn {
                turn: Turn {
                    number: 1,
                    ..Turn::default()
                },
            },
        );
        assert_eq!(state.current_turn, 2);
        assert_eq!(state.turns.len(), 1);
    }
}
