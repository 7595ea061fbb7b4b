//! Derived values over a session state, used by scoring and summary views.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::state::{GameState, Player, UNKNOWN_PLAYER_NAME};

/// Every round number the session knows about, ascending and deduplicated.
///
/// Rounds can be recorded through the event ledger or through per-player
/// round score maps; a correct summary reconciles both sources instead of
/// trusting one.
#[must_use]
pub fn all_round_numbers(state: &GameState) -> Vec<u32> {
    let mut rounds = BTreeSet::new();
    for event in &state.game_events {
        if let Some(round) = event.round_number {
            rounds.insert(round);
        }
    }
    for player in state.players.values() {
        for key in player.round_scores.keys() {
            if let Ok(round) = key.parse::<u32>() {
                rounds.insert(round);
            }
        }
    }
    rounds.into_iter().collect()
}

/// Stable descending sort by effective score. Ties keep their original
/// relative order, which is what decides the displayed winner.
#[must_use]
pub fn sort_players_by_score(players: &[Player]) -> Vec<&Player> {
    let mut sorted: Vec<&Player> = players.iter().collect();
    sorted.sort_by(|a, b| b.effective_score().cmp(&a.effective_score()));
    sorted
}

/// The winner is the first player after the stable sort.
#[must_use]
pub fn winner(players: &[Player]) -> Option<&Player> {
    sort_players_by_score(players).into_iter().next()
}

/// One row of the final standings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerStanding {
    pub player_id: String,
    pub name: String,
    pub score: i32,
}

/// Snapshot of a finished session for the summary view
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameSummary {
    pub winner_name: String,
    pub standings: Vec<PlayerStanding>,
    pub rounds: Vec<u32>,
    pub events_recorded: usize,
    pub duration_ms: Option<i64>,
}

/// Build the summary snapshot for a session.
#[must_use]
pub fn summarize(state: &GameState) -> GameSummary {
    // The player map has no meaningful order; sort by id first so ties
    // break the same way on every call, then stable-sort by score.
    let mut players: Vec<&Player> = state.players.values().collect();
    players.sort_by(|a, b| a.id.cmp(&b.id));
    players.sort_by(|a, b| b.effective_score().cmp(&a.effective_score()));

    let standings: Vec<PlayerStanding> = players
        .iter()
        .map(|p| PlayerStanding {
            player_id: p.id.clone(),
            name: p.name.clone(),
            score: p.effective_score(),
        })
        .collect();

    GameSummary {
        winner_name: standings
            .first()
            .map_or_else(|| String::from(UNKNOWN_PLAYER_NAME), |s| s.name.clone()),
        standings,
        rounds: all_round_numbers(state),
        events_recorded: state.game_events.len(),
        duration_ms: state.duration_ms(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::{GameEvent, GameEventKind};

    fn player(id: &str, score: Option<i32>) -> Player {
        let mut p = Player::new(id, id.to_uppercase());
        p.score = score;
        p
    }

    #[test]
    fn sort_is_stable_for_tied_scores() {
        let players = vec![
            player("a", Some(10)),
            player("b", Some(20)),
            player("c", Some(20)),
            player("d", Some(5)),
        ];
        let sorted = sort_players_by_score(&players);
        let ids: Vec<&str> = sorted.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, ["b", "c", "a", "d"]);
        assert_eq!(winner(&players).unwrap().id, "b");
    }

    #[test]
    fn missing_score_sorts_as_zero() {
        let players = vec![player("a", None), player("b", Some(1))];
        assert_eq!(winner(&players).unwrap().id, "b");
    }

    #[test]
    fn rounds_reconcile_ledger_and_round_scores() {
        let mut state = GameState::default();
        state.game_events.push(
            GameEvent::new("e1", 1, GameEventKind::Score, "p1", "scored").with_round(2),
        );
        let mut p1 = player("p1", Some(3));
        p1.round_scores.insert(String::from("3"), 3);
        p1.round_scores.insert(String::from("not-a-round"), 1);
        state.players.insert(p1.id.clone(), p1);

        assert_eq!(all_round_numbers(&state), vec![2, 3]);
    }

    #[test]
    fn rounds_deduplicate_across_sources() {
        let mut state = GameState::default();
        state.game_events.push(
            GameEvent::new("e1", 1, GameEventKind::Score, "p1", "scored").with_round(1),
        );
        let mut p1 = player("p1", Some(3));
        p1.round_scores.insert(String::from("1"), 3);
        state.players.insert(p1.id.clone(), p1);

        assert_eq!(all_round_numbers(&state), vec![1]);
    }

    #[test]
    fn summary_reports_winner_and_duration() {
        let mut state = GameState::default().with_start_time(10_000);
        state.game_end_time = Some(70_000);
        for p in [player("a", Some(4)), player("b", Some(9))] {
            state.players.insert(p.id.clone(), p);
        }
        state
            .game_events
            .push(GameEvent::new("e1", 1, GameEventKind::Note, "table", "started"));

        let summary = summarize(&state);
        assert_eq!(summary.winner_name, "B");
        assert_eq!(summary.standings[0].score, 9);
        assert_eq!(summary.events_recorded, 1);
        assert_eq!(summary.duration_ms, Some(60_000));
    }

    #[test]
    fn summary_of_empty_session_has_no_real_winner() {
        let summary = summarize(&GameState::default());
        assert_eq!(summary.winner_name, UNKNOWN_PLAYER_NAME);
        assert!(summary.standings.is_empty());
        assert!(summary.rounds.is_empty());
    }
}
