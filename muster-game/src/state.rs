use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use crate::events::GameEvent;
use crate::mission::Mission;

/// Label consumers show for a player id that no longer resolves.
pub const UNKNOWN_PLAYER_NAME: &str = "Unknown";

/// Player id used for table-wide notes that have no real subject.
pub const NOTE_FALLBACK_PLAYER_ID: &str = "table";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum GamePhase {
    #[default]
    Setup,
    Deployment,
    Game,
    Scoring,
    Summary,
}

impl GamePhase {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Setup => "setup",
            Self::Deployment => "deployment",
            Self::Game => "game",
            Self::Scoring => "scoring",
            Self::Summary => "summary",
        }
    }
}

impl fmt::Display for GamePhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GamePhase {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "setup" => Ok(Self::Setup),
            "deployment" => Ok(Self::Deployment),
            "game" => Ok(Self::Game),
            "scoring" => Ok(Self::Scoring),
            "summary" => Ok(Self::Summary),
            _ => Err(()),
        }
    }
}

impl From<GamePhase> for String {
    fn from(value: GamePhase) -> Self {
        value.as_str().to_string()
    }
}

/// Faction affiliation shown next to a player
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Faction {
    #[serde(default)]
    pub id: Option<String>,
    pub name: String,
    #[serde(default)]
    pub icon: Option<String>,
}

/// External account linkage carried as opaque metadata
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct PlayerVerification {
    #[serde(default)]
    pub wab_id: Option<String>,
    #[serde(default)]
    pub verified: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub faction: Option<Faction>,
    #[serde(default)]
    pub score: Option<i32>,
    /// Per-round score deltas, keyed by round number rendered as a string.
    #[serde(default)]
    pub round_scores: HashMap<String, i32>,
    #[serde(default)]
    pub verification: Option<PlayerVerification>,
}

impl Player {
    /// Create a player with just an id and display name.
    #[must_use]
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            faction: None,
            score: None,
            round_scores: HashMap::new(),
            verification: None,
        }
    }

    /// The authoritative score: the explicit `score` field, 0 when absent.
    /// Round-score sums are a display-only reconciliation aid, see
    /// [`Player::round_score_total`].
    #[must_use]
    pub fn effective_score(&self) -> i32 {
        self.score.unwrap_or(0)
    }

    /// Sum of the recorded per-round deltas.
    #[must_use]
    pub fn round_score_total(&self) -> i32 {
        self.round_scores.values().sum()
    }
}

/// A unit on the play surface, synthesized per player when a list is loaded
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Unit {
    pub id: String,
    pub name: String,
    pub player_id: String,
    #[serde(default)]
    pub points: Option<i32>,
}

/// Record of one round of play
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Turn {
    #[serde(default)]
    pub number: u32,
    /// Activations taken this round, keyed by player id.
    #[serde(default)]
    pub activations: HashMap<String, u32>,
    /// Optional score snapshot at the end of the round, keyed by player id.
    #[serde(default)]
    pub scores: Option<HashMap<String, i32>>,
}

fn default_turn() -> u32 {
    1
}

/// In-memory state of one play session, from setup through summary.
///
/// Exactly one instance exists per session. Every change goes through
/// [`crate::actions::apply`], which returns a fresh snapshot and leaves the
/// previous value untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameState {
    #[serde(default)]
    pub players: HashMap<String, Player>,
    #[serde(default)]
    pub mission: Option<Mission>,
    #[serde(default)]
    pub current_phase: GamePhase,
    #[serde(default = "default_turn")]
    pub current_turn: u32,
    #[serde(default)]
    pub units: Vec<Unit>,
    #[serde(default)]
    pub turns: Vec<Turn>,
    /// Append-only ledger of everything that happened during the session.
    #[serde(default)]
    pub game_events: Vec<GameEvent>,
    #[serde(default)]
    pub roll_off_winner: Option<String>,
    #[serde(default)]
    pub first_to_deploy_player_id: Option<String>,
    #[serde(default)]
    pub initial_initiative_player_id: Option<String>,
    #[serde(default)]
    pub game_start_time: Option<i64>,
    #[serde(default)]
    pub game_end_time: Option<i64>,
}

impl Default for GameState {
    fn default() -> Self {
        Self {
            players: HashMap::new(),
            mission: None,
            current_phase: GamePhase::Setup,
            current_turn: default_turn(),
            units: Vec::new(),
            turns: Vec::new(),
            game_events: Vec::new(),
            roll_off_winner: None,
            first_to_deploy_player_id: None,
            initial_initiative_player_id: None,
            game_start_time: None,
            game_end_time: None,
        }
    }
}

impl GameState {
    /// Stamp the session start time (epoch milliseconds).
    #[must_use]
    pub const fn with_start_time(mut self, epoch_ms: i64) -> Self {
        self.game_start_time = Some(epoch_ms);
        self
    }

    #[must_use]
    pub fn player(&self, id: &str) -> Option<&Player> {
        self.players.get(id)
    }

    /// Resolve a player id to a display name. Dangling references are
    /// tolerated and resolve to [`UNKNOWN_PLAYER_NAME`].
    #[must_use]
    pub fn player_name(&self, id: &str) -> &str {
        self.players
            .get(id)
            .map_or(UNKNOWN_PLAYER_NAME, |p| p.name.as_str())
    }

    /// Session duration in milliseconds, once both timestamps are set.
    #[must_use]
    pub fn duration_ms(&self) -> Option<i64> {
        match (self.game_start_time, self.game_end_time) {
            (Some(start), Some(end)) => Some(end.saturating_sub(start)),
            _ => None,
        }
    }
}
