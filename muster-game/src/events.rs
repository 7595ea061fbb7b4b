use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Category of a ledger entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GameEventKind {
    Score,
    Kill,
    Objective,
    Initiative,
    Mission,
    Casualty,
    Note,
}

impl GameEventKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Score => "score",
            Self::Kill => "kill",
            Self::Objective => "objective",
            Self::Initiative => "initiative",
            Self::Mission => "mission",
            Self::Casualty => "casualty",
            Self::Note => "note",
        }
    }
}

impl fmt::Display for GameEventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GameEventKind {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "score" => Ok(Self::Score),
            "kill" => Ok(Self::Kill),
            "objective" => Ok(Self::Objective),
            "initiative" => Ok(Self::Initiative),
            "mission" => Ok(Self::Mission),
            "casualty" => Ok(Self::Casualty),
            "note" => Ok(Self::Note),
            _ => Err(()),
        }
    }
}

/// One entry in the append-only session ledger.
///
/// The id and timestamp are supplied by the caller; the state machine
/// stores entries verbatim and never edits them afterwards. Even
/// table-wide notes carry a subject, using
/// [`crate::state::NOTE_FALLBACK_PLAYER_ID`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameEvent {
    pub id: String,
    /// Epoch milliseconds.
    pub timestamp: i64,
    #[serde(rename = "type")]
    pub kind: GameEventKind,
    pub player_id: String,
    pub description: String,
    #[serde(default)]
    pub value: Option<i32>,
    #[serde(default)]
    pub round_number: Option<u32>,
    #[serde(default)]
    pub objective_id: Option<String>,
    #[serde(default)]
    pub unit_id: Option<String>,
}

impl GameEvent {
    /// Build a bare event with the type-specific payload fields unset.
    #[must_use]
    pub fn new(
        id: impl Into<String>,
        timestamp: i64,
        kind: GameEventKind,
        player_id: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            timestamp,
            kind,
            player_id: player_id.into(),
            description: description.into(),
            value: None,
            round_number: None,
            objective_id: None,
            unit_id: None,
        }
    }

    #[must_use]
    pub fn with_value(mut self, value: i32) -> Self {
        self.value = Some(value);
        self
    }

    #[must_use]
    pub fn with_round(mut self, round_number: u32) -> Self {
        self.round_number = Some(round_number);
        self
    }

    #[must_use]
    pub fn with_objective(mut self, objective_id: impl Into<String>) -> Self {
        self.objective_id = Some(objective_id.into());
        self
    }

    #[must_use]
    pub fn with_unit(mut self, unit_id: impl Into<String>) -> Self {
        self.unit_id = Some(unit_id.into());
        self
    }
}
