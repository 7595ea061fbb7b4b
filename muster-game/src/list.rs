use serde::{Deserialize, Serialize};

/// Id prefix marking a list reconstructed from a share link rather than
/// loaded from storage.
pub const SHARED_LIST_ID_PREFIX: &str = "shared-";

/// A unit entry in a saved army list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectedUnit {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub points_cost: u32,
    #[serde(default)]
    pub faction: String,
    #[serde(default)]
    pub keywords: Vec<String>,
    #[serde(default)]
    pub high_command: bool,
    /// How many copies of this unit the roster allows.
    #[serde(default = "default_availability")]
    pub availability: u32,
    #[serde(default)]
    pub special_rules: Option<String>,
    #[serde(default)]
    pub command: u32,
    #[serde(default = "default_quantity")]
    pub quantity: u32,
}

fn default_availability() -> u32 {
    1
}

pub(crate) fn default_quantity() -> u32 {
    1
}

/// A saved army list, built by the list builder and persisted by the host
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedList {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub faction_id: String,
    #[serde(default)]
    pub units: Vec<SelectedUnit>,
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub user_id: Option<String>,
}

impl SavedList {
    /// Total cost of the list, quantity included.
    #[must_use]
    pub fn total_points(&self) -> u32 {
        self.units
            .iter()
            .map(|u| u.points_cost.saturating_mul(u.quantity))
            .sum()
    }

    /// Whether this list came from a share link instead of storage.
    #[must_use]
    pub fn is_shared(&self) -> bool {
        self.id.starts_with(SHARED_LIST_ID_PREFIX)
    }
}
