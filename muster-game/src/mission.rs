use serde::{Deserialize, Serialize};

/// An objective marker placed by a mission
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectiveMarker {
    pub id: String,
    pub name: String,
    #[serde(default = "default_marker_value")]
    pub value: i32,
}

fn default_marker_value() -> i32 {
    1
}

/// A mission selected during setup
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Mission {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub objective: String,
    #[serde(default)]
    pub objective_markers: Vec<ObjectiveMarker>,
    /// Display-only flag separating homebrew missions from official ones.
    #[serde(default)]
    pub homebrew: bool,
}

/// Container for all mission data
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct MissionData {
    pub missions: Vec<Mission>,
}

impl MissionData {
    /// Create empty mission data (useful for tests)
    #[must_use]
    pub fn empty() -> Self {
        Self {
            missions: Vec::new(),
        }
    }

    /// Load mission data from JSON string
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON cannot be parsed into valid mission data.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Create mission data from pre-parsed missions
    #[must_use]
    pub fn from_missions(missions: Vec<Mission>) -> Self {
        Self { missions }
    }

    #[must_use]
    pub fn find(&self, id: &str) -> Option<&Mission> {
        self.missions.iter().find(|m| m.id == id)
    }
}
