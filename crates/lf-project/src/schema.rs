//! Scenario file schema.

use lf_sim::{PidConfig, TankConfig};
use serde::{Deserialize, Serialize};

/// Newest scenario format this crate reads and writes.
pub const LATEST_VERSION: u32 = 1;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Scenario {
    pub version: u32,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub kind: ScenarioKind,
}

impl Scenario {
    pub fn new(name: impl Into<String>, kind: ScenarioKind) -> Self {
        Self {
            version: LATEST_VERSION,
            name: name.into(),
            description: None,
            kind,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ScenarioKind {
    Tank(TankConfig),
    Pid(PidConfig),
    /// Grade a list of guesses against a known target.
    Guess {
        target: String,
        #[serde(default)]
        guesses: Vec<String>,
    },
}

impl ScenarioKind {
    pub fn label(&self) -> &'static str {
        match self {
            ScenarioKind::Tank(_) => "tank",
            ScenarioKind::Pid(_) => "pid",
            ScenarioKind::Guess { .. } => "guess",
        }
    }
}
