//! Agent classification states.

use serde::{Deserialize, Serialize};

/// Classification of a light agent.
///
/// The discriminants are the wire values used by the frame snapshots
/// (0=Scout, 1=Analyst, 2=Shield-Veto, 3=Hunter).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
#[repr(u8)]
pub enum AgentState {
    /// Still travelling, no target assessment yet
    #[default]
    Scout = 0,
    /// Target passed the yield gate
    Analyst = 1,
    /// Target passed the yield gate but breached the risk ceiling
    ShieldVeto = 2,
    /// Target passed both gates
    Hunter = 3,
}

impl AgentState {
    pub const ALL: [AgentState; 4] = [
        AgentState::Scout,
        AgentState::Analyst,
        AgentState::ShieldVeto,
        AgentState::Hunter,
    ];

    pub fn label(self) -> &'static str {
        match self {
            AgentState::Scout => "Scouts",
            AgentState::Analyst => "Analysts",
            AgentState::ShieldVeto => "Shield Veto",
            AgentState::Hunter => "Hunters",
        }
    }

    /// Marker colour for scatter rendering.
    pub fn color(self) -> &'static str {
        match self {
            AgentState::Scout => "lightblue",
            AgentState::Analyst => "blue",
            AgentState::ShieldVeto => "red",
            AgentState::Hunter => "magenta",
        }
    }
}

impl From<AgentState> for u8 {
    fn from(state: AgentState) -> u8 {
        state as u8
    }
}

impl TryFrom<u8> for AgentState {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(AgentState::Scout),
            1 => Ok(AgentState::Analyst),
            2 => Ok(AgentState::ShieldVeto),
            3 => Ok(AgentState::Hunter),
            other => Err(format!("invalid agent state {}", other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn wire_values() {
        assert_eq!(serde_json::to_string(&AgentState::ShieldVeto).unwrap(), "2");
        assert_eq!(serde_json::from_str::<AgentState>("3").unwrap(), AgentState::Hunter);
        assert!(serde_json::from_str::<AgentState>("4").is_err());
    }

    #[test]
    fn color_map_per_state() {
        assert_eq!(AgentState::Scout.color(), "lightblue");
        assert_eq!(AgentState::Analyst.color(), "blue");
        assert_eq!(AgentState::ShieldVeto.color(), "red");
        assert_eq!(AgentState::Hunter.color(), "magenta");

        let distinct: HashSet<&str> = AgentState::ALL.iter().map(|s| s.color()).collect();
        assert_eq!(distinct.len(), AgentState::ALL.len());
    }
}
