//! Per-frame swarm metrics and snapshots.

use super::state::AgentState;
use super::tensor_engine::TensorSwarm;
use crate::error::Result;
use serde::{Deserialize, Serialize};

/// Agent population per state.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateCounts {
    pub scouts: usize,
    pub analysts: usize,
    pub shield_veto: usize,
    pub hunters: usize,
}

impl StateCounts {
    pub fn tally(states: &[AgentState]) -> Self {
        states.iter().fold(StateCounts::default(), |mut acc, s| {
            match s {
                AgentState::Scout => acc.scouts += 1,
                AgentState::Analyst => acc.analysts += 1,
                AgentState::ShieldVeto => acc.shield_veto += 1,
                AgentState::Hunter => acc.hunters += 1,
            }
            acc
        })
    }

    pub fn get(&self, state: AgentState) -> usize {
        match state {
            AgentState::Scout => self.scouts,
            AgentState::Analyst => self.analysts,
            AgentState::ShieldVeto => self.shield_veto,
            AgentState::Hunter => self.hunters,
        }
    }

    pub fn total(&self) -> usize {
        self.scouts + self.analysts + self.shield_veto + self.hunters
    }
}

impl std::fmt::Display for StateCounts {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let parts: Vec<String> = AgentState::ALL
            .iter()
            .map(|s| format!("{}={}", s.label(), self.get(*s)))
            .collect();
        write!(f, "{}", parts.join(" "))
    }
}

/// One rendered marker.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct AgentPoint {
    pub x: f32,
    pub y: f32,
    pub state: AgentState,
    pub color: &'static str,
}

/// State of the swarm after a frame.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct FrameSnapshot {
    /// 0-based frame index
    pub frame: usize,
    pub counts: StateCounts,
    /// Empty unless the observer asked for points
    pub points: Vec<AgentPoint>,
}

impl FrameSnapshot {
    pub fn capture(frame: usize, swarm: &TensorSwarm, with_points: bool) -> Self {
        let points = if with_points {
            swarm
                .x
                .iter()
                .zip(swarm.y.iter())
                .zip(swarm.state.iter())
                .map(|((x, y), state)| AgentPoint {
                    x: *x,
                    y: *y,
                    state: *state,
                    color: state.color(),
                })
                .collect()
        } else {
            Vec::new()
        };

        FrameSnapshot {
            frame,
            counts: swarm.counts(),
            points,
        }
    }

    pub fn to_json_line(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

/// Receives a snapshot after every frame of a run.
pub trait FrameObserver {
    /// Whether snapshots should carry per-agent points.
    fn wants_points(&self) -> bool {
        false
    }

    fn on_frame(&mut self, snapshot: &FrameSnapshot) -> Result<()>;
}

/// Observer that ignores every frame.
impl FrameObserver for () {
    fn on_frame(&mut self, _snapshot: &FrameSnapshot) -> Result<()> {
        Ok(())
    }
}

/// Keeps every snapshot in memory.
#[derive(Debug, Default)]
pub struct FrameRecorder {
    pub with_points: bool,
    pub frames: Vec<FrameSnapshot>,
}

impl FrameRecorder {
    pub fn new(with_points: bool) -> Self {
        FrameRecorder {
            with_points,
            frames: Vec::new(),
        }
    }
}

impl FrameObserver for FrameRecorder {
    fn wants_points(&self) -> bool {
        self.with_points
    }

    fn on_frame(&mut self, snapshot: &FrameSnapshot) -> Result<()> {
        self.frames.push(snapshot.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tally_counts_each_state() {
        let states = [
            AgentState::Scout,
            AgentState::Hunter,
            AgentState::Hunter,
            AgentState::ShieldVeto,
        ];
        let counts = StateCounts::tally(&states);
        assert_eq!(counts.scouts, 1);
        assert_eq!(counts.analysts, 0);
        assert_eq!(counts.shield_veto, 1);
        assert_eq!(counts.hunters, 2);
        assert_eq!(counts.total(), 4);
        assert_eq!(counts.to_string(), "Scouts=1 Analysts=0 Shield Veto=1 Hunters=2");
    }

    #[test]
    fn snapshot_points_optional() {
        let swarm = TensorSwarm {
            x: vec![1.0, 2.0],
            y: vec![3.0, 4.0],
            state: vec![AgentState::Scout, AgentState::Hunter],
            target: vec![0, 0],
            tick: 0,
        };

        let bare = FrameSnapshot::capture(0, &swarm, false);
        assert!(bare.points.is_empty());
        assert_eq!(bare.counts.hunters, 1);

        let full = FrameSnapshot::capture(4, &swarm, true);
        assert_eq!(full.points.len(), 2);
        assert_eq!(full.points[1].color, "magenta");

        let line = full.to_json_line().unwrap();
        assert!(line.starts_with("{\"frame\":4"));
        assert!(line.contains("\"state\":3"));
    }
}
