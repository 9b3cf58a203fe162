//! Tensor-Based Swarm Engine
//!
//! Uses Struct-of-Arrays (SoA) layout for cache-friendly updates of every agent.
//! Each agent reads only its own row and its target, so the batch update runs
//! on Rayon without changing results.

use super::house::{House, HouseTable};
use super::metrics::StateCounts;
use super::state::AgentState;
use crate::core::config::{SimulationConfig, Thresholds};
use crate::error::{Error, Result};
use rand::Rng;
use rayon::prelude::*;
use tracing::{debug, info};

/// Per-step physics and classification constants
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StepParams {
    pub speed: f32,
    pub capture_radius: f32,
    pub thresholds: Thresholds,
    pub reset_rejected_to_scout: bool,
}

impl StepParams {
    pub fn from_config(config: &SimulationConfig) -> Self {
        StepParams {
            speed: config.step_speed,
            capture_radius: config.capture_radius,
            thresholds: config.thresholds,
            reset_rejected_to_scout: config.reset_rejected_to_scout,
        }
    }
}

/// Move one agent a fixed distance toward its target.
///
/// Returns the new position and the pre-move distance. A zero distance is
/// replaced by 1 before normalising, which yields a zero displacement.
#[inline(always)]
pub fn advance(x: f32, y: f32, target_x: f32, target_y: f32, speed: f32) -> (f32, f32, f32) {
    let dx = target_x - x;
    let dy = target_y - y;
    let mut dist = (dx * dx + dy * dy).sqrt();
    if dist == 0.0 {
        dist = 1.0;
    }
    (x + dx / dist * speed, y + dy / dist * speed, dist)
}

/// Reclassify an agent from its target's attributes.
///
/// Writes are applied in a fixed order (Analyst, then Shield-Veto, then
/// Hunter) so later masks overwrite earlier ones. Agents outside the capture
/// radius, or inside it with a target failing the yield gate, keep their
/// prior state unless `reset_rejected_to_scout` is set.
#[inline(always)]
pub fn classify(prior: AgentState, close: bool, target: &House, params: &StepParams) -> AgentState {
    if !close {
        return prior;
    }

    let yield_ok = target.yield_pct >= params.thresholds.min_yield;
    let risk_fail = target.risk > params.thresholds.max_risk;
    let failed = yield_ok && risk_fail;
    let hunter = yield_ok && !risk_fail;

    let mut next = prior;
    if yield_ok {
        next = AgentState::Analyst;
    }
    if failed {
        next = AgentState::ShieldVeto;
    }
    if hunter {
        next = AgentState::Hunter;
    }
    if !yield_ok && params.reset_rejected_to_scout {
        next = AgentState::Scout;
    }
    next
}

/// Agent swarm in SoA (Tensor) layout
#[derive(Clone, Debug, Default)]
pub struct TensorSwarm {
    // Tensor Columns (Vectors)
    pub x: Vec<f32>,
    pub y: Vec<f32>,
    pub state: Vec<AgentState>,
    /// Index into the session's house table, fixed for the run
    pub target: Vec<u32>,

    pub tick: u64,
}

impl TensorSwarm {
    /// Spawn `count` Scouts uniformly over the world, each assigned a target
    /// house uniformly at random with replacement.
    pub fn spawn<R: Rng + ?Sized>(
        count: usize,
        houses: &HouseTable,
        width: f32,
        height: f32,
        rng: &mut R,
    ) -> Result<Self> {
        if count > 0 && houses.is_empty() {
            return Err(Error::Config(
                "cannot assign targets from an empty house table".to_string(),
            ));
        }

        info!("🌐 [Swarm] Initializing tensor store for {} agents...", count);

        let mut x = Vec::with_capacity(count);
        let mut y = Vec::with_capacity(count);
        for _ in 0..count {
            x.push(rng.gen::<f32>() * width);
            y.push(rng.gen::<f32>() * height);
        }
        let target = (0..count)
            .map(|_| rng.gen_range(0..houses.len()) as u32)
            .collect();

        Ok(TensorSwarm {
            x,
            y,
            state: vec![AgentState::Scout; count],
            target,
            tick: 0,
        })
    }

    /// Build a swarm from explicit columns. All agents start as Scouts.
    pub fn from_parts(x: Vec<f32>, y: Vec<f32>, target: Vec<u32>, houses: &HouseTable) -> Result<Self> {
        if x.len() != y.len() || x.len() != target.len() {
            return Err(Error::Config(format!(
                "column length mismatch: x={}, y={}, target={}",
                x.len(),
                y.len(),
                target.len()
            )));
        }
        if let Some(bad) = target.iter().find(|t| **t as usize >= houses.len()) {
            return Err(Error::Config(format!(
                "target index {} out of range for {} houses",
                bad,
                houses.len()
            )));
        }

        let count = x.len();
        Ok(TensorSwarm {
            x,
            y,
            state: vec![AgentState::Scout; count],
            target,
            tick: 0,
        })
    }

    pub fn len(&self) -> usize {
        self.x.len()
    }

    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }

    /// Execute a simulation step (Batch Update: move, then reclassify)
    pub fn step(&mut self, houses: &HouseTable, params: &StepParams) {
        self.tick += 1;
        let table = houses.as_slice();

        self.x
            .par_iter_mut()
            .zip(self.y.par_iter_mut())
            .zip(self.state.par_iter_mut())
            .zip(self.target.par_iter())
            .for_each(|(((x, y), state), target)| {
                let house = &table[*target as usize];
                let (nx, ny, dist) = advance(*x, *y, house.x, house.y, params.speed);
                *x = nx;
                *y = ny;

                let close = dist < params.capture_radius;
                *state = classify(*state, close, house, params);
            });

        debug!("[Swarm] tick {} complete for {} agents", self.tick, self.len());
    }

    pub fn counts(&self) -> StateCounts {
        StateCounts::tally(&self.state)
    }

    /// Index of the first Hunter in agent order.
    pub fn first_hunter(&self) -> Option<usize> {
        self.state.iter().position(|s| *s == AgentState::Hunter)
    }
}
