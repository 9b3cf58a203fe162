use crate::error::{Error, Result};
use crate::swarm::rng::resolve_seed;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::info;

/// Control-panel ranges for the threshold sliders and agent count.
pub const MAX_AGENTS: usize = 20_000;
pub const YIELD_RANGE: (f32, f32) = (2.0, 10.0);
pub const RISK_RANGE: (f32, f32) = (10.0, 50.0);

pub const DEFAULT_MODEL: &str = "gemini-1.5-flash";
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/models";

/// Yield floor and Composite Risk Index ceiling used to classify targets.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Thresholds {
    /// Minimum rental yield (%) a target must offer
    pub min_yield: f32,
    /// Maximum Composite Risk Index (out of 50) a target may carry
    pub max_risk: f32,
}

impl Thresholds {
    pub fn new(min_yield: f32, max_risk: f32) -> Self {
        Thresholds {
            min_yield,
            max_risk,
        }
    }

    /// Stress-test benchmark from the market oracle: 2.9% yield floor, 34/50 risk.
    pub fn market_benchmark() -> Self {
        Thresholds::new(2.9, 34.0)
    }
}

impl Default for Thresholds {
    fn default() -> Self {
        Self::market_benchmark()
    }
}

/// Simulation hyperparameters
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    pub agent_count: usize,
    pub house_count: usize,
    pub world_width: f32,
    pub world_height: f32,
    pub frames: usize,
    /// Distance covered per frame
    pub step_speed: f32,
    /// Distance below which an agent is reclassified
    pub capture_radius: f32,
    pub thresholds: Thresholds,
    /// Reset agents that reach a target failing the yield gate back to Scout.
    pub reset_rejected_to_scout: bool,
    /// Fixed RNG seed. A random seed is drawn when absent.
    pub seed: Option<u64>,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        SimulationConfig {
            agent_count: 10_000,
            house_count: 200,
            world_width: 1000.0,
            world_height: 1000.0,
            frames: 30,
            step_speed: 30.0,
            capture_radius: 50.0,
            thresholds: Thresholds::default(),
            reset_rejected_to_scout: false,
            seed: None,
        }
    }
}

impl SimulationConfig {
    /// Checks the control ranges. Zero agents is a valid (empty) run.
    pub fn validate(&self) -> Result<()> {
        if self.agent_count > MAX_AGENTS {
            return Err(Error::Config(format!(
                "agent_count {} exceeds maximum of {}",
                self.agent_count, MAX_AGENTS
            )));
        }
        if self.house_count == 0 {
            return Err(Error::Config("house_count must be at least 1".to_string()));
        }
        if !(self.world_width > 0.0 && self.world_height > 0.0) {
            return Err(Error::Config(format!(
                "world dimensions must be positive, got {}x{}",
                self.world_width, self.world_height
            )));
        }
        if !(self.step_speed.is_finite() && self.step_speed > 0.0) {
            return Err(Error::Config(format!(
                "step_speed must be positive, got {}",
                self.step_speed
            )));
        }
        if !(self.capture_radius.is_finite() && self.capture_radius >= 0.0) {
            return Err(Error::Config(format!(
                "capture_radius must be non-negative, got {}",
                self.capture_radius
            )));
        }

        let Thresholds {
            min_yield,
            max_risk,
        } = self.thresholds;
        if !(YIELD_RANGE.0..=YIELD_RANGE.1).contains(&min_yield) {
            return Err(Error::Config(format!(
                "min_yield {} outside {:?}",
                min_yield, YIELD_RANGE
            )));
        }
        if !(RISK_RANGE.0..=RISK_RANGE.1).contains(&max_risk) {
            return Err(Error::Config(format!(
                "max_risk {} outside {:?}",
                max_risk, RISK_RANGE
            )));
        }
        Ok(())
    }
}

/// Report generation and delivery settings
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    pub model: String,
    pub base_url: String,
    pub webhook_url: Option<String>,
    pub max_output_tokens: u32,
    /// Read from `MODEL_API_KEY`; never written back out.
    #[serde(skip_serializing)]
    pub api_key: Option<String>,
}

impl Default for ReportConfig {
    fn default() -> Self {
        ReportConfig {
            model: DEFAULT_MODEL.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            webhook_url: None,
            max_output_tokens: 512,
            api_key: None,
        }
    }
}

/// Per-run command-line overrides, applied on top of file and environment.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct RunOverrides {
    pub agent_count: Option<usize>,
    /// Reset thresholds to the market benchmark before explicit values apply
    pub oracle: bool,
    pub min_yield: Option<f32>,
    pub max_risk: Option<f32>,
    pub seed: Option<u64>,
}

/// Top-level configuration file layout
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub simulation: SimulationConfig,
    pub report: ReportConfig,
}

impl AppConfig {
    pub fn from_json_str(raw: &str) -> Result<Self> {
        Ok(serde_json::from_str(raw)?)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_json_str(&raw)
    }

    /// Overlay settings from the process environment.
    pub fn apply_env(&mut self) {
        self.apply_env_with(|key| std::env::var(key).ok());
    }

    /// Overlay settings from an arbitrary variable lookup.
    pub fn apply_env_with<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(key) = non_empty("MODEL_API_KEY") {
            self.report.api_key = Some(key);
        }
        if let Some(url) = non_empty("MODEL_BASE_URL") {
            self.report.base_url = url;
        }
        if let Some(model) = non_empty("SWARM_MODEL") {
            self.report.model = model;
        }
        if let Some(url) = non_empty("SWARM_WEBHOOK_URL") {
            self.report.webhook_url = Some(url);
        }
    }

    /// Apply run overrides and pin the seed. Returns the seed in effect.
    ///
    /// Order: agent count, oracle preset, explicit thresholds, then the seed
    /// (override, else configured, else freshly drawn).
    pub fn apply_run_overrides(&mut self, overrides: &RunOverrides) -> u64 {
        let sim = &mut self.simulation;
        if let Some(agents) = overrides.agent_count {
            sim.agent_count = agents;
        }
        if overrides.oracle {
            info!("🔮 [Oracle] Savills Autumn 2025 benchmark: yield floor 2.9%, max Composite Risk 34/50");
            sim.thresholds = Thresholds::market_benchmark();
        }
        if let Some(min_yield) = overrides.min_yield {
            sim.thresholds.min_yield = min_yield;
        }
        if let Some(max_risk) = overrides.max_risk {
            sim.thresholds.max_risk = max_risk;
        }
        let seed = resolve_seed(overrides.seed.or(sim.seed));
        sim.seed = Some(seed);
        seed
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
