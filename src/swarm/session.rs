//! Session-scoped simulation state.
//!
//! A `Session` owns the house table (generated once) and the prime target
//! captured by the latest run that produced a Hunter. Runs borrow the table;
//! agent columns live only as long as the run.

use super::house::{House, HouseTable};
use super::metrics::{FrameObserver, FrameSnapshot, StateCounts};
use super::tensor_engine::{StepParams, TensorSwarm};
use crate::core::config::SimulationConfig;
use crate::error::Result;
use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::info;

/// Target locked by the first Hunter of a run.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PrimeTarget {
    pub agent_index: usize,
    pub house_index: usize,
    pub house: House,
    pub captured_at: DateTime<Utc>,
}

/// Outcome of a completed run
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RunSummary {
    pub agent_count: usize,
    pub frames: usize,
    pub counts: StateCounts,
    /// This run's first Hunter, if any
    pub first_hunter: Option<PrimeTarget>,
    pub completed_at: DateTime<Utc>,
}

/// A run in progress, advanced one frame at a time.
#[derive(Clone, Debug)]
pub struct ActiveRun {
    swarm: TensorSwarm,
    params: StepParams,
    frames: usize,
    frame: usize,
}

impl ActiveRun {
    /// Frames completed so far
    pub fn frame(&self) -> usize {
        self.frame
    }

    pub fn is_finished(&self) -> bool {
        self.frame >= self.frames
    }
}

#[derive(Clone, Debug)]
pub struct Session {
    houses: HouseTable,
    prime_target: Option<PrimeTarget>,
}

impl Session {
    pub fn new(houses: HouseTable) -> Self {
        Session {
            houses,
            prime_target: None,
        }
    }

    pub fn generate<R: Rng + ?Sized>(config: &SimulationConfig, rng: &mut R) -> Self {
        let houses =
            HouseTable::generate(config.house_count, config.world_width, config.world_height, rng);
        Self::new(houses)
    }

    pub fn houses(&self) -> &HouseTable {
        &self.houses
    }

    pub fn prime_target(&self) -> Option<&PrimeTarget> {
        self.prime_target.as_ref()
    }

    /// Spawn agents and assign targets for a new run.
    pub fn begin_run<R: Rng + ?Sized>(
        &self,
        config: &SimulationConfig,
        rng: &mut R,
    ) -> Result<ActiveRun> {
        config.validate()?;

        info!(
            "🚀 [Session] Initiating swarm: {} agents, yield >= {:.1}%, risk <= {:.0}",
            config.agent_count, config.thresholds.min_yield, config.thresholds.max_risk
        );

        let swarm = TensorSwarm::spawn(
            config.agent_count,
            &self.houses,
            config.world_width,
            config.world_height,
            rng,
        )?;

        Ok(ActiveRun {
            swarm,
            params: StepParams::from_config(config),
            frames: config.frames,
            frame: 0,
        })
    }

    /// Step the run by one frame. Returns `None` once all frames are done.
    pub fn advance(&self, run: &mut ActiveRun, with_points: bool) -> Option<FrameSnapshot> {
        if run.is_finished() {
            return None;
        }
        run.swarm.step(&self.houses, &run.params);
        let snapshot = FrameSnapshot::capture(run.frame, &run.swarm, with_points);
        run.frame += 1;
        Some(snapshot)
    }

    /// Close a run and capture its first Hunter as the prime target.
    ///
    /// A run without Hunters leaves an earlier prime target in place.
    pub fn finish(&mut self, run: ActiveRun) -> RunSummary {
        let completed_at = Utc::now();
        let first_hunter = run.swarm.first_hunter().map(|agent_index| {
            let house_index = run.swarm.target[agent_index] as usize;
            PrimeTarget {
                agent_index,
                house_index,
                house: self.houses.as_slice()[house_index],
                captured_at: completed_at,
            }
        });

        match &first_hunter {
            Some(target) => {
                info!(
                    "🎯 [Session] Target acquisition finalized: house #{} (yield {:.1}%, risk {:.0})",
                    target.house_index, target.house.yield_pct, target.house.risk
                );
                self.prime_target = Some(*target);
            }
            None => info!("[Session] Run ended without a Hunter"),
        }

        RunSummary {
            agent_count: run.swarm.len(),
            frames: run.frame,
            counts: run.swarm.counts(),
            first_hunter,
            completed_at,
        }
    }

    /// Run every frame, reporting each snapshot to `observer`.
    pub fn run<R: Rng + ?Sized>(
        &mut self,
        config: &SimulationConfig,
        rng: &mut R,
        observer: &mut dyn FrameObserver,
    ) -> Result<RunSummary> {
        let mut run = self.begin_run(config, rng)?;
        let with_points = observer.wants_points();
        while let Some(snapshot) = self.advance(&mut run, with_points) {
            observer.on_frame(&snapshot)?;
        }
        Ok(self.finish(run))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::swarm::metrics::FrameRecorder;
    use crate::swarm::rng::create_rng;

    fn small_config(agents: usize) -> SimulationConfig {
        SimulationConfig {
            agent_count: agents,
            seed: Some(5),
            ..SimulationConfig::default()
        }
    }

    #[test]
    fn zero_agents_runs_all_frames() {
        let cfg = small_config(0);
        let mut rng = create_rng(5);
        let mut session = Session::generate(&cfg, &mut rng);
        let mut recorder = FrameRecorder::new(true);

        let summary = session.run(&cfg, &mut rng, &mut recorder).unwrap();
        assert_eq!(summary.frames, 30);
        assert_eq!(summary.agent_count, 0);
        assert_eq!(summary.counts, StateCounts::default());
        assert!(summary.first_hunter.is_none());
        assert_eq!(recorder.frames.len(), 30);
        assert!(recorder.frames.iter().all(|f| f.points.is_empty()));
        assert!(session.prime_target().is_none());
    }

    #[test]
    fn same_seed_same_summary() {
        let cfg = small_config(1500);
        let run_once = || {
            let mut rng = create_rng(21);
            let mut session = Session::generate(&cfg, &mut rng);
            let summary = session.run(&cfg, &mut rng, &mut ()).unwrap();
            (summary.counts, summary.first_hunter.map(|t| (t.agent_index, t.house_index)))
        };
        assert_eq!(run_once(), run_once());
    }

    #[test]
    fn captures_first_hunter_by_index() {
        let houses = HouseTable::from_houses(vec![
            House::new(100.0, 100.0, 5.0, 40.0),
            House::new(900.0, 900.0, 8.0, 10.0),
        ]);
        let mut session = Session::new(houses);
        let cfg = small_config(400);
        let mut rng = create_rng(8);

        let summary = session.run(&cfg, &mut rng, &mut ()).unwrap();
        let prime = summary.first_hunter.expect("expected a hunter");
        assert_eq!(prime.house_index, 1);
        assert_eq!(prime.house.risk, 10.0);
        assert_eq!(session.prime_target(), Some(&prime));
    }

    #[test]
    fn run_without_hunter_keeps_prime_target() {
        let good = HouseTable::from_houses(vec![House::new(500.0, 500.0, 6.0, 10.0)]);
        let mut session = Session::new(good);
        let cfg = small_config(200);
        let mut rng = create_rng(2);
        session.run(&cfg, &mut rng, &mut ()).unwrap();
        let before = *session.prime_target().unwrap();

        // Raise the yield floor above every target so nobody qualifies
        let strict = SimulationConfig {
            thresholds: crate::core::config::Thresholds::new(10.0, 34.0),
            ..cfg
        };
        let summary = session.run(&strict, &mut rng, &mut ()).unwrap();
        assert!(summary.first_hunter.is_none());
        assert_eq!(session.prime_target(), Some(&before));
    }

    #[test]
    fn frame_by_frame_matches_run() {
        let cfg = small_config(300);
        let mut rng = create_rng(13);
        let session = Session::generate(&cfg, &mut rng);

        let mut run = session.begin_run(&cfg, &mut rng).unwrap();
        let mut seen = 0;
        while let Some(snapshot) = session.advance(&mut run, false) {
            assert_eq!(snapshot.frame, seen);
            assert_eq!(snapshot.counts.total(), 300);
            seen += 1;
        }
        assert!(run.is_finished());
        assert_eq!(seen, 30);
        assert_eq!(run.frame(), 30);
        assert!(session.advance(&mut run, false).is_none());
    }

    #[test]
    fn invalid_config_rejected_before_spawn() {
        let cfg = SimulationConfig {
            agent_count: 50_000,
            ..SimulationConfig::default()
        };
        let mut rng = create_rng(1);
        let session = Session::generate(&SimulationConfig::default(), &mut rng);
        assert!(matches!(session.begin_run(&cfg, &mut rng), Err(Error::Config(_))));
    }
}
