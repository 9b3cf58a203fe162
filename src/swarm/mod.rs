//! Swarm Engine
//!
//! Agents converge on property targets using tensor-based state (SoA) and
//! are classified by the yield/risk gate of the target they reach.

pub mod house;
pub mod metrics;
pub mod rng;
pub mod session;
pub mod state;
pub mod tensor_engine;

#[cfg(feature = "python")]
pub mod py_api;


pub use house::{House, HouseTable};
pub use metrics::{AgentPoint, FrameObserver, FrameRecorder, FrameSnapshot, StateCounts};
pub use session::{ActiveRun, PrimeTarget, RunSummary, Session};
pub use state::AgentState;
pub use tensor_engine::{StepParams, TensorSwarm};
