//! Swarm Estate - Autonomous Agent Property Scanning
//!
//! Simulates thousands of lightweight agents converging on mock property
//! targets, classifying each agent by a yield/risk threshold rule, then
//! optionally generating and delivering an executive report for the first
//! target the swarm locks onto.

pub mod core;
pub mod error;
pub mod report;
pub mod swarm;

#[cfg(feature = "python")]
use pyo3::prelude::*;

pub use crate::core::config::{AppConfig, ReportConfig, SimulationConfig, Thresholds};
pub use error::{Error, Result};
pub use report::{deliver_report, ReportOutcome, ReportSource};
pub use swarm::{AgentState, House, HouseTable, PrimeTarget, RunSummary, Session, TensorSwarm};

/// Initialize tracing for the library.
#[cfg_attr(feature = "python", pyfunction)]
pub fn setup_logging(level: Option<String>) {
    let filter = level.unwrap_or_else(|| "info".to_string());
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

/// Python module initialization
#[cfg(feature = "python")]
#[pymodule]
fn swarm_estate(_py: Python, m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_function(wrap_pyfunction!(setup_logging, m)?)?;
    m.add_class::<swarm::py_api::PySwarmSession>()?;
    Ok(())
}
