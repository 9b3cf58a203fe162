use super::metrics::FrameSnapshot;
use super::rng::{create_rng, resolve_seed};
use super::session::{RunSummary, Session};
use crate::core::config::{AppConfig, Thresholds};
use crate::core::runner::{get_shared_client, get_shared_runtime};
use crate::report::{deliver_report, GeminiReportGenerator, NotificationSink, WebhookSink};
use pyo3::prelude::*;
use pyo3::types::PyDict;
use rand_chacha::ChaCha12Rng;

/// Session handle for a Python UI host that renders every frame itself.
#[pyclass(name = "SwarmSession")]
pub struct PySwarmSession {
    session: Session,
    config: AppConfig,
    rng: ChaCha12Rng,
    #[pyo3(get)]
    seed: u64,
}

#[pymethods]
impl PySwarmSession {
    #[new]
    #[pyo3(signature = (seed = None, house_count = 200))]
    pub fn new(seed: Option<u64>, house_count: usize) -> PyResult<Self> {
        let mut config = AppConfig::default();
        config.apply_env();
        config.simulation.house_count = house_count;

        let seed = resolve_seed(seed);
        let mut rng = create_rng(seed);
        let session = Session::generate(&config.simulation, &mut rng);

        Ok(PySwarmSession {
            session,
            config,
            rng,
            seed,
        })
    }

    /// House table as (x, y, yield, risk) rows
    pub fn houses(&self) -> Vec<(f32, f32, f32, f32)> {
        self.session
            .houses()
            .iter()
            .map(|h| (h.x, h.y, h.yield_pct, h.risk))
            .collect()
    }

    /// Run a full simulation, calling `on_frame(dict)` after every frame.
    ///
    /// Frame dicts carry `frame`, the four state counts, and `x`/`y`/`colors`
    /// marker columns.
    #[pyo3(signature = (agent_count = 10_000, min_yield = 2.9, max_risk = 34.0, on_frame = None))]
    pub fn run(
        &mut self,
        py: Python<'_>,
        agent_count: usize,
        min_yield: f32,
        max_risk: f32,
        on_frame: Option<PyObject>,
    ) -> PyResult<PyObject> {
        let mut sim = self.config.simulation.clone();
        sim.agent_count = agent_count;
        sim.thresholds = Thresholds::new(min_yield, max_risk);

        let mut run = self.session.begin_run(&sim, &mut self.rng)?;
        let with_points = on_frame.is_some();
        while let Some(snapshot) = self.session.advance(&mut run, with_points) {
            if let Some(callback) = &on_frame {
                let frame = frame_to_dict(py, &snapshot)?;
                callback.call1(py, (frame,))?;
            }
        }

        let summary = self.session.finish(run);
        summary_to_dict(py, &summary)
    }

    /// Prime target as (x, y, yield, risk), if any run has locked one
    pub fn prime_target(&self) -> Option<(f32, f32, f32, f32)> {
        self.session
            .prime_target()
            .map(|t| (t.house.x, t.house.y, t.house.yield_pct, t.house.risk))
    }

    /// Generate and deliver the executive report for the prime target.
    ///
    /// Returns (display_text, source, delivered), or None when no target is locked.
    pub fn generate_report(&self, py: Python<'_>) -> PyResult<Option<(String, String, bool)>> {
        let Some(target) = self.session.prime_target().map(|t| t.house) else {
            return Ok(None);
        };
        let report_cfg = self.config.report.clone();

        let outcome = py.allow_threads(move || {
            let client = get_shared_client();
            let generator = GeminiReportGenerator::new(client.clone(), &report_cfg);
            let sink = report_cfg
                .webhook_url
                .as_deref()
                .map(|url| WebhookSink::new(client, url));

            get_shared_runtime().block_on(async {
                deliver_report(
                    &target,
                    &generator,
                    sink.as_ref().map(|s| s as &dyn NotificationSink),
                )
                .await
            })
        });

        let source = match outcome.source {
            crate::report::ReportSource::Generated => "generated",
            crate::report::ReportSource::Fallback => "fallback",
        };
        Ok(Some((outcome.display(), source.to_string(), outcome.delivered)))
    }
}

fn frame_to_dict(py: Python<'_>, snapshot: &FrameSnapshot) -> PyResult<PyObject> {
    let dict = PyDict::new_bound(py);
    dict.set_item("frame", snapshot.frame)?;
    dict.set_item("scouts", snapshot.counts.scouts)?;
    dict.set_item("analysts", snapshot.counts.analysts)?;
    dict.set_item("shield_veto", snapshot.counts.shield_veto)?;
    dict.set_item("hunters", snapshot.counts.hunters)?;

    let xs: Vec<f32> = snapshot.points.iter().map(|p| p.x).collect();
    let ys: Vec<f32> = snapshot.points.iter().map(|p| p.y).collect();
    let colors: Vec<&str> = snapshot.points.iter().map(|p| p.color).collect();
    dict.set_item("x", xs)?;
    dict.set_item("y", ys)?;
    dict.set_item("colors", colors)?;
    Ok(dict.into())
}

fn summary_to_dict(py: Python<'_>, summary: &RunSummary) -> PyResult<PyObject> {
    let dict = PyDict::new_bound(py);
    dict.set_item("agent_count", summary.agent_count)?;
    dict.set_item("frames", summary.frames)?;
    dict.set_item("scouts", summary.counts.scouts)?;
    dict.set_item("analysts", summary.counts.analysts)?;
    dict.set_item("shield_veto", summary.counts.shield_veto)?;
    dict.set_item("hunters", summary.counts.hunters)?;
    dict.set_item(
        "prime_target",
        summary
            .first_hunter
            .map(|t| (t.house.x, t.house.y, t.house.yield_pct, t.house.risk)),
    )?;
    dict.set_item("completed_at", summary.completed_at.to_rfc3339())?;
    Ok(dict.into())
}
