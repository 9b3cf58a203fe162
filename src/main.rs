use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;
use std::time::Duration;
use swarm_estate::core::config::{AppConfig, RunOverrides};
use swarm_estate::core::runner::{get_shared_client, get_shared_runtime};
use swarm_estate::report::{deliver_report, GeminiReportGenerator, NotificationSink, WebhookSink};
use swarm_estate::swarm::metrics::{FrameObserver, FrameSnapshot};
use swarm_estate::swarm::rng::{create_rng, resolve_seed};
use swarm_estate::swarm::Session;
use swarm_estate::setup_logging;
use tracing::info;

#[derive(Parser)]
#[command(name = "swarm-estate")]
#[command(about = "Swarm Estate - autonomous agent property scanning simulation")]
struct Cli {
    /// Log filter (overridden by RUST_LOG)
    #[arg(long, global = true, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run one swarm hunt and optionally report the prime target
    Run(RunArgs),
    /// Print the generated house table as JSON
    Houses {
        #[arg(long)]
        config: Option<PathBuf>,
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Dump the default configuration to stdout
    DumpDefaultConfig,
}

#[derive(Args)]
struct RunArgs {
    /// Path to config file (JSON)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Number of agents
    #[arg(long)]
    agents: Option<usize>,

    /// Target yield threshold (%)
    #[arg(long)]
    min_yield: Option<f32>,

    /// Maximum Composite Risk Index
    #[arg(long)]
    max_risk: Option<f32>,

    /// Use the market oracle benchmark thresholds (2.9% yield, 34 risk)
    #[arg(long, conflicts_with_all = ["min_yield", "max_risk"])]
    oracle: bool,

    #[arg(long)]
    seed: Option<u64>,

    /// Stream frame snapshots (with agent points) as JSON lines
    #[arg(long)]
    frames_out: Option<PathBuf>,

    /// Pause between frames, for live viewers of --frames-out
    #[arg(long, default_value_t = 0)]
    frame_delay_ms: u64,

    /// Generate and deliver the executive report after the run
    #[arg(long)]
    report: bool,
}

/// Logs counts every frame and optionally streams snapshots to a file.
struct CliObserver {
    out: Option<BufWriter<File>>,
    delay: Duration,
}

impl FrameObserver for CliObserver {
    fn wants_points(&self) -> bool {
        self.out.is_some()
    }

    fn on_frame(&mut self, snapshot: &FrameSnapshot) -> swarm_estate::Result<()> {
        info!("[Frame {:>2}] {}", snapshot.frame + 1, snapshot.counts);
        if let Some(out) = self.out.as_mut() {
            writeln!(out, "{}", snapshot.to_json_line()?)?;
        }
        if !self.delay.is_zero() {
            std::thread::sleep(self.delay);
        }
        Ok(())
    }
}

fn load_config(path: Option<&PathBuf>) -> Result<AppConfig> {
    let mut config = match path {
        Some(p) => AppConfig::from_json_file(p)
            .with_context(|| format!("Failed to load config from {}", p.display()))?,
        None => AppConfig::default(),
    };
    config.apply_env();
    Ok(config)
}

fn run(args: RunArgs) -> Result<()> {
    let mut config = load_config(args.config.as_ref())?;
    let seed = config.apply_run_overrides(&RunOverrides {
        agent_count: args.agents,
        oracle: args.oracle,
        min_yield: args.min_yield,
        max_risk: args.max_risk,
        seed: args.seed,
    });
    config
        .simulation
        .validate()
        .context("Invalid simulation configuration")?;

    info!("[Session] Seed: {}", seed);
    let mut rng = create_rng(seed);
    let mut session = Session::generate(&config.simulation, &mut rng);

    let out = match &args.frames_out {
        Some(path) => Some(BufWriter::new(
            File::create(path).with_context(|| format!("Failed to create {}", path.display()))?,
        )),
        None => None,
    };
    let mut observer = CliObserver {
        out,
        delay: Duration::from_millis(args.frame_delay_ms),
    };

    let summary = session.run(&config.simulation, &mut rng, &mut observer)?;
    if let Some(out) = observer.out.as_mut() {
        out.flush()?;
    }
    println!("{}", serde_json::to_string_pretty(&summary)?);

    if !args.report {
        return Ok(());
    }
    let Some(target) = session.prime_target().map(|t| t.house) else {
        info!("[Report] No prime target locked; report stage stays dormant");
        return Ok(());
    };

    let client = get_shared_client();
    let generator = GeminiReportGenerator::new(client.clone(), &config.report);
    let sink = config
        .report
        .webhook_url
        .as_deref()
        .map(|url| WebhookSink::new(client, url));

    let outcome = get_shared_runtime().block_on(async {
        deliver_report(
            &target,
            &generator,
            sink.as_ref().map(|s| s as &dyn NotificationSink),
        )
        .await
    });
    println!("\n{}", outcome.display());
    Ok(())
}

fn houses(config: Option<PathBuf>, seed: Option<u64>) -> Result<()> {
    let config = load_config(config.as_ref())?;
    let seed = resolve_seed(seed.or(config.simulation.seed));
    let session = Session::generate(&config.simulation, &mut create_rng(seed));
    println!("{}", serde_json::to_string_pretty(session.houses())?);
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let filter = std::env::var("RUST_LOG").unwrap_or(cli.log_level);
    setup_logging(Some(filter));

    match cli.command {
        Commands::Run(args) => run(args),
        Commands::Houses { config, seed } => houses(config, seed),
        Commands::DumpDefaultConfig => {
            println!("{}", AppConfig::default().to_json_pretty()?);
            Ok(())
        }
    }
}
