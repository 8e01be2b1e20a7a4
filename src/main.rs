use chrono::Utc;
use clap::Parser;
use tokio::runtime::Handle;
use tracing_subscriber::EnvFilter;

use trainpulse::application::config::AppConfig;
use trainpulse::application::services::pipeline::Pipeline;
use trainpulse::application::services::scheduler::TickScheduler;
use trainpulse::domain::ports::clock::Clock;
use trainpulse::infrastructure::clock::{ManualClock, SystemClock};
use trainpulse::infrastructure::random::RngSource;
use trainpulse::presentation::cli::app::{Cli, Commands};
use trainpulse::presentation::cli::commands::config::run_config;
use trainpulse::presentation::cli::commands::run::run_headless;
use trainpulse::presentation::cli::commands::snapshot::{run_snapshot, simulate};
use trainpulse::presentation::tui::app::{run_tui, DashboardOptions};

fn setup_tracing(verbose: bool, dashboard: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else if dashboard {
        EnvFilter::new("warn")
    } else {
        EnvFilter::new("info")
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn build_pipeline(
    config: &AppConfig,
    seed: Option<u64>,
    clock: Box<dyn Clock>,
) -> anyhow::Result<Pipeline> {
    let settings = config.pipeline_settings()?;
    let seed = seed.or(config.general.seed);
    if let Some(seed) = seed {
        tracing::debug!(seed, "Seeded session");
    }
    Ok(Pipeline::new(
        &settings,
        Box::new(RngSource::from_seed_option(seed)),
        clock,
    )?)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let command = cli.command.unwrap_or_else(Commands::default_watch);

    setup_tracing(cli.verbose, matches!(command, Commands::Watch { .. }));

    // Load configuration
    let config_path = match cli.config {
        Some(path) => path,
        None => AppConfig::config_path()?,
    };
    let config = AppConfig::load_or_create(&config_path)?;

    // Manual DI: main.rs is the only place that knows concrete types
    match command {
        Commands::Watch {
            interval,
            smoothing,
            seed,
            paused,
        } => {
            let pipeline = build_pipeline(&config, seed, Box::new(SystemClock))?;
            let scheduler = TickScheduler::new(
                pipeline,
                interval.unwrap_or(config.general.interval),
                Handle::current(),
            );
            let options = DashboardOptions {
                window: smoothing.unwrap_or(config.general.smoothing),
                running: config.general.running && !paused,
                resume_on_visible: config.visibility.resume_on_visible,
                model: config.session.model.clone(),
                dataset: config.session.dataset.clone(),
            };
            // The draw loop blocks on terminal input; keep the tick task free to run
            tokio::task::block_in_place(|| run_tui(scheduler, options))?;
        }
        Commands::Run {
            ticks,
            interval,
            seed,
        } => {
            let pipeline = build_pipeline(&config, seed, Box::new(SystemClock))?;
            let mut scheduler = TickScheduler::new(
                pipeline,
                interval.unwrap_or(config.general.interval),
                Handle::current(),
            );
            let report = run_headless(&mut scheduler, ticks).await?;
            tracing::info!(ticks = report.ticks, events = report.events, "Run finished");
        }
        Commands::Snapshot {
            ticks,
            smoothing,
            seed,
            json,
        } => {
            let clock = ManualClock::new(Utc::now());
            let mut pipeline = build_pipeline(&config, seed, Box::new(clock.clone()))?;
            let snapshot = simulate(
                &mut pipeline,
                &clock,
                ticks,
                config.general.interval,
                smoothing.unwrap_or(config.general.smoothing),
            );
            run_snapshot(
                &snapshot,
                &config.session.model,
                &config.session.dataset,
                json,
            )?;
        }
        Commands::Config { path } => {
            run_config(&config, &config_path, path)?;
        }
    }

    Ok(())
}
