//! Mix Simulator — projects reach, conversions, CPA, and ROI for every
//! segment × message × channel combination of a media plan.
//!
//! Main entry point that resolves configuration, applies overrides, runs the
//! engine, and writes the requested reports.

use clap::{Parser, ValueEnum};
use mixsim_core::config::AppConfig;
use mixsim_core::{catalog, overrides, BudgetSplit, MixSimError, SimulationInput};
use mixsim_engine::{simulate, summarize_by_channel};
use mixsim_reporting::{render_results, render_summary, write_csv, SimulationReport};
use tracing::{info, warn};

#[derive(Parser, Debug)]
#[command(name = "mix-simulator")]
#[command(about = "Marketing-mix simulator: projected funnel metrics per segment, message, and channel")]
#[command(version)]
struct Cli {
    /// Audience segments, comma-separated (overrides config)
    #[arg(long, value_delimiter = ',')]
    segments: Option<Vec<String>>,

    /// Message variants, comma-separated (overrides config)
    #[arg(long, value_delimiter = ',')]
    messages: Option<Vec<String>>,

    /// Media channels, comma-separated (overrides config)
    #[arg(long, value_delimiter = ',')]
    channels: Option<Vec<String>>,

    /// Total campaign budget in dollars (overrides config)
    #[arg(long, env = "MIXSIM__SIMULATION__TOTAL_BUDGET")]
    budget: Option<f64>,

    /// Budget weight per channel as `Channel=weight` (0-100); repeatable
    #[arg(long = "split", value_name = "CHANNEL=WEIGHT")]
    splits: Vec<String>,

    /// Persona upload with columns Segment, Message, Channel, Lift
    #[arg(long, env = "MIXSIM__OVERRIDES__LIFT_CSV")]
    lift_csv: Option<String>,

    /// Benchmark upload with columns Channel, CPM, CTR, CVR
    #[arg(long, env = "MIXSIM__OVERRIDES__BENCHMARK_CSV")]
    benchmark_csv: Option<String>,

    /// Inline benchmark as `Channel=CPM:CTR:CVR`; repeatable, applied after uploads
    #[arg(long = "benchmark", value_name = "CHANNEL=CPM:CTR:CVR")]
    benchmarks: Vec<String>,

    /// Inline lift as `Segment/Message=Lift`; repeatable, applied after uploads
    #[arg(long = "lift", value_name = "SEGMENT/MESSAGE=LIFT")]
    lifts: Vec<String>,

    /// Funnel model (overrides config)
    #[arg(long, value_enum)]
    model: Option<ModelArg>,

    /// Write the Looker Studio CSV export to this path
    #[arg(long, short)]
    output: Option<String>,

    /// Write the Looker Studio CSV export to the configured export path
    #[arg(long, default_value_t = false)]
    export: bool,

    /// Print the full run report as JSON instead of tables
    #[arg(long, default_value_t = false)]
    json: bool,

    /// Print the per-channel summary table
    #[arg(long, default_value_t = false)]
    summary: bool,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum ModelArg {
    Cpm,
    CostPerClick,
}

fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "mix_simulator=info,mixsim_core=info,mixsim_engine=info".into()),
        )
        .json()
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    // Load configuration
    let mut config = AppConfig::load().unwrap_or_else(|e| {
        warn!(error = %e, "Failed to load config, using defaults");
        AppConfig::default()
    });

    // Apply CLI overrides
    if let Some(segments) = cli.segments {
        config.simulation.segments = segments;
    }
    if let Some(messages) = cli.messages {
        config.simulation.messages = messages;
    }
    if let Some(channels) = cli.channels {
        config.simulation.channels = channels;
    }
    if let Some(budget) = cli.budget {
        config.simulation.total_budget = budget;
    }
    if let Some(model) = cli.model {
        config.simulation.model = match model {
            ModelArg::Cpm => "cpm",
            ModelArg::CostPerClick => "cost_per_click",
        }
        .to_string();
    }
    if cli.lift_csv.is_some() {
        config.overrides.lift_csv = cli.lift_csv;
    }
    if cli.benchmark_csv.is_some() {
        config.overrides.benchmark_csv = cli.benchmark_csv;
    }
    if cli.export {
        config.export.enabled = true;
    }

    let sim = &config.simulation;
    info!(
        segments = sim.segments.len(),
        messages = sim.messages.len(),
        channels = sim.channels.len(),
        total_budget = sim.total_budget,
        model = %sim.model,
        "Configuration loaded"
    );
    if !catalog::budget_in_range(sim.total_budget) {
        warn!(
            total_budget = sim.total_budget,
            min = catalog::MIN_TOTAL_BUDGET,
            max = catalog::MAX_TOTAL_BUDGET,
            "Total budget outside the planning range"
        );
    }

    let input = build_input(&config, &cli.splits, &cli.benchmarks, &cli.lifts)?;
    let results = simulate(&input);
    let summary = summarize_by_channel(&results);
    info!(rows = results.len(), channels = summary.len(), "Simulation finished");

    if let Some(path) = config.export.target(cli.output.as_deref()) {
        write_csv(&results, path)?;
    }

    if cli.json {
        let report = SimulationReport::new(&input, results, summary);
        println!("{}", report.to_json()?);
    } else {
        print!("{}", render_results(&results));
        if cli.summary && !summary.is_empty() {
            println!();
            print!("{}", render_summary(&summary));
        }
    }

    Ok(())
}

/// Assemble the per-run snapshot: catalog defaults, then uploads, then inline edits.
fn build_input(
    config: &AppConfig,
    splits: &[String],
    benchmarks: &[String],
    lifts: &[String],
) -> Result<SimulationInput, MixSimError> {
    let sim = &config.simulation;

    let mut lift_table = catalog::lift_table();
    if let Some(path) = &config.overrides.lift_csv {
        lift_table.merge(overrides::load_lift_csv(path)?);
    }
    for spec in lifts {
        lift_table.upsert(overrides::parse_lift_override(spec)?);
    }

    let mut benchmark_table = match &config.overrides.benchmark_csv {
        Some(path) => overrides::load_benchmark_csv(path)?,
        None => Default::default(),
    };
    for spec in benchmarks {
        benchmark_table.upsert(overrides::parse_benchmark_override(spec)?);
    }

    Ok(
        SimulationInput::new(&sim.segments, &sim.messages, &sim.channels, sim.total_budget)
            .with_split(budget_split(&sim.channels, splits)?)
            .with_lifts(lift_table)
            .with_benchmarks(benchmark_table)
            .with_model(sim.metric_model()?),
    )
}

/// Every selected channel starts at the default weight; `Channel=weight` entries replace it.
fn budget_split(channels: &[String], splits: &[String]) -> Result<BudgetSplit, MixSimError> {
    let mut split = catalog::even_split(channels);
    for spec in splits {
        let (channel, weight) = spec
            .split_once('=')
            .and_then(|(c, w)| Some((c.trim(), w.trim().parse::<u32>().ok()?)))
            .filter(|(c, _)| !c.is_empty())
            .ok_or_else(|| MixSimError::InvalidOverride(spec.clone()))?;
        split.set(channel, weight);
    }
    Ok(split)
}
