use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::time::Instant;
use tracing_subscriber::prelude::*;

const EXIT_SUCCESS: i32 = 0;
const EXIT_INPUT: i32 = 2;
const EXIT_CONFIG: i32 = 4;

#[derive(Subcommand, Debug)]
enum Commands {
    /// Score a channel snapshot and print the report
    Score {
        /// Snapshot JSON file, or "-" for stdin
        #[arg(default_value = "snapshot.json")]
        snapshot: PathBuf,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,

        /// Skip insight generation
        #[arg(long)]
        no_insights: bool,
    },
    /// Track channel experiments
    #[command(subcommand)]
    Experiment(ExperimentCommand),
}

#[derive(Subcommand, Debug)]
enum ExperimentCommand {
    /// Start a new experiment
    Add {
        name: String,
        /// What you expect to happen
        #[arg(long)]
        hypothesis: String,
        /// Video the experiment applies to
        #[arg(long)]
        video: Option<String>,
    },
    /// List all experiments
    List,
    /// Record the outcome of an experiment by its index number
    Conclude {
        /// Index number of the experiment (1-based, as shown in list)
        index: usize,
        outcome: String,
    },
}

#[derive(Parser, Debug)]
#[command(name = "channel-pulse")]
#[command(about = "Channel health, trust and saturation scoring", long_about = None)]
#[command(version)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to config file (defaults to ~/.config/channel-pulse/config.yaml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

fn init_tracing(verbose: bool) {
    let default_filter = if verbose { "channel_pulse=debug" } else { "channel_pulse=warn" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    channel_pulse::install_crypto_provider();

    let config = match channel_pulse::config::load_config(cli.config) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Config error: {:#}", e);
            std::process::exit(EXIT_CONFIG);
        }
    };

    let code = match cli.command {
        Commands::Score {
            snapshot,
            json,
            no_insights,
        } => run_score(&config, snapshot, json, no_insights).await,
        Commands::Experiment(command) => run_experiment(&config, command),
    };

    std::process::exit(code);
}

async fn run_score(
    config: &channel_pulse::config::Config,
    snapshot_path: PathBuf,
    json: bool,
    no_insights: bool,
) -> i32 {
    let start_time = Instant::now();

    // Validate everything up front so all problems are reported together
    let scoring = config.scoring.clone().unwrap_or_default();
    let insights_config = config.insights.clone().unwrap_or_default();
    let mut errors = Vec::new();
    if let Err(mut e) = channel_pulse::scoring::validate_scoring(&scoring) {
        errors.append(&mut e);
    }
    if let Err(mut e) = channel_pulse::insights::validate_insights(&insights_config) {
        errors.append(&mut e);
    }
    if !errors.is_empty() {
        eprintln!("Config errors:");
        for error in errors {
            eprintln!("  - {}", error);
        }
        return EXIT_CONFIG;
    }

    let snapshot = match channel_pulse::snapshot::load_snapshot(&snapshot_path) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Snapshot error: {:#}", e);
            return EXIT_INPUT;
        }
    };

    let report = channel_pulse::scoring::assess(&snapshot, &scoring);
    tracing::debug!(
        videos = report.video_count,
        notices = report.notices.len(),
        "Scored snapshot in {:?}",
        start_time.elapsed()
    );

    let insights = if no_insights {
        None
    } else {
        let chain = match channel_pulse::insights::InsightChain::from_config(&insights_config) {
            Ok(c) => c,
            Err(e) => {
                eprintln!("Config error: {:#}", e);
                return EXIT_CONFIG;
            }
        };
        Some(chain.generate(&report).await)
    };

    if json {
        match channel_pulse::output::format_json(&report, insights.as_ref()) {
            Ok(output) => println!("{}", output),
            Err(e) => {
                eprintln!("{:#}", e);
                return EXIT_INPUT;
            }
        }
    } else {
        let use_colors = channel_pulse::output::should_use_colors();
        println!("{}", channel_pulse::output::format_report(&report, use_colors));
        if let Some(ref insights) = insights {
            println!();
            println!("{}", channel_pulse::output::format_insights(insights, use_colors));
        }
    }

    tracing::debug!("Done in {:?}", start_time.elapsed());
    EXIT_SUCCESS
}

fn run_experiment(config: &channel_pulse::config::Config, command: ExperimentCommand) -> i32 {
    use channel_pulse::experiments::{load_log, save_log, FileStore};

    let mut store = FileStore::new(channel_pulse::config::data_dir(config));
    let mut log = match load_log(&store) {
        Ok(l) => l,
        Err(e) => {
            eprintln!("Experiment log error: {:#}", e);
            return EXIT_INPUT;
        }
    };
    let now = chrono::Utc::now();

    match command {
        ExperimentCommand::List => {
            let use_colors = channel_pulse::output::should_use_colors();
            println!(
                "{}",
                channel_pulse::output::format_experiments(&log, now, use_colors)
            );
            return EXIT_SUCCESS;
        }
        ExperimentCommand::Add {
            name,
            hypothesis,
            video,
        } => {
            let index = log.start(name.clone(), hypothesis, video, now);
            println!("Started experiment {}: {}", index, name);
        }
        ExperimentCommand::Conclude { index, outcome } => {
            if !log.conclude(index, outcome, now) {
                eprintln!(
                    "Invalid index {}. Must be between 1 and {}.",
                    index,
                    log.entries.len()
                );
                return EXIT_INPUT;
            }
            println!("Concluded experiment {}", index);
        }
    }

    if let Err(e) = save_log(&mut store, &log) {
        eprintln!("Experiment log error: {:#}", e);
        return EXIT_INPUT;
    }
    EXIT_SUCCESS
}
