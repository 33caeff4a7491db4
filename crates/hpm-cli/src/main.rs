use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::builder::BoolishValueParser;
use clap::{Parser, Subcommand};
use hpm_cli::cli::{execute, report_check_in, CliCommand, CliConfig};
use hpm_core::roulette::DEFAULT_TICKS;
use hpm_core::tracing_setup::init_tracing_with_default;
use hpm_core::Tracker;

#[derive(Parser)]
#[command(name = "hpm")]
#[command(about = "High-performance mindset tracker")]
struct Cli {
    /// Pretty-print JSON output
    #[arg(long, short, global = true)]
    pretty: bool,

    /// Path to JSON config file (contains dataDir, catalogPath)
    #[arg(long, short = 'c', global = true)]
    config: Option<PathBuf>,

    /// Directory holding the state record
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// JSON catalog replacing the built-in reference tables
    #[arg(long, global = true)]
    catalog: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Show XP, rank, streaks and today's progress
    Status,

    /// Log an ANT (automatic negative thought)
    Log {
        /// Thought category, e.g. "Doubting ANT"
        category: String,
        /// Intensity from 1 to 5
        #[arg(long, short)]
        intensity: u8,
        /// Performed despite the thought
        #[arg(long, short)]
        attempted: bool,
        #[arg(long, default_value = "")]
        notes: String,
        /// Performance context, e.g. "sales call"
        #[arg(long, default_value = "")]
        context: String,
        /// Self-talk technique used (can be specified multiple times)
        #[arg(long = "self-talk", short = 's')]
        self_talk: Vec<String>,
        /// Body technique used (can be specified multiple times)
        #[arg(long, short)]
        body: Vec<String>,
        /// Game face ID worn for the performance
        #[arg(long, short = 'g')]
        game_face: Option<String>,
    },

    /// Record a completed risk scenario
    Risk {
        /// Scenario ID, e.g. "meeting"
        scenario_id: String,
    },

    /// Create a game face, or list them when no name is given
    GameFace {
        name: Option<String>,
        /// Power word (1 to 3, can be specified multiple times)
        #[arg(long, short = 'w')]
        word: Vec<String>,
        /// Person modelled
        #[arg(long, short)]
        model: Option<String>,
        /// memory, imagination or perception
        #[arg(long, short, default_value = "memory")]
        source: String,
    },

    /// Claim an unlocked streak reward
    Claim {
        /// Day threshold of the reward
        days: u32,
    },

    /// Toggle a boundary rule, or list rules when no ID is given
    Rule { rule_id: Option<String> },

    /// Log a completed exposure
    Exposure {
        exposure_id: String,
        /// Day to record against (defaults to today)
        #[arg(long, short)]
        date: Option<NaiveDate>,
    },

    /// Score a metric (0 or 1)
    Metric {
        metric_id: String,
        score: u8,
        #[arg(long, short)]
        date: Option<NaiveDate>,
    },

    /// Save the positive of the day
    Positive {
        text: String,
        #[arg(long, short)]
        date: Option<NaiveDate>,
    },

    /// Park a worry for the worry window
    Worry { text: String },

    /// Write the boundary policy
    Policy {
        #[arg(long)]
        will_do: String,
        #[arg(long)]
        wont_do: String,
        #[arg(long, default_value = "")]
        exit_date: String,
        #[arg(long, default_value = "")]
        notice_date: String,
        /// Script to attach
        #[arg(long)]
        script: Option<String>,
    },

    /// Print a script
    Script { script_id: String },

    /// Set dark mode (on/off), or flip it when no value is given
    DarkMode {
        #[arg(value_parser = BoolishValueParser::new())]
        enabled: Option<bool>,
    },

    /// Spin the power-word roulette
    Spin {
        #[arg(long, default_value_t = DEFAULT_TICKS)]
        ticks: u32,
    },

    /// Print the stored record as JSON
    Dump,
}

fn main() {
    init_tracing_with_default("warn");
    let cli = Cli::parse();

    let Some(command) = cli.command else {
        eprintln!("No command specified. Use --help for usage.");
        std::process::exit(1);
    };
    let command = to_cli_command(command, cli.pretty);

    let file_config = match &cli.config {
        Some(path) => match CliConfig::load(path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("Error: {:#}", e);
                std::process::exit(1);
            }
        },
        None => CliConfig::default(),
    };
    let config = file_config.merge(cli.data_dir, cli.catalog);

    if let Err(e) = run(config, command) {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn run(config: CliConfig, command: CliCommand) -> Result<()> {
    let mut tracker = Tracker::open(&config.into_core()).context("Failed to open tracker")?;

    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    let outcome = tracker.check_in();
    report_check_in(&outcome, &mut out)?;
    if !tracker.is_persistent() {
        eprintln!("Warning: changes could not be saved and will be lost on exit");
    }

    execute(&mut tracker, command, &mut out)?;
    out.flush()?;
    Ok(())
}

fn to_cli_command(command: Commands, pretty: bool) -> CliCommand {
    match command {
        Commands::Status => CliCommand::Status,
        Commands::Log {
            category,
            intensity,
            attempted,
            notes,
            context,
            self_talk,
            body,
            game_face,
        } => CliCommand::Log {
            category,
            intensity,
            attempted,
            notes,
            context,
            self_talk,
            body,
            game_face_id: game_face,
        },
        Commands::Risk { scenario_id } => CliCommand::Risk { scenario_id },
        Commands::GameFace {
            name: Some(name),
            word,
            model,
            source,
        } => CliCommand::CreateGameFace {
            name,
            power_words: word,
            model_person: model,
            source,
        },
        Commands::GameFace { name: None, .. } => CliCommand::ListGameFaces,
        Commands::Claim { days } => CliCommand::Claim { days },
        Commands::Rule {
            rule_id: Some(rule_id),
        } => CliCommand::ToggleRule { rule_id },
        Commands::Rule { rule_id: None } => CliCommand::ListRules,
        Commands::Exposure { exposure_id, date } => CliCommand::Exposure { exposure_id, date },
        Commands::Metric {
            metric_id,
            score,
            date,
        } => CliCommand::Metric {
            metric_id,
            score,
            date,
        },
        Commands::Positive { text, date } => CliCommand::Positive { text, date },
        Commands::Worry { text } => CliCommand::Worry { text },
        Commands::Policy {
            will_do,
            wont_do,
            exit_date,
            notice_date,
            script,
        } => CliCommand::Policy {
            will_do,
            wont_do,
            exit_date,
            notice_date,
            script_id: script,
        },
        Commands::Script { script_id } => CliCommand::Script { script_id },
        Commands::DarkMode { enabled } => CliCommand::DarkMode { enabled },
        Commands::Spin { ticks } => CliCommand::Spin { ticks },
        Commands::Dump => CliCommand::Dump { pretty },
    }
}
