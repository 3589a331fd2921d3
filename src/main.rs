// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{Shell, generate};
use log::{Level, LevelFilter, Log, Metadata, Record, SetLoggerError, info, warn};
use std::fs::File;
use std::io::BufReader;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::app_config::{Config, Granularity};
use crate::database::Repository;
use crate::pipeline::{Pipeline, PipelineConfig};
use crate::transcode::{FfmpegTranscoder, WhisperRecognizer};

mod app_config;
mod database;
mod errors;
mod extractor;
mod file_utils;
mod language_utils;
mod pipeline;
mod subtitle_acquirer;
mod subtitle_processor;
mod transcode;

/// CLI Wrapper for LogLevel to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliLogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<CliLogLevel> for app_config::LogLevel {
    fn from(cli_level: CliLogLevel) -> Self {
        match cli_level {
            CliLogLevel::Error => app_config::LogLevel::Error,
            CliLogLevel::Warn => app_config::LogLevel::Warn,
            CliLogLevel::Info => app_config::LogLevel::Info,
            CliLogLevel::Debug => app_config::LogLevel::Debug,
            CliLogLevel::Trace => app_config::LogLevel::Trace,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Cut one clip per vocabulary word, output alongside the sources
    Words {
        /// Directory scanned recursively for source videos
        #[arg(value_name = "SOURCE_DIR")]
        source_dir: PathBuf,
    },

    /// Cut one clip per subtitle sentence into a separate output directory
    Sentences {
        /// Directory scanned recursively for source videos
        #[arg(value_name = "SOURCE_DIR")]
        source_dir: PathBuf,

        /// Directory the sentence clips are written to
        #[arg(value_name = "OUTPUT_DIR")]
        output_dir: PathBuf,
    },

    /// Generate shell completions for vocaclip
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// vocaclip - vocabulary clip extraction pipeline
///
/// Scans a directory of videos, derives timed subtitle text (cached file,
/// embedded track, or speech-to-text), cuts short clips keyed by word or by
/// sentence, and persists one metadata record per produced clip.
#[derive(Parser, Debug)]
#[command(name = "vocaclip")]
#[command(version = "0.1.0")]
#[command(about = "Cut videos into word and sentence clips driven by subtitles")]
#[command(long_about = "vocaclip scans a directory of videos, obtains subtitles for each \
(cached prepared file, embedded track extraction, or speech-to-text fallback), cuts short \
independently playable clips keyed by vocabulary word or by sentence, derives a thumbnail \
per clip, and persists clip metadata to an embedded SQLite database.

EXAMPLES:
    vocaclip words /media/lessons                   # Word clips next to their sources
    vocaclip sentences /media/lessons ./clips       # Sentence clips into ./clips
    vocaclip --log-level debug words /media/lessons # Verbose diagnostics
    vocaclip completions bash > vocaclip.bash       # Generate bash completions

CONFIGURATION:
    Configuration is stored in conf.json by default. You can specify a different
    config file with --config. If the config file doesn't exist, a default one
    will be created automatically.")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file path
    #[arg(short, long, default_value = "conf.json")]
    config_path: String,

    /// Metadata database path (overrides the config file)
    #[arg(long)]
    db_path: Option<PathBuf>,

    /// Set logging level
    #[arg(short, long, value_enum)]
    log_level: Option<CliLogLevel>,
}

// @struct: Custom logger implementation
struct CustomLogger {
    level: LevelFilter,
}

impl CustomLogger {
    // @creates: New logger with specified level
    fn new(level: LevelFilter) -> Self {
        CustomLogger { level }
    }

    // @initializes: Global logger
    fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
        let logger = Box::new(CustomLogger::new(level));
        log::set_boxed_logger(logger)?;
        log::set_max_level(level);
        Ok(())
    }

    // @returns: Emoji for log level
    fn get_emoji_for_level(level: Level) -> &'static str {
        match level {
            Level::Error => "❌ ",
            Level::Warn => "🚧 ",
            Level::Info => " ",
            Level::Debug => "🔍 ",
            Level::Trace => "📋 ",
        }
    }

    // @returns: ANSI color code for log level
    fn get_color_for_level(level: Level) -> &'static str {
        match level {
            Level::Error => "\x1B[1;31m",
            Level::Warn => "\x1B[1;33m",
            Level::Info => "\x1B[1;32m",
            Level::Debug => "\x1B[1;36m",
            Level::Trace => "\x1B[1;35m",
        }
    }
}

impl Log for CustomLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let now = chrono::Local::now().format("%H:%M:%S%.3f");
            let emoji = Self::get_emoji_for_level(record.level());
            let color = Self::get_color_for_level(record.level());

            let mut stderr = std::io::stderr();
            let _ = writeln!(
                stderr,
                "{}{} {} {}\x1B[0m",
                color,
                now,
                emoji,
                record.args()
            );
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize the logger once with info level by default
    // We'll update the level after loading the config if needed
    CustomLogger::init(LevelFilter::Info)?;

    let cli = CommandLineOptions::parse();

    let (source_dir, output_dir, granularity) = match &cli.command {
        Commands::Completions { shell } => {
            let mut cmd = CommandLineOptions::command();
            generate(*shell, &mut cmd, "vocaclip", &mut std::io::stdout());
            return Ok(());
        }
        Commands::Words { source_dir } => (source_dir.clone(), None, Granularity::Word),
        Commands::Sentences {
            source_dir,
            output_dir,
        } => (
            source_dir.clone(),
            Some(output_dir.clone()),
            Granularity::Sentence,
        ),
    };

    // If log level is set via command line, apply it immediately
    if let Some(cmd_log_level) = &cli.log_level {
        log::set_max_level(to_level_filter(&cmd_log_level.clone().into()));
    }

    // Load or create configuration
    let mut config = load_config(&cli.config_path)?;

    if let Some(log_level) = &cli.log_level {
        config.log_level = log_level.clone().into();
    }
    if let Some(db_path) = &cli.db_path {
        config.database_path = Some(db_path.clone());
    }

    // Validate the configuration after loading and overriding
    config
        .validate()
        .context("Configuration validation failed")?;

    // If log level was not set via command line, update it from config now
    if cli.log_level.is_none() {
        log::set_max_level(to_level_filter(&config.log_level));
    }

    info!(
        "vocaclip: {} mode over {:?}",
        granularity, source_dir
    );

    // Build the tool capabilities and the metadata sink
    let transcoder = FfmpegTranscoder::new(config.transcode_timeout_secs);
    let recognizer = WhisperRecognizer::new(
        &config.recognizer_model,
        config.recognizer_timeout_secs,
    )
    .with_language(&config.subtitle_language);

    // An unopenable sink is the fatal kind: abort before scanning anything
    let sink = open_sink(&config)?;

    let run_config = PipelineConfig {
        source_dir,
        output_dir,
        granularity,
    };

    let pipeline = Pipeline::new(&config, run_config, &transcoder, &recognizer, &sink);
    let summary = pipeline.run().await?;

    if summary.videos_found == 0 {
        warn!("No video files matched the accepted extensions");
    }

    Ok(())
}

fn to_level_filter(level: &app_config::LogLevel) -> LevelFilter {
    match level {
        app_config::LogLevel::Error => LevelFilter::Error,
        app_config::LogLevel::Warn => LevelFilter::Warn,
        app_config::LogLevel::Info => LevelFilter::Info,
        app_config::LogLevel::Debug => LevelFilter::Debug,
        app_config::LogLevel::Trace => LevelFilter::Trace,
    }
}

/// Open the metadata sink at the configured or default database location
fn open_sink(config: &Config) -> Result<Repository> {
    let repo = match &config.database_path {
        Some(path) => database::DatabaseConnection::new(path).map(Repository::new),
        None => Repository::new_default(),
    };

    repo.map_err(|e| errors::FatalError::SinkUnavailable(e.to_string()).into())
}

/// Load the configuration file, creating a default one when missing
fn load_config(config_path: &str) -> Result<Config> {
    if Path::new(config_path).exists() {
        let file = File::open(config_path)
            .context(format!("Failed to open config file: {}", config_path))?;

        let reader = BufReader::new(file);
        let config: Config = serde_json::from_reader(reader)
            .context(format!("Failed to parse config file: {}", config_path))?;

        Ok(config)
    } else {
        warn!(
            "Config file not found at '{}', creating default config.",
            config_path
        );

        let config = Config::default();
        let config_json = serde_json::to_string_pretty(&config)
            .context("Failed to serialize default config to JSON")?;

        std::fs::write(config_path, config_json)
            .context(format!("Failed to write default config to file: {}", config_path))?;

        Ok(config)
    }
}
