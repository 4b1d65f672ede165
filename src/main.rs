// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::{Context, Result};
use clap::{Args, CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{generate, Shell};
use log::{error, warn, Level, LevelFilter, Log, Metadata, Record, SetLoggerError};
use std::fs::File;
use std::io::{BufReader, Write};
use std::path::Path;

use lingopair::alignment::{AlignmentStrategy, HighlightMarkers, ProperNounFilter};
use lingopair::app_config::{self, Config, TranslationFailurePolicy, TranslationProvider};
use lingopair::app_controller::Controller;

/// CLI Wrapper for TranslationProvider to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliTranslationProvider {
    Ollama,
    Mock,
}

impl From<CliTranslationProvider> for TranslationProvider {
    fn from(cli_provider: CliTranslationProvider) -> Self {
        match cli_provider {
            CliTranslationProvider::Ollama => TranslationProvider::Ollama,
            CliTranslationProvider::Mock => TranslationProvider::Mock,
        }
    }
}

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

#[derive(Debug, Clone, ValueEnum)]
enum CliStrategy {
    First,
    Closest,
}

#[derive(Debug, Clone, ValueEnum)]
enum CliProperNouns {
    Auto,
    Always,
    Never,
}

#[derive(Debug, Clone, ValueEnum)]
enum CliFailurePolicy {
    Abort,
    Skip,
}

#[derive(Debug, Clone, ValueEnum)]
enum CliMarkers {
    Ansi,
    Html,
}

/// Options shared by every command that reads the configuration
#[derive(Args, Debug, Clone)]
struct CommonArgs {
    /// Configuration file path
    #[arg(short, long, default_value = "conf.json", global = true)]
    config_path: String,

    /// Directory holding the caption tracks
    #[arg(short = 'd', long, global = true)]
    transcripts_dir: Option<String>,

    /// Set logging level
    #[arg(long, value_enum, global = true)]
    log_level: Option<CliLogLevel>,
}

#[derive(Args, Debug)]
struct AlignArgs {
    /// Video identifier
    #[arg(value_name = "VIDEO_ID")]
    video_id: String,

    /// Source language code (e.g., 'en', 'es', 'fr')
    #[arg(short, long)]
    source_language: Option<String>,

    /// Target language code (e.g., 'en', 'es', 'fr')
    #[arg(short, long)]
    target_language: Option<String>,

    /// Translation provider to use
    #[arg(short, long, value_enum)]
    provider: Option<CliTranslationProvider>,

    /// Model name to use for translation
    #[arg(short, long)]
    model: Option<String>,

    /// Maximum start/end deviation in seconds
    #[arg(long)]
    threshold: Option<f64>,

    /// Target selection strategy
    #[arg(long, value_enum)]
    strategy: Option<CliStrategy>,

    /// Capitalized-token removal
    #[arg(long, value_enum)]
    proper_nouns: Option<CliProperNouns>,

    /// What to do when a keyword cannot be translated (defaults to skip with --provider mock)
    #[arg(long, value_enum)]
    on_translation_error: Option<CliFailurePolicy>,

    /// Highlight style
    #[arg(long, value_enum)]
    markers: Option<CliMarkers>,

    /// Print the result as JSON
    #[arg(long)]
    json: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Build a verified keyword mapping from two caption tracks of a video
    Align(AlignArgs),

    /// List the caption tracks available for a video
    List {
        /// Video identifier
        #[arg(value_name = "VIDEO_ID")]
        video_id: String,
    },

    /// Fetch several caption tracks concurrently and print them as JSON
    Fetch {
        /// Video identifier
        #[arg(value_name = "VIDEO_ID")]
        video_id: String,

        /// Language codes to fetch
        #[arg(short, long = "language", required = true)]
        languages: Vec<String>,
    },

    /// Generate shell completions for lingopair
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// lingopair - bilingual keyword pairs from aligned captions
///
/// Reads two caption tracks of the same video, aligns them by timestamps and
/// keeps one keyword per line whose translation literally appears in the
/// other language.
#[derive(Parser, Debug)]
#[command(name = "lingopair")]
#[command(version)]
#[command(about = "Bilingual keyword pairs from time-aligned captions")]
#[command(long_about = "lingopair aligns two caption tracks of a video and extracts verified keyword pairs.

EXAMPLES:
    lingopair align dQw4w9WgXcQ                    # Align using default config
    lingopair align -s en -t es dQw4w9WgXcQ        # English to Spanish
    lingopair align --json -p mock dQw4w9WgXcQ     # Offline translator, JSON output
    lingopair list dQw4w9WgXcQ                     # Show available tracks
    lingopair fetch -l en -l fr dQw4w9WgXcQ        # Fetch two tracks concurrently
    lingopair completions bash > lingopair.bash    # Generate bash completions

CONFIGURATION:
    Configuration is stored in conf.json by default. You can specify a different
    config file with --config-path. If the config file doesn't exist, a default one
    will be created automatically.

TRANSCRIPTS:
    Tracks are read from <dir>/<VIDEO_ID>.<lang>.json (or .<lang>.auto.json for
    generated tracks), each an array of {\"text\", \"start\", \"duration\"} objects.")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Commands,

    #[command(flatten)]
    common: CommonArgs,
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

    // @returns: ANSI color for log level
    fn color_for_level(level: Level) -> &'static str {
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
            let now = chrono::Local::now().format("%H:%M:%S.%3f");
            let mut stderr = std::io::stderr();
            let _ = writeln!(
                stderr,
                "{}{} {:<5} {}\x1B[0m",
                Self::color_for_level(record.level()),
                now,
                record.level(),
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
    // Trace is the ceiling; the effective level is set once the config is known
    CustomLogger::init(LevelFilter::Trace)?;
    log::set_max_level(LevelFilter::Info);

    let cli = CommandLineOptions::parse();

    match cli.command {
        Commands::Completions { shell } => {
            let mut cmd = CommandLineOptions::command();
            generate(shell, &mut cmd, "lingopair", &mut std::io::stdout());
            Ok(())
        }
        Commands::Align(args) => {
            let json = args.json;
            match run_align(&cli.common, args).await {
                Ok(()) => Ok(()),
                Err(e) if json => {
                    println!("{}", Controller::render_json_error(&e));
                    std::process::exit(1);
                }
                Err(e) => Err(e),
            }
        }
        Commands::List { video_id } => {
            let controller = Controller::with_config(load_config(&cli.common)?)?;
            let tracks = controller.list(&video_id).await?;
            print!("{}", Controller::render_listing(&video_id, &tracks));
            Ok(())
        }
        Commands::Fetch { video_id, languages } => {
            let controller = Controller::with_config(load_config(&cli.common)?)?;
            let batch = controller.fetch(&video_id, &languages).await?;
            println!(
                "{}",
                serde_json::to_string_pretty(&batch).context("Failed to serialize fetched transcripts")?
            );
            if !batch.has_results() {
                error!("No transcript could be fetched for video {}", video_id);
                std::process::exit(1);
            }
            Ok(())
        }
    }
}

async fn run_align(common: &CommonArgs, args: AlignArgs) -> Result<()> {
    let mut config = load_config(common)?;
    apply_align_overrides(&mut config, &args);

    let controller = Controller::with_config(config)?;
    let report = controller.run_align(&args.video_id).await?;

    if args.json {
        println!("{}", Controller::render_json(&report.result)?);
    } else {
        print!("{}", Controller::render_text(&report.result));
    }
    Ok(())
}

fn apply_align_overrides(config: &mut Config, args: &AlignArgs) {
    if let Some(source_lang) = &args.source_language {
        config.source_language = source_lang.clone();
    }
    if let Some(target_lang) = &args.target_language {
        config.target_language = target_lang.clone();
    }
    if let Some(provider) = &args.provider {
        config.translation.provider = provider.clone().into();
        if args.on_translation_error.is_none() {
            config.alignment.translation_failure_policy = config.translation.provider.default_failure_policy();
        }
    }
    if let Some(model) = &args.model {
        config.translation.model = model.clone();
    }
    if let Some(threshold) = args.threshold {
        config.alignment.time_threshold = threshold;
    }
    if let Some(strategy) = &args.strategy {
        config.alignment.strategy = match strategy {
            CliStrategy::First => AlignmentStrategy::FirstMatch,
            CliStrategy::Closest => AlignmentStrategy::ClosestMatch,
        };
    }
    if let Some(filter) = &args.proper_nouns {
        config.alignment.proper_noun_filter = match filter {
            CliProperNouns::Auto => ProperNounFilter::Auto,
            CliProperNouns::Always => ProperNounFilter::Always,
            CliProperNouns::Never => ProperNounFilter::Never,
        };
    }
    if let Some(policy) = &args.on_translation_error {
        config.alignment.translation_failure_policy = match policy {
            CliFailurePolicy::Abort => TranslationFailurePolicy::Abort,
            CliFailurePolicy::Skip => TranslationFailurePolicy::SkipSegment,
        };
    }
    if let Some(markers) = &args.markers {
        config.alignment.markers = match markers {
            CliMarkers::Ansi => HighlightMarkers::ansi(),
            CliMarkers::Html => HighlightMarkers::html(),
        };
    }
}

/// Load the configuration file (creating it with defaults when missing) and apply global overrides
fn load_config(common: &CommonArgs) -> Result<Config> {
    let config_path = &common.config_path;
    let mut config = if Path::new(config_path).exists() {
        let file = File::open(config_path).context(format!("Failed to open config file: {}", config_path))?;
        let reader = BufReader::new(file);
        serde_json::from_reader(reader).context(format!("Failed to parse config file: {}", config_path))?
    } else {
        warn!("Config file not found at '{}', creating default config.", config_path);
        let config = Config::default();
        let config_json =
            serde_json::to_string_pretty(&config).context("Failed to serialize default config to JSON")?;
        std::fs::write(config_path, config_json)
            .context(format!("Failed to write default config to file: {}", config_path))?;
        config
    };

    if let Some(directory) = &common.transcripts_dir {
        config.transcripts.directory = directory.clone();
    }
    if let Some(log_level) = &common.log_level {
        config.log_level = log_level.clone().into();
    }
    log::set_max_level(config.log_level.to_level_filter());

    Ok(config)
}
