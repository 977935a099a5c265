//! quizgen CLI — generate quizzes with an LLM, take them, export the results.

use std::path::PathBuf;
use std::process;

use clap::{Args, Parser, Subcommand, ValueEnum};

use quizgen_core::{Difficulty, QuestionKind};

mod commands;

#[derive(Parser)]
#[command(name = "quizgen", version, about = "LLM-generated quizzes in the terminal")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// What to generate and with which backend.
#[derive(Args, Debug, Clone)]
pub struct GenerateArgs {
    /// Quiz topic (e.g. "World War II")
    #[arg(long)]
    pub topic: String,

    /// Question format: mcq or fill
    #[arg(long, default_value = "mcq")]
    pub kind: QuestionKind,

    /// easy, medium, or hard
    #[arg(long, default_value = "medium")]
    pub difficulty: Difficulty,

    /// Number of questions
    #[arg(long, default_value = "5")]
    pub count: usize,

    /// Model override (default: from config)
    #[arg(long)]
    pub model: Option<String>,

    /// Provider name from config (default: from config)
    #[arg(long)]
    pub provider: Option<String>,

    /// Config file path
    #[arg(long)]
    pub config: Option<PathBuf>,
}

/// Where and how to save evaluated results.
#[derive(Args, Debug, Clone)]
pub struct ExportArgs {
    /// Results directory (default: from config, "results")
    #[arg(long)]
    pub output: Option<PathBuf>,

    /// Output format
    #[arg(long, value_enum, default_value_t = ExportFormat::Csv)]
    pub format: ExportFormat,

    /// Skip saving results
    #[arg(long)]
    pub no_save: bool,
}

/// File formats results can be saved in.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Csv,
    Html,
    /// Both CSV and HTML
    All,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a quiz, answer it, and save the results
    Quiz {
        #[command(flatten)]
        generate: GenerateArgs,

        #[command(flatten)]
        export: ExportArgs,

        /// Also save the finished session as JSON
        #[arg(long)]
        save_session: Option<PathBuf>,
    },

    /// Generate a quiz and save it for later
    Generate {
        #[command(flatten)]
        generate: GenerateArgs,

        /// Session file to write
        #[arg(long)]
        out: PathBuf,
    },

    /// Answer a saved quiz session
    Take {
        /// Session file written by `generate`
        #[arg(long)]
        session: PathBuf,

        #[command(flatten)]
        export: ExportArgs,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Re-serve a saved results file
    Download {
        /// Results file to fetch
        #[arg(long)]
        file: PathBuf,

        /// Copy into this directory instead of writing to stdout
        #[arg(long)]
        dest: Option<PathBuf>,
    },

    /// List available models
    ListModels {
        /// Filter to specific provider
        #[arg(long)]
        provider: Option<String>,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Create a starter config
    Init,
}

#[tokio::main]
async fn main() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("quizgen=info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Quiz {
            generate,
            export,
            save_session,
        } => commands::quiz::execute(generate, export, save_session).await,
        Commands::Generate { generate, out } => commands::generate::execute(generate, out).await,
        Commands::Take {
            session,
            export,
            config,
        } => commands::take::execute(session, export, config),
        Commands::Download { file, dest } => commands::download::execute(file, dest),
        Commands::ListModels { provider, config } => {
            commands::list_models::execute(provider, config)
        }
        Commands::Init => commands::init::execute(),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
