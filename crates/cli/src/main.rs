use anyhow::{Context as AnyhowContext, Result};
use clap::{Parser, Subcommand};
use qualcode_analysis::QualcodeConfig;
use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

mod command;

use command::CommandOutput;

#[derive(Parser)]
#[command(name = "qualcode")]
#[command(about = "Validate and structure qualitative-analysis output", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Quiet mode: log only errors (stdout is reserved for JSON)
    #[arg(short, long, global = true)]
    quiet: bool,

    /// TOML config with thresholds and methodologies
    #[arg(long, global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Maximum depth of a code hierarchy
    Depth {
        /// JSON file, or '-' for stdin
        input: PathBuf,
    },

    /// Score a codebook ({"codes": [...], "hierarchy": {...}})
    Codebook {
        /// JSON file or generative-service output, or '-' for stdin
        input: PathBuf,

        /// Code count before refinement (defaults to the refined count)
        #[arg(long)]
        initial: Option<usize>,
    },

    /// Score a theme set and check saturation
    Themes {
        /// JSON file or generative-service output, or '-' for stdin
        input: PathBuf,

        /// Number of coded data points the themes should cover
        #[arg(long)]
        expected: u32,
    },

    /// Build a grounded theory from themes
    Theory {
        /// Themes JSON file or generative-service output, or '-' for stdin
        input: PathBuf,

        /// Drafted theory text (title, novelty, contribution, ...)
        #[arg(long)]
        draft: Option<PathBuf>,

        /// Code id -> label map used as classification context
        #[arg(long)]
        labels: Option<PathBuf>,
    },

    /// Score a grounded theory
    #[command(name = "validate-theory")]
    ValidateTheory {
        /// Theory JSON file, or '-' for stdin
        input: PathBuf,
    },

    /// Infer relationships between themes
    Relationships {
        /// Themes JSON file or generative-service output, or '-' for stdin
        input: PathBuf,
    },

    /// Extract the JSON payload from generative-service output
    Extract {
        /// Text file, or '-' for stdin
        input: PathBuf,
    },

    /// Print methodology guidance for a stage
    Guidance {
        /// Methodology identifier (e.g. straussian, glaserian, constructivist)
        #[arg(long)]
        methodology: String,

        /// Stage name (e.g. open_coding, axial_coding)
        #[arg(long)]
        stage: String,

        /// Prompt to append the guidance to
        #[arg(long)]
        prompt: Option<String>,
    },
}

fn main() {
    let cli = Cli::parse();

    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"));
    if cli.quiet {
        builder.filter_level(log::LevelFilter::Error);
    } else if cli.verbose {
        builder.filter_level(log::LevelFilter::Debug);
    }
    builder.target(env_logger::Target::Stderr).init();

    match run(cli) {
        Ok(output) => {
            for warning in &output.warnings {
                eprintln!("warning: {warning}");
            }
        }
        Err(err) => {
            eprintln!("error: {err:#}");
            std::process::exit(1);
        }
    }
}

fn run(cli: Cli) -> Result<CommandOutput> {
    let config = match &cli.config {
        Some(path) => QualcodeConfig::from_file(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => QualcodeConfig::default(),
    };
    let analysis = &config.analysis;

    let output = match cli.command {
        Commands::Depth { input } => command::depth(&read_input(&input)?)?,
        Commands::Codebook { input, initial } => {
            command::codebook(&read_input(&input)?, initial, analysis)?
        }
        Commands::Themes { input, expected } => {
            command::themes(&read_input(&input)?, expected, analysis)?
        }
        Commands::Theory {
            input,
            draft,
            labels,
        } => {
            let draft = draft.as_deref().map(read_input).transpose()?;
            let labels = labels.as_deref().map(read_input).transpose()?;
            command::theory(
                &read_input(&input)?,
                draft.as_deref(),
                labels.as_deref(),
                analysis,
            )?
        }
        Commands::ValidateTheory { input } => {
            command::validate_theory(&read_input(&input)?, analysis)?
        }
        Commands::Relationships { input } => command::relationships(&read_input(&input)?)?,
        Commands::Extract { input } => command::extract(&read_input(&input)?)?,
        Commands::Guidance {
            methodology,
            stage,
            prompt,
        } => command::guidance(&config.catalog(), &methodology, &stage, prompt.as_deref())?,
    };

    println!("{}", serde_json::to_string_pretty(&output.value)?);
    Ok(output)
}

fn read_input(path: &Path) -> Result<String> {
    let text = if path == Path::new("-") {
        let mut buffer = String::new();
        io::stdin()
            .read_to_string(&mut buffer)
            .context("Failed to read input from stdin")?;
        buffer
    } else {
        fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?
    };
    if text.trim().is_empty() {
        anyhow::bail!("Input is empty. Provide a file or pipe JSON via stdin.");
    }
    Ok(text)
}
