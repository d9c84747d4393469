//! Command line argument parsing for the Nomadia CLI using clap.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};

/// Nomadia - intent classification and context retrieval for a Tunisia travel assistant
#[derive(Parser, Debug, Clone)]
#[command(name = "nomadia")]
#[command(about = "Intent classification and context retrieval for a Tunisia travel assistant")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(long_about = None)]
pub struct NomadiaArgs {
    /// Verbosity level (0=quiet, 1=normal, 2=verbose, 3=debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Quiet mode (overrides verbose)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Output format
    #[arg(short = 'f', long = "format", default_value = "human", global = true)]
    pub output_format: OutputFormat,

    /// Pretty-print JSON output
    #[arg(long, global = true)]
    pub pretty: bool,

    /// Configuration file (JSON)
    #[arg(short, long, env = "NOMADIA_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Command,
}

impl NomadiaArgs {
    /// Get the effective verbosity level
    pub fn verbosity(&self) -> u8 {
        if self.quiet {
            0
        } else {
            match self.verbose {
                0 => 1, // Default to normal
                n => n,
            }
        }
    }
}

/// Available CLI commands
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Generate the synthetic corpus, train, evaluate and save the intent model
    Train(TrainArgs),

    /// Predict the intent of a query
    Classify(ClassifyArgs),

    /// Build the grounding context for a query
    Retrieve(RetrieveArgs),

    /// Build the language-model request for a query
    Prompt(PromptArgs),

    /// List the knowledge base entries
    Knowledge(KnowledgeArgs),
}

/// Arguments for training
#[derive(Parser, Debug, Clone)]
pub struct TrainArgs {
    /// Corpus definition file (JSON) replacing the built-in vocabulary and templates
    #[arg(long, value_name = "CORPUS_FILE")]
    pub corpus: Option<PathBuf>,

    /// Where to write the model artifact
    #[arg(short, long, value_name = "MODEL_PATH", env = "NOMADIA_MODEL_PATH")]
    pub output: Option<PathBuf>,

    /// Seed for shuffling and splitting
    #[arg(long)]
    pub seed: Option<u64>,

    /// Fraction of the corpus held out for evaluation
    #[arg(long)]
    pub test_ratio: Option<f64>,

    /// Additive smoothing constant
    #[arg(long)]
    pub alpha: Option<f64>,
}

/// Arguments for classification
#[derive(Parser, Debug, Clone)]
pub struct ClassifyArgs {
    /// Query string
    #[arg(value_name = "QUERY")]
    pub query: String,

    /// Model artifact to load
    #[arg(short, long, value_name = "MODEL_PATH", env = "NOMADIA_MODEL_PATH")]
    pub model: Option<PathBuf>,
}

/// Arguments for retrieval
#[derive(Parser, Debug, Clone)]
pub struct RetrieveArgs {
    /// Query string
    #[arg(value_name = "QUERY")]
    pub query: String,

    /// Model artifact to load; retrieval degrades gracefully when it is missing
    #[arg(short, long, value_name = "MODEL_PATH", env = "NOMADIA_MODEL_PATH")]
    pub model: Option<PathBuf>,

    /// Knowledge base file (JSON) replacing the built-in one
    #[arg(short, long, value_name = "KB_FILE", env = "NOMADIA_KNOWLEDGE_BASE")]
    pub knowledge_base: Option<PathBuf>,
}

/// Arguments for prompt construction
#[derive(Parser, Debug, Clone)]
pub struct PromptArgs {
    /// User message
    #[arg(value_name = "MESSAGE")]
    pub message: String,

    /// Chat history file (JSON array of {role, text})
    #[arg(long, value_name = "HISTORY_FILE")]
    pub history: Option<PathBuf>,

    /// Model artifact to load; retrieval degrades gracefully when it is missing
    #[arg(short, long, value_name = "MODEL_PATH", env = "NOMADIA_MODEL_PATH")]
    pub model: Option<PathBuf>,

    /// Knowledge base file (JSON) replacing the built-in one
    #[arg(short, long, value_name = "KB_FILE", env = "NOMADIA_KNOWLEDGE_BASE")]
    pub knowledge_base: Option<PathBuf>,
}

/// Arguments for listing the knowledge base
#[derive(Parser, Debug, Clone)]
pub struct KnowledgeArgs {
    /// Knowledge base file (JSON) replacing the built-in one
    #[arg(short, long, value_name = "KB_FILE", env = "NOMADIA_KNOWLEDGE_BASE")]
    pub knowledge_base: Option<PathBuf>,
}

/// Output formats for CLI
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable output
    Human,
    /// JSON output
    Json,
}
