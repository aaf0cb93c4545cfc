//! Command line argument parsing for the Sieve CLI using clap.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};

/// Sieve - train and query complement-class Bayesian text classifiers
#[derive(Parser, Debug, Clone)]
#[command(name = "sieve")]
#[command(about = "Train and query complement-class Bayesian text classifiers")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(long_about = None)]
pub struct SieveArgs {
    /// Verbosity level (0=quiet, 1=normal, 2=verbose, 3=debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Quiet mode (overrides verbose)
    #[arg(short, long)]
    pub quiet: bool,

    /// Output format
    #[arg(short = 'f', long = "format", default_value = "human")]
    pub output_format: OutputFormat,

    /// Pretty-print JSON output
    #[arg(long)]
    pub pretty: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Command,
}

impl SieveArgs {
    /// Get the effective verbosity level
    pub fn verbosity(&self) -> u8 {
        if self.quiet {
            0
        } else {
            match self.verbose {
                0 => 1,
                n => n,
            }
        }
    }
}

/// Available CLI commands
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Train a model from labelled JSON Lines and write it to a model file
    Train(TrainArgs),

    /// Classify a text with a model file
    Classify(ClassifyArgs),

    /// Show per-label statistics of a model file
    Inspect(InspectArgs),
}

/// Text processing options shared by training and classification.
///
/// A model must be queried with the same options it was trained with.
#[derive(clap::Args, Debug, Clone)]
pub struct AnalysisArgs {
    /// Tokenizer used to split text
    #[arg(long, default_value = "punctuation")]
    pub tokenizer: TokenizerKind,

    /// Strip markup tags and control characters before tokenizing
    #[arg(long)]
    pub strip_markup: bool,

    /// Classifier configuration file (JSON)
    #[arg(long, value_name = "CONFIG_FILE")]
    pub config: Option<PathBuf>,
}

/// Arguments for training
#[derive(Parser, Debug, Clone)]
pub struct TrainArgs {
    /// Training data: one {"label": ..., "text": ...} object per line
    #[arg(value_name = "DATA_FILE")]
    pub data_file: PathBuf,

    /// Directory the model is written to (created if missing)
    #[arg(short = 'd', long, value_name = "DIR")]
    pub model_dir: PathBuf,

    /// Model name; the file is written as <NAME>.model
    #[arg(short, long)]
    pub name: String,

    /// Continue training from an existing model file
    #[arg(long, value_name = "MODEL_FILE")]
    pub append: Option<PathBuf>,

    #[command(flatten)]
    pub analysis: AnalysisArgs,
}

/// Arguments for classification
#[derive(Parser, Debug, Clone)]
pub struct ClassifyArgs {
    /// Model file (*.model)
    #[arg(value_name = "MODEL_FILE")]
    pub model: PathBuf,

    /// Text to classify
    #[arg(value_name = "TEXT")]
    pub text: String,

    /// Maximum number of labels to report
    #[arg(short, long)]
    pub limit: Option<usize>,

    #[command(flatten)]
    pub analysis: AnalysisArgs,
}

/// Arguments for inspecting a model
#[derive(Parser, Debug, Clone)]
pub struct InspectArgs {
    /// Model file (*.model)
    #[arg(value_name = "MODEL_FILE")]
    pub model: PathBuf,
}

/// Built-in tokenizers selectable from the command line
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TokenizerKind {
    /// Whitespace, punctuation and ellipsis separated words
    Punctuation,
    /// Whitespace separated words
    Whitespace,
    /// Unicode word boundaries
    UnicodeWord,
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
