use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "translator")]
#[command(about = "Translate JSON locale file values using OpenAI-compatible APIs")]
#[command(version)]
#[command(subcommand_negates_reqs = true)]
pub struct Args {
    /// Input JSON file path
    #[arg(short = 'i', long, default_value = "locales/en.json")]
    pub input: PathBuf,

    /// Target language code for translation (e.g., zh, es, fr)
    #[arg(short = 'l', long, required = true)]
    pub language: Option<String>,

    /// Number of texts to translate in each batch
    #[arg(short = 'b', long = "batch-size", visible_alias = "batchSize")]
    pub batch_size: Option<usize>,

    /// Path to .env file [default: .env]
    #[arg(short = 'e', long = "env")]
    pub env_file: Option<PathBuf>,

    /// Output directory for translated files (default: same as input file)
    #[arg(short = 'o', long)]
    pub output: Option<PathBuf>,

    /// Custom output filename (without extension, default: language code)
    #[arg(short = 'f', long)]
    pub filename: Option<String>,

    /// Model to use for translation (e.g., gpt-4o, gpt-4o-mini)
    #[arg(short = 'm', long)]
    pub model: Option<String>,

    /// API base URL (default: https://api.openai.com/v1)
    #[arg(long)]
    pub endpoint: Option<String>,

    /// Request timeout in seconds
    #[arg(long)]
    pub timeout: Option<u64>,

    /// Suppress progress output
    #[arg(short = 'q', long)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,

    /// Print request and response details to stderr
    #[arg(short = 'v', long, conflicts_with = "quiet")]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List supported language codes
    Languages,
}
