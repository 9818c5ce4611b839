use crate::app::models::OutputFormat;
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug, Default)]
#[command(
    author,
    version,
    about = "Bundle a project's file tree and contents into one document for LLMs"
)]
pub struct Cli {
    /// Glob patterns for files to include (e.g., 'src/**/*.rs')
    #[arg(long, num_args = 1..)]
    pub include: Option<Vec<String>>,

    /// Gitignore-style patterns for files or directories to exclude
    #[arg(long, num_args = 1..)]
    pub exclude: Option<Vec<String>>,

    /// Skip files larger than this many bytes
    #[arg(long, value_name = "BYTES")]
    pub max_size: Option<u64>,

    /// Output format for file contents
    #[arg(long, value_enum)]
    pub format: Option<OutputFormat>,

    /// Output file (defaults to context-bundle.xml or context-bundle.md)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// JSON config file (defaults to ./context-bundle.json when present)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Use a predefined set of options from presets.toml
    #[arg(long)]
    pub preset: Option<String>,

    /// Print the directory trees only, without writing the document
    #[arg(long)]
    pub tree: bool,

    /// Do not ask for confirmation before writing
    #[arg(short, long)]
    pub yes: bool,

    /// Increase log verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Only log errors
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,
}
