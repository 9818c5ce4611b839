use clap::ValueEnum;
use serde::Deserialize;
use std::fmt;
use std::path::PathBuf;

/// Directories that are never traversed and render as a collapsed `...` entry.
pub const COLLAPSED_DIRS: &[&str] = &["node_modules", ".git"];

pub const DEFAULT_INCLUDE: &str = "**/*";
pub const DEFAULT_MAX_FILE_SIZE: u64 = 100 * 1024;

pub fn is_collapsed_dir(name: &str) -> bool {
    COLLAPSED_DIRS.contains(&name)
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Xml,
    Markdown,
}

impl OutputFormat {
    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Xml => "xml",
            OutputFormat::Markdown => "md",
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputFormat::Xml => write!(f, "xml"),
            OutputFormat::Markdown => write!(f, "markdown"),
        }
    }
}

/// Represents the final configuration after merging defaults, presets, the JSON file and CLI args.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuntimeConfig {
    pub include: Vec<String>,
    pub exclude: Vec<String>,
    pub max_file_size: u64,
    pub output_format: OutputFormat,
}

impl RuntimeConfig {
    /// Include patterns with the empty list treated as "everything".
    pub fn effective_include(&self) -> Vec<String> {
        if self.include.is_empty() {
            vec![DEFAULT_INCLUDE.to_string()]
        } else {
            self.include.clone()
        }
    }
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            include: vec![DEFAULT_INCLUDE.to_string()],
            exclude: vec![
                "node_modules/".to_string(),
                ".git/".to_string(),
                "package-lock.json".to_string(),
                "yarn.lock".to_string(),
                "pnpm-lock.yaml".to_string(),
            ],
            max_file_size: DEFAULT_MAX_FILE_SIZE,
            output_format: OutputFormat::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    File,
    Directory,
}

/// A single entry visited while walking the full directory tree.
#[derive(Debug)]
pub struct DirectoryEntry {
    pub name: String,
    pub path: PathBuf,
    pub kind: EntryKind,
    pub ignored: bool,
}
