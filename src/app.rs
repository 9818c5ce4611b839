// Declare modules
pub mod assembler;
pub mod cli;
pub mod config;
pub mod diagnostics;
pub mod error;
pub mod formatter;
pub mod matcher;
pub mod models;
pub mod scanner;
pub mod tree;

use anyhow::{Context, Result};
use std::env;
use std::fs;
use std::io::{self, BufRead, IsTerminal, Write};

use self::assembler::ContextAssembler;
use self::cli::Cli;
use self::config::{resolve_config, resolve_output_path};
use self::diagnostics::LogDiagnostics;
use self::error::ContextError;
use self::matcher::{load_gitignore, IgnoreMatcher};

/// Initializes components and orchestrates data flow.
pub fn run(args: Cli) -> Result<()> {
    // 1. Identify working directory & project name
    let current_dir = env::current_dir().context("Failed to get current directory")?;
    let project_name = current_dir.file_name().and_then(|n| n.to_str());

    // 2. Resolve configuration
    let config = resolve_config(&args, &current_dir, project_name);
    let output_path = resolve_output_path(&args, &current_dir, config.output_format);

    // 3. Build the ignore matcher
    let diagnostics = LogDiagnostics;
    let gitignore = load_gitignore(&current_dir, &diagnostics);
    let matcher = IgnoreMatcher::build(
        &current_dir,
        &config.exclude,
        Some(&output_path),
        gitignore.as_deref(),
        &diagnostics,
    )?;

    // 4. Select files
    let assembler = ContextAssembler::new(&current_dir, &config, &matcher, &diagnostics);
    let files = assembler.select()?;
    let inclusion_tree = assembler.inclusion_tree(&files);

    if args.tree {
        println!("{}\n\n{}", assembler.full_tree(), inclusion_tree);
        return Ok(());
    }

    if files.is_empty() {
        log::warn!("No files matched the include patterns.");
    }

    println!("Files to include ({}):\n{}", files.len(), inclusion_tree);
    if !args.yes && !confirm("Proceed? [y/N] ")? {
        log::info!("Aborted, nothing written.");
        return Ok(());
    }

    // 5. Generate & write output
    let document = assembler.render(&files);
    fs::write(&output_path, &document).map_err(|source| ContextError::FileWrite {
        path: output_path.clone(),
        source,
    })?;

    log::info!(
        "Wrote {} files as {} ({} bytes) to {}",
        files.len(),
        config.output_format,
        document.len(),
        output_path.display()
    );

    Ok(())
}

/// Asks a yes/no question on stdin. Non-interactive stdin counts as yes.
fn confirm(prompt: &str) -> Result<bool> {
    let stdin = io::stdin();
    if !stdin.is_terminal() {
        return Ok(true);
    }

    print!("{}", prompt);
    io::stdout().flush().context("Failed to flush stdout")?;

    let mut answer = String::new();
    stdin
        .lock()
        .read_line(&mut answer)
        .context("Failed to read confirmation")?;
    Ok(is_yes(&answer))
}

fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}
