use crate::app::diagnostics::Diagnostics;
use crate::app::error::Result;
use crate::app::formatter::OutputGenerator;
use crate::app::matcher::IgnoreMatcher;
use crate::app::models::RuntimeConfig;
use crate::app::scanner::Scanner;
use crate::app::tree;
use std::fs;
use std::path::{Path, PathBuf};

/// Builds the final document from the full tree, the inclusion tree and the
/// selected files' contents.
///
/// `root` doubles as the base for relative paths, so callers pass the
/// process working directory.
pub struct ContextAssembler<'a> {
    root: PathBuf,
    config: &'a RuntimeConfig,
    matcher: &'a IgnoreMatcher,
    diagnostics: &'a dyn Diagnostics,
}

impl<'a> ContextAssembler<'a> {
    pub fn new(
        root: &Path,
        config: &'a RuntimeConfig,
        matcher: &'a IgnoreMatcher,
        diagnostics: &'a dyn Diagnostics,
    ) -> Self {
        Self {
            root: root.to_path_buf(),
            config,
            matcher,
            diagnostics,
        }
    }

    pub fn select(&self) -> Result<Vec<String>> {
        let scanner = Scanner::new(&self.root, self.config, self.matcher, self.diagnostics)?;
        Ok(scanner.select())
    }

    pub fn full_tree(&self) -> String {
        tree::render_full_tree(&self.root, self.matcher, self.diagnostics)
    }

    pub fn inclusion_tree(&self, files: &[String]) -> String {
        tree::render_inclusion_tree(files)
    }

    /// Renders the document for an already computed selection.
    pub fn render(&self, files: &[String]) -> String {
        let blocks: Vec<String> = files.iter().map(|rel| self.render_file(rel)).collect();
        OutputGenerator::format_full_output(&self.full_tree(), &self.inclusion_tree(files), &blocks)
    }

    pub fn assemble(&self) -> Result<String> {
        let files = self.select()?;
        Ok(self.render(&files))
    }

    fn render_file(&self, relative_path: &str) -> String {
        match fs::read_to_string(self.root.join(relative_path)) {
            Ok(content) => OutputGenerator::file_block(self.config.output_format, relative_path, &content),
            Err(e) => {
                self.diagnostics
                    .warn(&format!("Error reading file {}: {}", relative_path, e));
                OutputGenerator::read_error(relative_path, &e.to_string())
            }
        }
    }
}
