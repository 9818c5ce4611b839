use crate::app::diagnostics::Diagnostics;
use crate::app::error::{ContextError, Result};
use crate::app::matcher::IgnoreMatcher;
use crate::app::models::{is_collapsed_dir, RuntimeConfig};
use globset::{GlobBuilder, GlobMatcher};
use ignore::WalkBuilder;
use indexmap::IndexSet;
use pathdiff::diff_paths;
use std::fs;
use std::path::{Path, PathBuf};

/// Selects the files whose contents go into the document.
pub struct Scanner<'a> {
    root: PathBuf,
    include: Vec<(String, GlobMatcher)>,
    max_file_size: u64,
    matcher: &'a IgnoreMatcher,
    diagnostics: &'a dyn Diagnostics,
}

impl<'a> Scanner<'a> {
    pub fn new(
        root: &Path,
        config: &RuntimeConfig,
        matcher: &'a IgnoreMatcher,
        diagnostics: &'a dyn Diagnostics,
    ) -> Result<Self> {
        let include = config
            .effective_include()
            .iter()
            .map(|p| compile_include(p).map(|m| (p.clone(), m)))
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            root: root.to_path_buf(),
            include,
            max_file_size: config.max_file_size,
            matcher,
            diagnostics,
        })
    }

    /// Returns the included files as `/`-separated paths relative to the root.
    ///
    /// Order follows the include patterns, then walk order within a pattern.
    /// A path matched by several patterns appears once.
    pub fn select(&self) -> Vec<String> {
        let candidates = self.candidate_files();
        self.diagnostics
            .debug(&format!("Found {} candidate files", candidates.len()));

        let mut matched = IndexSet::new();
        for (pattern, glob) in &self.include {
            let before = matched.len();
            for rel in candidates.iter().filter(|rel| glob.is_match(rel.as_str())) {
                matched.insert(rel.as_str());
            }
            self.diagnostics.debug(&format!(
                "Include pattern {:?} added {} files",
                pattern,
                matched.len() - before
            ));
        }

        matched
            .into_iter()
            .filter(|rel| self.should_include(rel))
            .map(str::to_string)
            .collect()
    }

    /// Files and symlinks under the root, pruning collapsed and ignored directories.
    fn candidate_files(&self) -> Vec<String> {
        let matcher = self.matcher.clone();
        let root = self.root.clone();
        let walker = WalkBuilder::new(&self.root)
            .standard_filters(false)
            .hidden(false)
            .follow_links(false)
            .sort_by_file_name(|a, b| a.cmp(b))
            .filter_entry(move |entry| {
                let is_dir = entry.file_type().map_or(false, |ft| ft.is_dir());
                if entry.depth() == 0 || !is_dir {
                    return true;
                }
                if is_collapsed_dir(&entry.file_name().to_string_lossy()) {
                    return false;
                }
                diff_paths(entry.path(), &root)
                    .map_or(true, |rel| !matcher.is_ignored(&rel.to_string_lossy(), true))
            })
            .build();

        let mut files = Vec::new();
        for result in walker {
            match result {
                Ok(entry) => {
                    let is_candidate = entry
                        .file_type()
                        .map_or(false, |ft| ft.is_file() || ft.is_symlink());
                    if !is_candidate {
                        continue;
                    }
                    if let Some(rel) = diff_paths(entry.path(), &self.root) {
                        files.push(rel.to_string_lossy().replace('\\', "/"));
                    }
                }
                Err(err) => self.diagnostics.warn(&format!("Error walking entry: {}", err)),
            }
        }
        files
    }

    fn should_include(&self, rel: &str) -> bool {
        if self.matcher.is_ignored(rel, false) {
            self.diagnostics.debug(&format!("Ignored: {}", rel));
            return false;
        }

        match fs::metadata(self.root.join(rel)) {
            Ok(meta) if meta.len() > self.max_file_size => {
                self.diagnostics.debug(&format!(
                    "Skipping {} ({} bytes exceeds limit of {})",
                    rel,
                    meta.len(),
                    self.max_file_size
                ));
                false
            }
            Ok(meta) if !meta.is_file() => {
                self.diagnostics.debug(&format!("Skipping {}: not a regular file", rel));
                false
            }
            Ok(_) => true,
            Err(e) => {
                self.diagnostics
                    .warn(&format!("Skipping {}: cannot read metadata: {}", rel, e));
                false
            }
        }
    }
}

fn compile_include(pattern: &str) -> Result<GlobMatcher> {
    let mut processed = pattern.trim().to_string();
    while let Some(rest) = processed.strip_prefix("./") {
        processed = rest.to_string();
    }
    if processed.ends_with('/') && processed.len() > 1 {
        processed.push_str("**");
    }

    let glob = GlobBuilder::new(&processed)
        .literal_separator(true)
        .build()
        .map_err(|source| ContextError::Glob {
            pattern: pattern.to_string(),
            source,
        })?;
    Ok(glob.compile_matcher())
}
