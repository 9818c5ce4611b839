use crate::app::diagnostics::Diagnostics;
use crate::app::error::{ContextError, Result};
use ignore::gitignore::{Gitignore, GitignoreBuilder};
use pathdiff::diff_paths;
use std::fs;
use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};

/// Single "is this path excluded" predicate built from the configured
/// excludes, the output file and the root `.gitignore`.
#[derive(Clone)]
pub struct IgnoreMatcher {
    gitignore: Gitignore,
    self_path: Option<String>,
}

impl IgnoreMatcher {
    /// Rules are added in order: excludes, output path, `.gitignore` lines.
    /// Later rules win, so a `.gitignore` negation can re-include an excluded path.
    pub fn build(
        root: &Path,
        exclude: &[String],
        self_path: Option<&Path>,
        gitignore_content: Option<&str>,
        diagnostics: &dyn Diagnostics,
    ) -> Result<Self> {
        let mut builder = GitignoreBuilder::new(root);

        for pattern in exclude {
            builder
                .add_line(None, pattern)
                .map_err(|source| ContextError::Ignore {
                    pattern: pattern.clone(),
                    source,
                })?;
        }

        let self_path = self_path.and_then(|p| relative_to_root(root, p));
        if let Some(rel) = &self_path {
            let anchored = format!("/{}", escape_glob(rel));
            builder
                .add_line(None, &anchored)
                .map_err(|source| ContextError::Ignore {
                    pattern: anchored.clone(),
                    source,
                })?;
        }

        if let Some(content) = gitignore_content {
            let origin = root.join(".gitignore");
            for line in content.lines() {
                if let Err(e) = builder.add_line(Some(origin.clone()), line) {
                    diagnostics.warn(&format!("Skipping invalid .gitignore rule {:?}: {}", line, e));
                }
            }
        }

        let gitignore = builder.build().map_err(|source| ContextError::Ignore {
            pattern: "<combined ruleset>".to_string(),
            source,
        })?;
        diagnostics.debug(&format!(
            "Ignore matcher built with {} rules",
            gitignore.num_ignores() + gitignore.num_whitelists()
        ));

        Ok(Self {
            gitignore,
            self_path,
        })
    }

    /// Returns true when `relative_path` (or one of its parent directories) is excluded.
    pub fn is_ignored(&self, relative_path: &str, is_dir: bool) -> bool {
        let normalized = normalize(relative_path);
        if normalized.is_empty() {
            return false;
        }
        if self.self_path.as_deref() == Some(normalized.as_str()) {
            return true;
        }
        self.gitignore
            .matched_path_or_any_parents(Path::new(&normalized), is_dir)
            .is_ignore()
    }
}

/// Reads `<root>/.gitignore`. A missing or unreadable file yields `None`;
/// invalid UTF-8 is decoded lossily.
pub fn load_gitignore(root: &Path, diagnostics: &dyn Diagnostics) -> Option<String> {
    let path = root.join(".gitignore");
    match fs::read(&path) {
        Ok(bytes) => match String::from_utf8(bytes) {
            Ok(content) => Some(content),
            Err(e) => {
                diagnostics.warn(&format!(
                    "{} is not valid UTF-8, decoding lossily",
                    path.display()
                ));
                Some(String::from_utf8_lossy(e.as_bytes()).into_owned())
            }
        },
        Err(e) if e.kind() == ErrorKind::NotFound => None,
        Err(e) => {
            diagnostics.warn(&format!("Cannot read {}: {}", path.display(), e));
            None
        }
    }
}

fn relative_to_root(root: &Path, path: &Path) -> Option<String> {
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        root.join(path)
    };
    let rel = diff_paths(lexical_clean(&absolute), lexical_clean(root))?;
    let rel = normalize(&rel.to_string_lossy());
    if rel.is_empty() || rel == ".." || rel.starts_with("../") {
        return None;
    }
    Some(rel)
}

/// Resolves `.` and `..` components without touching the filesystem.
fn lexical_clean(path: &Path) -> PathBuf {
    let mut cleaned = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if !cleaned.pop() {
                    cleaned.push("..");
                }
            }
            other => cleaned.push(other.as_os_str()),
        }
    }
    cleaned
}

fn normalize(path: &str) -> String {
    let unified = path.replace('\\', "/");
    let mut trimmed = unified.as_str();
    while let Some(rest) = trimmed.strip_prefix("./") {
        trimmed = rest;
    }
    trimmed.trim_end_matches('/').to_string()
}

fn escape_glob(literal: &str) -> String {
    let mut escaped = String::with_capacity(literal.len());
    for c in literal.chars() {
        if matches!(c, '\\' | '*' | '?' | '[' | ']' | '{' | '}' | '!' | '#') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}
