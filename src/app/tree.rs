use crate::app::diagnostics::Diagnostics;
use crate::app::matcher::IgnoreMatcher;
use crate::app::models::{is_collapsed_dir, DirectoryEntry, EntryKind};
use indexmap::IndexMap;
use std::fs;
use std::path::Path;

const BRANCH: &str = "├── ";
const LAST_BRANCH: &str = "└── ";
const PIPE: &str = "│   ";
const SPACE: &str = "    ";
const PLACEHOLDER: &str = "...";

/// A node of a rendered tree. Children keep insertion order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    File,
    Directory(IndexMap<String, Node>),
    /// A directory whose contents are replaced by a single `...` line.
    Collapsed,
}

pub type Children = IndexMap<String, Node>;

/// Walks `root` with `read_dir` (filesystem order) and builds the full tree.
///
/// Collapsed directories are never traversed. Other ignored directories are
/// listed but not expanded; ignored files are still listed.
pub fn build_full_tree(root: &Path, matcher: &IgnoreMatcher, diagnostics: &dyn Diagnostics) -> Children {
    walk_dir(root, "", matcher, diagnostics)
}

fn walk_dir(
    dir: &Path,
    rel_prefix: &str,
    matcher: &IgnoreMatcher,
    diagnostics: &dyn Diagnostics,
) -> Children {
    let mut children = Children::new();
    for entry in list_dir(dir, rel_prefix, matcher, diagnostics) {
        let node = match entry.kind {
            EntryKind::File => Node::File,
            EntryKind::Directory if is_collapsed_dir(&entry.name) => Node::Collapsed,
            EntryKind::Directory if entry.ignored => Node::Directory(Children::new()),
            EntryKind::Directory => {
                let rel = format!("{}{}/", rel_prefix, entry.name);
                Node::Directory(walk_dir(&entry.path, &rel, matcher, diagnostics))
            }
        };
        children.insert(entry.name, node);
    }
    children
}

fn list_dir(
    dir: &Path,
    rel_prefix: &str,
    matcher: &IgnoreMatcher,
    diagnostics: &dyn Diagnostics,
) -> Vec<DirectoryEntry> {
    let read_dir = match fs::read_dir(dir) {
        Ok(rd) => rd,
        Err(e) => {
            diagnostics.warn(&format!("Cannot list directory {}: {}", dir.display(), e));
            return Vec::new();
        }
    };

    let mut entries = Vec::new();
    for result in read_dir {
        let entry = match result {
            Ok(entry) => entry,
            Err(e) => {
                diagnostics.warn(&format!("Error reading entry in {}: {}", dir.display(), e));
                continue;
            }
        };
        let name = entry.file_name().to_string_lossy().into_owned();
        // file_type() does not follow symlinks, so linked directories stay leaves.
        let is_dir = entry.file_type().map(|ft| ft.is_dir()).unwrap_or(false);
        let rel = format!("{}{}", rel_prefix, name);
        entries.push(DirectoryEntry {
            ignored: matcher.is_ignored(&rel, is_dir),
            name,
            path: entry.path(),
            kind: if is_dir { EntryKind::Directory } else { EntryKind::File },
        });
    }
    entries
}

/// Builds the inclusion trie from `/`-separated relative file paths.
pub fn build_inclusion_tree<S: AsRef<str>>(paths: &[S]) -> Children {
    let mut root = Children::new();
    for path in paths {
        let segments: Vec<&str> = path
            .as_ref()
            .split('/')
            .filter(|s| !s.is_empty() && *s != ".")
            .collect();
        insert_path(&mut root, &segments);
    }
    root
}

fn insert_path(level: &mut Children, segments: &[&str]) {
    let Some((first, rest)) = segments.split_first() else {
        return;
    };

    if rest.is_empty() {
        level.entry(first.to_string()).or_insert(Node::File);
        return;
    }

    let node = level
        .entry(first.to_string())
        .or_insert_with(|| Node::Directory(Children::new()));
    if !matches!(node, Node::Directory(_)) {
        *node = Node::Directory(Children::new());
    }
    if let Node::Directory(children) = node {
        insert_path(children, rest);
    }
}

/// Renders children with box-drawing connectors, one line per node.
pub fn render(children: &Children) -> String {
    let mut lines = Vec::new();
    render_level(children, "", &mut lines);
    lines.join("\n")
}

fn render_level(children: &Children, prefix: &str, lines: &mut Vec<String>) {
    let count = children.len();
    for (i, (name, node)) in children.iter().enumerate() {
        let is_last = i + 1 == count;
        let connector = if is_last { LAST_BRANCH } else { BRANCH };
        let nested_prefix = format!("{}{}", prefix, if is_last { SPACE } else { PIPE });

        match node {
            Node::File => lines.push(format!("{}{}{}", prefix, connector, name)),
            Node::Directory(grandchildren) => {
                lines.push(format!("{}{}{}/", prefix, connector, name));
                render_level(grandchildren, &nested_prefix, lines);
            }
            Node::Collapsed => {
                lines.push(format!("{}{}{}/", prefix, connector, name));
                lines.push(format!("{}{}{}", nested_prefix, LAST_BRANCH, PLACEHOLDER));
            }
        }
    }
}

pub fn render_full_tree(root: &Path, matcher: &IgnoreMatcher, diagnostics: &dyn Diagnostics) -> String {
    render(&build_full_tree(root, matcher, diagnostics))
}

pub fn render_inclusion_tree<S: AsRef<str>>(paths: &[S]) -> String {
    render(&build_inclusion_tree(paths))
}
