//! Statement file discovery.

use std::path::{Path, PathBuf};

use tracing::warn;

/// Directory name that marks a statement drop directly under the root.
pub const STATEMENTS_DIR: &str = "Annual Statements";

/// Find all `*.csv` files under `root`'s `Annual Statements` directory,
/// recursing through arbitrary nesting depth, sorted by path.
///
/// Files are matched by path only — anything that looks like a statement
/// is attempted, even if it later fails to parse. An absent root or an
/// empty match set yields an empty vector, not an error.
pub fn find_statement_files(root: &Path) -> Vec<PathBuf> {
    if !root.exists() {
        warn!("Statement root does not exist: {}", root.display());
        return Vec::new();
    }

    let mut files: Vec<PathBuf> = walkdir::WalkDir::new(root)
        .follow_links(true)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file())
        .filter(|entry| is_statement_csv(root, entry.path()))
        .map(|entry| entry.into_path())
        .collect();

    files.sort();
    files
}

/// `true` when `path` is a `.csv` file whose path relative to `root`
/// starts with the `Annual Statements` directory.
fn is_statement_csv(root: &Path, path: &Path) -> bool {
    let is_csv = path
        .extension()
        .map(|ext| ext == "csv")
        .unwrap_or(false);
    if !is_csv {
        return false;
    }

    match path.strip_prefix(root) {
        Ok(rel) => {
            let mut components = rel.components();
            let first_is_statements = components
                .next()
                .map(|c| c.as_os_str() == STATEMENTS_DIR)
                .unwrap_or(false);
            // There must be at least one more component: the file itself.
            first_is_statements && components.next().is_some()
        }
        Err(_) => false,
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
