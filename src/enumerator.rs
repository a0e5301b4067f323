use crate::errors::Result;
use ignore::WalkBuilder;
use log::{debug, info};
use std::path::{Path, PathBuf};

/// Walks a directory tree and collects the files worth scanning.
///
/// By default every entry is visited, hidden files and ignored paths included.
/// Set `respect_ignore` to apply the usual `.gitignore`/`.ignore`/hidden
/// filters instead.
#[derive(Debug, Clone)]
pub struct FileEnumerator {
    extensions: Vec<String>,
    exclude: Vec<String>,
    respect_ignore: bool,
}

impl FileEnumerator {
    /// Creates an enumerator for the given extensions.
    ///
    /// Extensions are compared case-insensitively and without a leading dot.
    pub fn new<S: AsRef<str>>(extensions: &[S]) -> Self {
        Self {
            extensions: extensions
                .iter()
                .map(|e| e.as_ref().trim_start_matches('.').to_lowercase())
                .collect(),
            exclude: Vec::new(),
            respect_ignore: false,
        }
    }

    /// Skips every path that has a component equal to one of `names`.
    pub fn exclude(mut self, names: Vec<String>) -> Self {
        self.exclude = names;
        self
    }

    pub fn respect_ignore(mut self, yes: bool) -> Self {
        self.respect_ignore = yes;
        self
    }

    /// Returns the matching files under `root`, sorted and without duplicates.
    ///
    /// Excluded directories are pruned before they are read. Any other
    /// traversal error ends the walk and is returned.
    pub fn collect(&self, root: &Path) -> Result<Vec<PathBuf>> {
        info!("Process directory : {}", root.display());

        let mut walker = WalkBuilder::new(root);
        walker.standard_filters(self.respect_ignore);
        if !self.exclude.is_empty() {
            let base = root.to_path_buf();
            let exclude = self.exclude.clone();
            walker.filter_entry(move |entry| !is_excluded(&base, entry.path(), &exclude));
        }

        let mut files = Vec::new();
        for entry in walker.build() {
            let entry = entry?;
            let path = entry.path();

            if path.is_file() && should_process_file(path, &self.extensions) {
                debug!("File detected : {}", path.display());
                files.push(path.to_path_buf());
            }
        }

        files.sort();
        files.dedup();
        Ok(files)
    }
}

/// Whether a component of `path` below `root` equals one of `exclude`.
fn is_excluded(root: &Path, path: &Path, exclude: &[String]) -> bool {
    let relative = path.strip_prefix(root).unwrap_or(path);
    exclude
        .iter()
        .any(|ex| relative.components().any(|c| c.as_os_str() == ex.as_str()))
}

/// Whether `path` has one of the (lower-cased) `extensions`.
fn should_process_file(path: &Path, extensions: &[String]) -> bool {
    path.extension()
        .and_then(|os| os.to_str())
        .map(|s| extensions.contains(&s.to_lowercase()))
        .unwrap_or(false)
}
