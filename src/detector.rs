use crate::errors::{Error, Result};
use crate::patterns::UrlPattern;
use log::{debug, info};
use std::fs;
use std::path::{Path, PathBuf};

/// Finds the files that reference at least one matching asset URL.
///
/// Detection is read-only and works line by line, so a URL broken across
/// lines is never seen.
pub struct Detector<'p> {
    pattern: &'p UrlPattern,
}

/// The first matching line of a file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hit {
    /// 1-based line number.
    pub line_number: usize,
    pub line_content: String,
}

impl<'p> Detector<'p> {
    pub fn new(pattern: &'p UrlPattern) -> Self {
        Self { pattern }
    }

    /// Scans a single file and returns its first matching line.
    ///
    /// Scanning stops at the first hit. Files that are not valid UTF-8 are
    /// reported as errors, so nothing gets rewritten from a lossy decode.
    pub fn first_hit(&self, path: &Path) -> Result<Option<Hit>> {
        let content = fs::read_to_string(path).map_err(|e| Error::file_io(path, e))?;

        let hit = content
            .lines()
            .enumerate()
            .find(|(_, line)| self.pattern.is_match(line))
            .map(|(idx, line)| Hit {
                line_number: idx + 1,
                line_content: line.to_string(),
            });
        Ok(hit)
    }

    /// Returns the files of `files` that contain at least one match.
    ///
    /// Order follows `files`; every file appears at most once. The first
    /// unreadable file ends the scan with an error.
    pub fn detect(&self, files: &[PathBuf]) -> Result<Vec<PathBuf>> {
        info!("Searching URLs in {} file(s)", files.len());
        debug!("Pattern : {}", self.pattern.as_str());

        let mut detected = Vec::new();
        for path in files {
            if let Some(hit) = self.first_hit(path)? {
                debug!(
                    "Match Found in line {} in file {}",
                    hit.line_number,
                    path.display()
                );
                detected.push(path.clone());
            }
        }

        info!("Detect URLs in {} file(s)", detected.len());
        for path in &detected {
            info!("  {}", path.display());
        }
        Ok(detected)
    }
}
