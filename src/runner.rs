use crate::config::Settings;
use crate::detector::Detector;
use crate::enumerator::FileEnumerator;
use crate::errors::{Error, Result};
use crate::patterns::{ExtensionPattern, TagPattern, UrlPattern};
use crate::replacer::{ReplaceStats, Replacer};
use log::{debug, info, warn};
use std::path::PathBuf;

/// What a run did.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RunSummary {
    /// Files whose extension qualified them for scanning.
    pub scanned: usize,
    /// Files with at least one matching URL.
    pub detected: Vec<PathBuf>,
    /// Present only when a CDN prefix was given.
    pub replaced: Option<ReplaceStats>,
}

/// Runs the enumerate → detect → (replace) pipeline described by `settings`.
///
/// Without a CDN prefix nothing on disk changes. With one, only the detected
/// files are rewritten.
pub fn run(settings: &Settings) -> Result<RunSummary> {
    if !settings.root.is_dir() {
        return Err(Error::InvalidPath {
            path: settings.root.clone(),
        });
    }
    settings.validate()?;

    debug!("Files to analyze  : {:?}", settings.extensions);
    debug!("Extension to find : {:?}", settings.search);
    debug!("Tags to search    : {:?}", settings.tags);

    let pattern = UrlPattern::new(
        &TagPattern::new(&settings.tags)?,
        &ExtensionPattern::new(&settings.search)?,
    )?;

    let files = FileEnumerator::new(&settings.extensions)
        .exclude(settings.exclude.clone())
        .respect_ignore(settings.respect_ignore)
        .collect(&settings.root)?;

    let detected = Detector::new(&pattern).detect(&files)?;
    if detected.is_empty() {
        info!("No matching URLs found");
    }

    let replaced = match &settings.replace {
        Some(prefix) if !detected.is_empty() => {
            if !prefix.ends_with('/') {
                warn!("CDN prefix {prefix} does not end with '/'");
            }
            let stats = Replacer::new(&pattern, prefix.as_str()).replace(&detected)?;
            info!(
                "Rewrote {} URL(s) in {} file(s)",
                stats.replacements, stats.files
            );
            Some(stats)
        }
        Some(_) => Some(ReplaceStats::default()),
        None => None,
    };

    Ok(RunSummary {
        scanned: files.len(),
        detected,
        replaced,
    })
}
