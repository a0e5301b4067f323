use crate::errors::{Error, Result};
use crate::patterns::UrlPattern;
use log::{debug, info};
use std::ffi::OsString;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Suffix appended to a file name to form its backup.
pub const BACKUP_SUFFIX: &str = ".bak";

/// Rewrites matched asset URLs so they point at a CDN prefix.
///
/// Each file is read whole, copied to `<name>.bak`, rewritten into a
/// temporary sibling and then persisted over the original. Files are handled
/// one at a time; the first failure stops the batch and earlier files stay
/// rewritten.
pub struct Replacer<'p> {
    pattern: &'p UrlPattern,
    prefix: String,
}

/// The result of rewriting a single file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileOutcome {
    /// Where the original content was saved.
    pub backup: PathBuf,
    /// The number of URLs rewritten.
    pub replacements: usize,
}

/// Totals for a replace batch.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ReplaceStats {
    pub files: usize,
    pub replacements: usize,
}

impl<'p> Replacer<'p> {
    /// Creates a replacer that swaps the URL origin for `prefix`.
    ///
    /// `prefix` is used verbatim and should end with `/`.
    pub fn new(pattern: &'p UrlPattern, prefix: impl Into<String>) -> Self {
        Self {
            pattern,
            prefix: prefix.into(),
        }
    }

    /// Rewrites a whole text and returns it with the number of URLs changed.
    ///
    /// Every line loses its trailing whitespace (`\r` included) and ends with
    /// a single `\n`, whether or not it matched.
    pub fn rewrite_content(&self, content: &str) -> (String, usize) {
        let mut output = String::with_capacity(content.len() + 64);
        let mut replacements = 0;

        for line in content.lines() {
            let line = line.trim_end();
            let found = self.pattern.find_all(line).len();
            if found > 0 {
                replacements += found;
                output.push_str(&self.pattern.rewrite(line, &self.prefix));
            } else {
                output.push_str(line);
            }
            output.push('\n');
        }

        (output, replacements)
    }

    /// Backs up and rewrites a single file in place.
    ///
    /// An existing backup is overwritten.
    pub fn replace_file(&self, path: &Path) -> Result<FileOutcome> {
        let content = fs::read_to_string(path).map_err(|e| Error::file_io(path, e))?;
        let (new_content, replacements) = self.rewrite_content(&content);

        let backup = backup_path(path);
        fs::write(&backup, content.as_bytes()).map_err(|e| Error::file_io(&backup, e))?;

        write_atomic(path, new_content.as_bytes())?;

        debug!(
            "Rewrote {} URL(s) in {} (backup {})",
            replacements,
            path.display(),
            backup.display()
        );
        Ok(FileOutcome {
            backup,
            replacements,
        })
    }

    /// Rewrites every file of `files`, stopping at the first error.
    pub fn replace(&self, files: &[PathBuf]) -> Result<ReplaceStats> {
        info!("Replace URLs in {} file(s) with {}", files.len(), self.prefix);
        debug!("Pattern : {}", self.pattern.as_str());

        let mut stats = ReplaceStats::default();
        for path in files {
            let outcome = self.replace_file(path)?;
            stats.files += 1;
            stats.replacements += outcome.replacements;
            info!("Modified {} ({} URLs)", path.display(), outcome.replacements);
        }
        Ok(stats)
    }
}

/// `<path>.bak`, keeping the original extension.
pub fn backup_path(path: &Path) -> PathBuf {
    let mut name = OsString::from(path.as_os_str());
    name.push(BACKUP_SUFFIX);
    PathBuf::from(name)
}

/// Writes `bytes` to a temporary file next to `path` and renames it over `path`.
///
/// The original file's permissions are carried over.
fn write_atomic(path: &Path, bytes: &[u8]) -> Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let io_err = |e| Error::file_io(path, e);

    let mut temp_file = NamedTempFile::new_in(dir).map_err(io_err)?;
    temp_file.write_all(bytes).map_err(io_err)?;

    let perms = fs::metadata(path).map_err(io_err)?.permissions();
    fs::set_permissions(temp_file.path(), perms).map_err(io_err)?;

    temp_file.persist(path).map_err(|e| io_err(e.error))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detector::Detector;
    use tempfile::TempDir;

    fn default_pattern() -> UrlPattern {
        UrlPattern::from_lists(
            &["href", "src", "srcset"],
            &["jpg", "jpeg", "gif", "png", "tiff", "js", "css", "scss", "ico", "svg", "webm", "mp4"],
        )
        .unwrap()
    }

    #[test]
    fn test_backup_suffix_is_appended() {
        assert_eq!(
            backup_path(Path::new("site/index.html")),
            PathBuf::from("site/index.html.bak")
        );
    }

    #[test]
    fn test_only_origin_changes() {
        let pattern = default_pattern();
        let before = pattern
            .find(r#"<img src="https://old.example.com/images/logo.png">"#)
            .unwrap();
        assert_eq!(before.path, "images/logo");

        let replacer = Replacer::new(&pattern, "https://cdn.new.com/");
        let (out, count) =
            replacer.rewrite_content("<img src=\"https://old.example.com/images/logo.png\">\n");

        assert_eq!(count, 1);
        assert_eq!(out, "<img src=\"https://cdn.new.com/images/logo.png\">\n");
    }

    #[test]
    fn test_linked_image_keeps_surrounding_markup() {
        let pattern = default_pattern();
        let replacer = Replacer::new(&pattern, "https://cdn/");

        let (out, count) =
            replacer.rewrite_content("<a href=\"https://site.com\"><img src=\"/logo.png\"></a>\n");

        assert_eq!(count, 1);
        assert_eq!(
            out,
            "<a href=\"https://site.com\"><img src=\"https://cdn//logo.png\"></a>\n"
        );
    }

    #[test]
    fn test_trailing_whitespace_is_stripped_everywhere() {
        let pattern = default_pattern();
        let replacer = Replacer::new(&pattern, "https://cdn/");

        let (out, count) = replacer.rewrite_content("<p>keep</p>  \r\n\t<img src=\"a.png\">\t\nlast");

        assert_eq!(count, 1);
        assert_eq!(out, "<p>keep</p>\n\t<img src=\"https://cdn/a.png\">\nlast\n");
    }

    #[test]
    fn test_replace_file_writes_backup_and_new_content() {
        let temp_dir = TempDir::new().unwrap();
        let page = temp_dir.path().join("index.html");
        let original = "<link href=\"http://old.host/css/site.css\">\n<p>hi</p>\n";
        fs::write(&page, original).unwrap();
        let pattern = default_pattern();

        let outcome = Replacer::new(&pattern, "https://cdn.new.com/")
            .replace_file(&page)
            .unwrap();

        assert_eq!(outcome.replacements, 1);
        assert_eq!(outcome.backup, temp_dir.path().join("index.html.bak"));
        assert_eq!(fs::read_to_string(&outcome.backup).unwrap(), original);
        assert_eq!(
            fs::read_to_string(&page).unwrap(),
            "<link href=\"https://cdn.new.com/css/site.css\">\n<p>hi</p>\n"
        );
    }

    #[test]
    fn test_second_run_is_a_no_op() {
        let temp_dir = TempDir::new().unwrap();
        let page = temp_dir.path().join("index.php");
        fs::write(
            &page,
            "<img src=\"http://a.com/img/x.png\">\n<script src=\"/js/app.js\"></script>\n",
        )
        .unwrap();
        let pattern = default_pattern();
        let replacer = Replacer::new(&pattern, "https://cdn.new.com/");

        replacer.replace_file(&page).unwrap();
        let after_first = fs::read(&page).unwrap();
        replacer.replace_file(&page).unwrap();

        assert_eq!(fs::read(&page).unwrap(), after_first);
        assert_eq!(fs::read(backup_path(&page)).unwrap(), after_first);
    }

    #[test]
    fn test_round_trip_through_detector() {
        let temp_dir = TempDir::new().unwrap();
        let page = temp_dir.path().join("hero.html");
        let line = r#"<video src="https://media.old.org/clips/intro.v2.mp4"></video>"#;
        fs::write(&page, format!("{line}\n")).unwrap();
        let pattern = default_pattern();
        let before = pattern.find(line).unwrap();

        Replacer::new(&pattern, "https://cdn.new.com/")
            .replace(&[page.clone()])
            .unwrap();

        let hit = Detector::new(&pattern).first_hit(&page).unwrap().unwrap();
        let after = pattern.find(&hit.line_content).unwrap();
        assert_eq!(after.origin, Some("https://cdn.new.com/"));
        assert_eq!(after.path, before.path);
        assert_eq!(after.extension, before.extension);
    }

    #[test]
    fn test_existing_backup_is_overwritten() {
        let temp_dir = TempDir::new().unwrap();
        let page = temp_dir.path().join("index.html");
        fs::write(&page, "<img src=\"logo.png\">\n").unwrap();
        fs::write(backup_path(&page), "stale").unwrap();
        let pattern = default_pattern();

        Replacer::new(&pattern, "https://cdn/").replace_file(&page).unwrap();

        assert_eq!(
            fs::read_to_string(backup_path(&page)).unwrap(),
            "<img src=\"logo.png\">\n"
        );
    }

    #[test]
    fn test_batch_stops_at_first_failure() {
        let temp_dir = TempDir::new().unwrap();
        let first = temp_dir.path().join("a.html");
        let missing = temp_dir.path().join("b.html");
        let last = temp_dir.path().join("c.html");
        fs::write(&first, "<img src=\"x.png\">\n").unwrap();
        fs::write(&last, "<img src=\"y.png\">\n").unwrap();
        let pattern = default_pattern();

        let err = Replacer::new(&pattern, "https://cdn/")
            .replace(&[first.clone(), missing.clone(), last.clone()])
            .unwrap_err();

        assert!(matches!(err, Error::FileIo { ref path, .. } if *path == missing));
        assert_eq!(fs::read_to_string(&first).unwrap(), "<img src=\"https://cdn/x.png\">\n");
        assert!(backup_path(&first).exists());
        assert_eq!(fs::read_to_string(&last).unwrap(), "<img src=\"y.png\">\n");
        assert!(!backup_path(&last).exists());
    }

    #[cfg(unix)]
    #[test]
    fn test_permissions_are_preserved() {
        use std::os::unix::fs::PermissionsExt;

        let temp_dir = TempDir::new().unwrap();
        let script = temp_dir.path().join("run.js");
        fs::write(&script, "// src=\"a.js\"\n").unwrap();
        fs::set_permissions(&script, fs::Permissions::from_mode(0o755)).unwrap();
        let pattern = default_pattern();

        Replacer::new(&pattern, "https://cdn/").replace_file(&script).unwrap();

        let mode = fs::metadata(&script).unwrap().permissions().mode() & 0o777;
        assert_eq!(mode, 0o755);
    }
}
