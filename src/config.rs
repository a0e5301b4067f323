use crate::cli::Args;
use crate::errors::{Error, Result};
use serde::Deserialize;
use std::env;
use std::fs::File;
use std::path::{Path, PathBuf};

/// Extensions of the files that are opened and scanned.
pub const DEFAULT_EXTENSIONS: &[&str] = &["php", "html", "js"];

/// Extensions that mark a matched URL as an asset worth moving.
pub const DEFAULT_SEARCH: &[&str] = &[
    "jpg", "jpeg", "gif", "png", "tiff", "js", "css", "scss", "ico", "svg", "webm", "mp4",
];

/// Attribute names whose values are inspected.
pub const DEFAULT_TAGS: &[&str] = &["href", "src", "srcset"];

/// Name of the per-user configuration directory.
const CONFIG_DIR_NAME: &str = "cdnshift";

/// Settings read from a YAML configuration file.
///
/// Every field is optional; anything left out falls back to the defaults and
/// anything given on the command line wins.
///
/// ```yaml
/// extensions: [php, html]
/// search: [png, svg]
/// tags: [src]
/// replace: https://cdn.example.com/
/// exclude: [node_modules, vendor]
/// ```
#[derive(Deserialize, Debug, Default, Clone)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    /// Extensions of the files to scan.
    #[serde(default)]
    pub extensions: Option<Vec<String>>,
    /// Target URL extensions.
    #[serde(default)]
    pub search: Option<Vec<String>>,
    /// Attribute names.
    #[serde(default)]
    pub tags: Option<Vec<String>>,
    /// CDN prefix; presence switches the run to replace mode.
    #[serde(default)]
    pub replace: Option<String>,
    /// Directory names to skip while walking.
    #[serde(default)]
    pub exclude: Option<Vec<String>>,
}

/// The fully resolved configuration of a run.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Root directory to walk.
    pub root: PathBuf,
    /// Lower-cased extensions of the files to scan.
    pub extensions: Vec<String>,
    /// Lower-cased target URL extensions.
    pub search: Vec<String>,
    /// Attribute names, case preserved.
    pub tags: Vec<String>,
    /// CDN prefix. `None` means detect only.
    pub replace: Option<String>,
    /// Path components that exclude an entry from the walk.
    pub exclude: Vec<String>,
    /// Honour `.gitignore` and hidden-file rules while walking.
    pub respect_ignore: bool,
}

impl Settings {
    /// Builds settings for `root` from the built-in defaults.
    pub fn with_defaults(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            extensions: to_owned(DEFAULT_EXTENSIONS),
            search: to_owned(DEFAULT_SEARCH),
            tags: to_owned(DEFAULT_TAGS),
            replace: None,
            exclude: Vec::new(),
            respect_ignore: false,
        }
    }

    /// Resolves the settings for a CLI invocation.
    ///
    /// Precedence, lowest first: defaults, the `--config` file, explicit flags.
    /// The root is checked before any configuration file is looked up.
    pub fn from_args(args: &Args) -> Result<Self> {
        if !args.path.is_dir() {
            return Err(Error::InvalidPath {
                path: args.path.clone(),
            });
        }
        let file = match &args.config {
            Some(path) => {
                let resolved = ConfigLoader::find_config(path, &args.path)?;
                log::info!("Using config file : {}", resolved.display());
                ConfigLoader::load(&resolved)?
            }
            None => FileConfig::default(),
        };
        Self::merge(args, file)
    }

    fn merge(args: &Args, file: FileConfig) -> Result<Self> {
        let defaults = Self::with_defaults(&args.path);
        let pick = |cli: &[String], from_file: Option<Vec<String>>, fallback: Vec<String>| {
            if !cli.is_empty() {
                cli.to_vec()
            } else {
                from_file.unwrap_or(fallback)
            }
        };

        let settings = Self {
            root: args.path.clone(),
            extensions: normalize_extensions(&pick(
                &args.extensions,
                file.extensions,
                defaults.extensions,
            )),
            search: normalize_extensions(&pick(&args.search, file.search, defaults.search)),
            tags: normalize_tags(&pick(&args.tags, file.tags, defaults.tags)),
            replace: args.replace.clone().or(file.replace),
            exclude: pick(&args.exclude, file.exclude, defaults.exclude),
            respect_ignore: args.respect_ignore,
        };
        settings.validate()?;
        Ok(settings)
    }

    /// Rejects settings the pipeline cannot run with.
    pub fn validate(&self) -> Result<()> {
        if self.extensions.is_empty() {
            return Err("no file extensions to scan".into());
        }
        if self.search.is_empty() {
            return Err("no target extensions to search for".into());
        }
        if self.tags.is_empty() {
            return Err("no tags to search for".into());
        }
        if let Some(prefix) = &self.replace {
            if prefix.trim().is_empty() {
                return Err("the CDN prefix must not be empty".into());
            }
        }
        Ok(())
    }
}

/// Trims, strips a leading dot, lower-cases and de-duplicates extensions.
///
/// Empty tokens, such as those produced by a trailing comma, are dropped.
pub fn normalize_extensions<S: AsRef<str>>(raw: &[S]) -> Vec<String> {
    dedup(
        raw.iter()
            .map(|e| e.as_ref().trim().trim_start_matches('.').to_lowercase()),
    )
}

/// Trims and de-duplicates tag names. Case is kept.
pub fn normalize_tags<S: AsRef<str>>(raw: &[S]) -> Vec<String> {
    dedup(raw.iter().map(|t| t.as_ref().trim().to_string()))
}

fn dedup(items: impl Iterator<Item = String>) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for item in items {
        if !item.is_empty() && !out.contains(&item) {
            out.push(item);
        }
    }
    out
}

fn to_owned(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

/// A utility for locating and loading configuration files.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Finds the configuration file by searching in a prioritized list of locations.
    ///
    /// The search order is:
    /// 1. The path as given (absolute, or relative to the current directory).
    /// 2. A path relative to the root directory being processed.
    /// 3. Inside the user's configuration directory, under `cdnshift/`.
    pub fn find_config(config_path: &Path, root: &Path) -> Result<PathBuf> {
        if config_path.exists() {
            return Ok(config_path.to_path_buf());
        }

        let mut tried_locations = vec![config_path.display().to_string()];

        if config_path.is_relative() {
            let in_root = root.join(config_path);
            if in_root.exists() {
                return Ok(in_root);
            }
            tried_locations.push(in_root.display().to_string());

            if let Some(user_dir) = user_config_dir() {
                let user_config = user_dir.join(config_path);
                if user_config.exists() {
                    return Ok(user_config);
                }
                tried_locations.push(user_config.display().to_string());
            }
        }

        Err(format!(
            "Config file '{}' not found. Searched in:\n  - {}",
            config_path.display(),
            tried_locations.join("\n  - ")
        )
        .into())
    }

    /// Loads a `FileConfig` from a YAML file.
    pub fn load(path: &Path) -> Result<FileConfig> {
        let file = File::open(path)?;
        Ok(serde_yaml::from_reader(file)?)
    }
}

/// `$XDG_CONFIG_HOME/cdnshift`, falling back to the platform config directory.
fn user_config_dir() -> Option<PathBuf> {
    env::var_os("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .or_else(dirs::config_dir)
        .map(|dir| dir.join(CONFIG_DIR_NAME))
}
