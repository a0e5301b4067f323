use crate::errors::Result;
use regex::{Captures, Regex};
use std::borrow::Cow;

/// Matches an optional `http://` or `https://` origin up to and including the
/// first `/` after the host. The host cannot contain quotes or whitespace, so
/// the group never leaves the attribute value it starts in.
const ORIGIN_GROUP: &str = r#"(https?://[^/"'\s]*/)?"#;

/// Matches the path and basename of a URL, without its final extension.
const PATH_GROUP: &str = r"([\w/.-]*)";

/// An alternation of attribute names, each followed by `="`.
///
/// Tags keep their case; matching is case-sensitive.
#[derive(Debug, Clone)]
pub struct TagPattern {
    source: String,
}

impl TagPattern {
    /// Builds the alternation from a list of attribute names.
    ///
    /// Every name is escaped, so metacharacters in configuration are matched
    /// literally.
    pub fn new<S: AsRef<str>>(tags: &[S]) -> Result<Self> {
        if tags.is_empty() {
            return Err("at least one tag is required".into());
        }
        let alternation = tags
            .iter()
            .map(|t| format!("{}=\"", regex::escape(t.as_ref())))
            .collect::<Vec<_>>()
            .join("|");
        Ok(Self {
            source: format!("({alternation})"),
        })
    }

    /// The uncompiled regex source for this alternation.
    pub fn as_str(&self) -> &str {
        &self.source
    }
}

/// An alternation of target extensions such as `png|css|js`.
///
/// Callers are expected to hand in already lower-cased extensions; see
/// [`crate::config::normalize_extensions`].
#[derive(Debug, Clone)]
pub struct ExtensionPattern {
    source: String,
}

impl ExtensionPattern {
    pub fn new<S: AsRef<str>>(extensions: &[S]) -> Result<Self> {
        if extensions.is_empty() {
            return Err("at least one target extension is required".into());
        }
        let alternation = extensions
            .iter()
            .map(|e| regex::escape(e.as_ref()))
            .collect::<Vec<_>>()
            .join("|");
        Ok(Self {
            source: format!("({alternation})"),
        })
    }

    pub fn as_str(&self) -> &str {
        &self.source
    }
}

/// The compiled URL pattern shared by the detector and the replacer.
///
/// Capture groups, in order: tag, origin (optional), path, extension.
#[derive(Debug, Clone)]
pub struct UrlPattern {
    regex: Regex,
}

/// One match of a [`UrlPattern`] on a line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UrlMatch<'a> {
    /// The attribute including `="`, e.g. `src="`.
    pub tag: &'a str,
    /// The `scheme://host/` prefix, absent for relative URLs.
    pub origin: Option<&'a str>,
    /// Everything between the origin and the final `.ext`.
    pub path: &'a str,
    /// The matched target extension, without the dot.
    pub extension: &'a str,
}

impl UrlPattern {
    /// Compiles the combined pattern from its tag and extension parts.
    pub fn new(tags: &TagPattern, extensions: &ExtensionPattern) -> Result<Self> {
        let source = format!(
            r"{}{ORIGIN_GROUP}{PATH_GROUP}\.{}",
            tags.as_str(),
            extensions.as_str()
        );
        Ok(Self {
            regex: Regex::new(&source)?,
        })
    }

    /// Convenience constructor from raw tag and extension lists.
    pub fn from_lists<T: AsRef<str>, E: AsRef<str>>(tags: &[T], extensions: &[E]) -> Result<Self> {
        Self::new(&TagPattern::new(tags)?, &ExtensionPattern::new(extensions)?)
    }

    pub fn is_match(&self, line: &str) -> bool {
        self.regex.is_match(line)
    }

    /// Returns the first match on `line`, if any.
    pub fn find<'a>(&self, line: &'a str) -> Option<UrlMatch<'a>> {
        self.regex.captures(line).map(|caps| to_url_match(&caps))
    }

    /// Returns every non-overlapping match on `line`.
    pub fn find_all<'a>(&self, line: &'a str) -> Vec<UrlMatch<'a>> {
        self.regex
            .captures_iter(line)
            .map(|caps| to_url_match(&caps))
            .collect()
    }

    /// Rewrites every match on `line` so its origin becomes `prefix`.
    ///
    /// Tag, path and extension are copied unchanged. Relative URLs gain the
    /// prefix in front of their path. Borrows when nothing matched.
    pub fn rewrite<'a>(&self, line: &'a str, prefix: &str) -> Cow<'a, str> {
        self.regex.replace_all(line, |caps: &Captures<'_>| {
            let m = to_url_match(caps);
            format!("{}{}{}.{}", m.tag, prefix, m.path, m.extension)
        })
    }

    pub fn as_str(&self) -> &str {
        self.regex.as_str()
    }
}

fn to_url_match<'a>(caps: &Captures<'a>) -> UrlMatch<'a> {
    let group = |i: usize| caps.get(i).map(|m| m.as_str()).unwrap_or_default();
    UrlMatch {
        tag: group(1),
        origin: caps.get(2).map(|m| m.as_str()),
        path: group(3),
        extension: group(4),
    }
}
