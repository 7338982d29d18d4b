//! Article name normalization.
//!
//! Feed entries reference translated files by path, e.g.
//! `/translations/proj/docs/intro/summary.md`. Rows carry a readable name
//! instead: the file's directory and base name, collapsed to one component
//! when both are equal, with underscores turned into spaces.

use crowdin_activity_config::NormalizerConfig;

const MARKDOWN_EXT: &str = ".md";

/// Turns raw file paths into article names.
#[derive(Debug, Clone)]
pub struct Normalizer {
    translations_root: String,
}

impl Default for Normalizer {
    fn default() -> Self {
        Self::new(&NormalizerConfig::default())
    }
}

impl Normalizer {
    pub fn new(config: &NormalizerConfig) -> Self {
        Self {
            translations_root: config.translations_root.clone(),
        }
    }

    /// Normalize one raw article reference.
    ///
    /// Applied in order: `<root>…/X/X[.md]` becomes `X`; otherwise
    /// `<root>…/X/Y[.md]` becomes `X/Y`; any remaining `.md` suffixes are
    /// dropped; underscores become spaces. The same-name rule must run first
    /// because the second pattern also matches its inputs.
    pub fn normalize(&self, raw: &str) -> String {
        let name = match self.split_translation_path(raw) {
            Some((dir, file)) if file == dir || strip_markdown(file) == Some(dir) => {
                dir.to_string()
            }
            Some((dir, file)) => {
                format!("{}/{}", dir, strip_markdown(file).unwrap_or(file))
            }
            None => raw.to_string(),
        };

        name.trim_end_matches(MARKDOWN_EXT).replace('_', " ")
    }

    /// Split `<root><something>/<dir>/<file>` into `(dir, file)`.
    ///
    /// `<something>` must be non-empty; `dir` and `file` are single non-empty
    /// path components.
    fn split_translation_path<'r>(&self, raw: &'r str) -> Option<(&'r str, &'r str)> {
        let rest = raw.strip_prefix(self.translations_root.as_str())?;
        let (head, file) = rest.rsplit_once('/')?;
        let (prefix, dir) = head.rsplit_once('/')?;

        if prefix.is_empty() || dir.is_empty() || file.is_empty() {
            return None;
        }
        Some((dir, file))
    }
}

/// Strip one trailing `.md`, unless nothing would be left.
fn strip_markdown(name: &str) -> Option<&str> {
    name.strip_suffix(MARKDOWN_EXT).filter(|stem| !stem.is_empty())
}
