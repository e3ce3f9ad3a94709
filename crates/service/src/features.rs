//! Feature bundles read from `*.feature` files.
//!
//! A feature is an ini section naming a package `pattern` and a comma
//! separated list of `repos`; repository names resolve to URLs through the
//! shared `[repositories]` section. All files in the features directory are
//! merged into one [`FeatureSet`], later files overriding earlier options.

use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

use serde::Serialize;
use thiserror::Error;
use tracing::{debug, warn};

use crate::forms::field::Choice;

/// Section mapping repository names to URLs; never offered as a feature.
pub const REPOSITORIES_SECTION: &str = "repositories";
const DEFAULT_SECTION: &str = "DEFAULT";

#[derive(Debug, Error)]
pub enum FeatureError {
    #[error("{path}:{line}: option outside of any [section]")]
    MissingSectionHeader { path: String, line: usize },
    #[error("{path}:{line}: cannot parse line")]
    Malformed { path: String, line: usize },
    #[error("feature {feature} references unknown repository {repo}")]
    UnknownRepository { feature: String, repo: String },
    #[error("invalid features directory {0}")]
    BadDirectory(String),
}

/// What a selected feature contributes to an image build.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ExpandedFeature {
    #[serde(skip_serializing_if = "BTreeSet::is_empty")]
    pub pattern: BTreeSet<String>,
    #[serde(skip_serializing_if = "BTreeSet::is_empty")]
    pub repos: BTreeSet<String>,
}

impl ExpandedFeature {
    pub fn is_empty(&self) -> bool { self.pattern.is_empty() && self.repos.is_empty() }
}

type Section = BTreeMap<String, String>;

/// Merged contents of every `.feature` file.
#[derive(Debug, Clone, Default)]
pub struct FeatureSet {
    defaults: Section,
    sections: BTreeMap<String, Section>,
}

/// Read and merge all `*.feature` files under `dir`, in path order.
///
/// A missing directory yields an empty set; unreadable files are skipped
/// with a warning.
pub fn load_features(dir: impl AsRef<Path>) -> Result<FeatureSet, FeatureError> {
    let mut set = FeatureSet::default();
    for path in matching_files(dir.as_ref(), "feature")? {
        let text = match std::fs::read_to_string(&path) {
            Ok(t) => t,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "skipping unreadable feature file");
                continue;
            }
        };
        set.merge_str(&path.display().to_string(), &text)?;
    }
    debug!(sections = set.sections.len(), "features loaded");
    Ok(set)
}

/// Files directly under `dir` with the given extension, sorted.
pub(crate) fn matching_files(dir: &Path, extension: &str) -> Result<Vec<PathBuf>, FeatureError> {
    let escaped = glob::Pattern::escape(&dir.to_string_lossy());
    let pattern = format!("{}/*.{}", escaped.trim_end_matches('/'), extension);
    let paths = glob::glob(&pattern).map_err(|e| FeatureError::BadDirectory(e.to_string()))?;
    let mut files: Vec<PathBuf> = paths.filter_map(Result::ok).filter(|p| p.is_file()).collect();
    files.sort();
    Ok(files)
}

impl FeatureSet {
    /// Parse one ini document into the set.
    pub fn merge_str(&mut self, path: &str, text: &str) -> Result<(), FeatureError> {
        let mut section: Option<String> = None;
        let mut last_key: Option<String> = None;

        for (idx, line) in text.lines().enumerate() {
            let lineno = idx + 1;
            if line.trim().is_empty() || line.trim_start().starts_with(['#', ';']) {
                continue;
            }

            // indented line continues the previous value
            if line.starts_with(char::is_whitespace) {
                if let (Some(sec), Some(key)) = (section.as_deref(), last_key.as_deref()) {
                    if let Some(value) = self.section_mut(sec).get_mut(key) {
                        value.push('\n');
                        value.push_str(line.trim());
                    }
                    continue;
                }
            }

            let trimmed = line.trim();
            if let Some(rest) = trimmed.strip_prefix('[') {
                let Some(end) = rest.find(']') else {
                    return Err(FeatureError::Malformed { path: path.into(), line: lineno });
                };
                let name = rest[..end].trim();
                if name.is_empty() {
                    return Err(FeatureError::Malformed { path: path.into(), line: lineno });
                }
                self.section_mut(name);
                section = Some(name.to_string());
                last_key = None;
                continue;
            }

            let Some(sec) = section.as_deref() else {
                return Err(FeatureError::MissingSectionHeader { path: path.into(), line: lineno });
            };
            let Some((key, value)) = split_option(trimmed) else {
                return Err(FeatureError::Malformed { path: path.into(), line: lineno });
            };
            self.section_mut(sec).insert(key.clone(), value);
            last_key = Some(key);
        }
        Ok(())
    }

    fn section_mut(&mut self, name: &str) -> &mut Section {
        if name == DEFAULT_SECTION {
            return &mut self.defaults;
        }
        self.sections.entry(name.to_string()).or_default()
    }

    pub fn has_section(&self, name: &str) -> bool { self.sections.contains_key(name) }

    /// Option value of `section`, falling back to `[DEFAULT]`.
    pub fn get(&self, section: &str, option: &str) -> Option<&str> {
        let sec = self.sections.get(section)?;
        let key = option.to_lowercase();
        sec.get(&key).or_else(|| self.defaults.get(&key)).map(String::as_str)
    }

    /// Selectable features, sorted by name.
    pub fn list(&self) -> Vec<Choice> {
        self.sections
            .keys()
            .filter(|name| name.as_str() != REPOSITORIES_SECTION)
            .map(|name| {
                let label = self.get(name, "description").unwrap_or(name);
                Choice::new(name.clone(), label)
            })
            .collect()
    }

    /// Resolve a feature into its package pattern and repository URLs.
    ///
    /// Unknown feature names expand to nothing.
    pub fn expand(&self, name: &str) -> Result<ExpandedFeature, FeatureError> {
        let mut out = ExpandedFeature::default();
        if !self.has_section(name) {
            return Ok(out);
        }
        if let Some(pattern) = self.get(name, "pattern") {
            out.pattern.insert(pattern.to_string());
        }
        if let Some(repos) = self.get(name, "repos") {
            for repo in repos.split(',').map(str::trim).filter(|r| !r.is_empty()) {
                let url = self
                    .get(REPOSITORIES_SECTION, repo)
                    .ok_or_else(|| FeatureError::UnknownRepository { feature: name.into(), repo: repo.into() })?;
                out.repos.insert(url.to_string());
            }
        }
        Ok(out)
    }
}

fn split_option(line: &str) -> Option<(String, String)> {
    let sep = line.find(['=', ':'])?;
    let key = line[..sep].trim().to_lowercase();
    if key.is_empty() {
        return None;
    }
    let mut value = &line[sep + 1..];
    // inline comments need a space before the ';'
    if let Some(pos) = value.find(" ;").or_else(|| value.find("\t;")) {
        value = &value[..pos];
    }
    let value = value.trim();
    let value = if value == "\"\"" { "" } else { value };
    Some((key, value.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::fixture_dir;

    const BASE: &str = "\
[repositories]
core = http://repo.example.com/core
Extras = http://repo.example.com/extras

# developer tooling
[devel]
description = Development tools
pattern = devel-tools
repos = core, extras

[minimal]
pattern = minimal
";

    fn parsed(text: &str) -> FeatureSet {
        let mut set = FeatureSet::default();
        set.merge_str("test.feature", text).unwrap();
        set
    }

    #[test]
    fn list_skips_repositories_and_falls_back_to_name() {
        let set = parsed(BASE);
        let choices = set.list();
        assert_eq!(choices, vec![Choice::new("devel", "Development tools"), Choice::new("minimal", "minimal")]);
    }

    #[test]
    fn expand_resolves_repository_urls() {
        let set = parsed(BASE);
        let f = set.expand("devel").unwrap();
        assert_eq!(f.pattern.iter().collect::<Vec<_>>(), vec!["devel-tools"]);
        assert!(f.repos.contains("http://repo.example.com/core"));
        assert!(f.repos.contains("http://repo.example.com/extras"));
    }

    #[test]
    fn expand_unknown_feature_is_empty() {
        assert!(parsed(BASE).expand("nope").unwrap().is_empty());
    }

    #[test]
    fn expand_reports_missing_repository() {
        let set = parsed("[x]\nrepos = ghost\n");
        assert!(matches!(set.expand("x"), Err(FeatureError::UnknownRepository { .. })));
    }

    #[test]
    fn option_before_section_is_rejected() {
        let mut set = FeatureSet::default();
        let err = set.merge_str("bad.feature", "pattern = x\n[a]\n").unwrap_err();
        assert!(matches!(err, FeatureError::MissingSectionHeader { line: 1, .. }));
    }

    #[test]
    fn continuation_lines_and_colon_separator() {
        let set = parsed("[a]\ndescription: first\n  second\n");
        assert_eq!(set.get("a", "description"), Some("first\nsecond"));
    }

    #[test]
    fn default_section_applies_everywhere() {
        let set = parsed("[DEFAULT]\ndescription = shared\n[a]\n[b]\ndescription = own\n");
        assert_eq!(set.list(), vec![Choice::new("a", "shared"), Choice::new("b", "own")]);
    }

    #[test]
    fn indented_comments_are_skipped() {
        let set = parsed("[a]\n  ; note: first\npattern = base\n    # a note about base\n");
        assert_eq!(set.get("a", "pattern"), Some("base"));
        assert_eq!(set.get("a", "note"), None);
    }

    #[test]
    fn line_without_separator_is_malformed() {
        let mut set = FeatureSet::default();
        let err = set.merge_str("bad.feature", "[a]\npattern = x\njust words\n").unwrap_err();
        assert!(matches!(err, FeatureError::Malformed { line: 3, .. }));
        let err = set.merge_str("bad.feature", "[unterminated\n").unwrap_err();
        assert!(matches!(err, FeatureError::Malformed { line: 1, .. }));
    }

    #[test]
    fn inline_comment_is_stripped() {
        let set = parsed("[a]\npattern = base ; the base pattern\n");
        assert_eq!(set.get("a", "pattern"), Some("base"));
    }

    #[test]
    fn later_files_override_and_merge_sections() {
        let dir = fixture_dir(&[
            ("10-base.feature", BASE),
            ("20-override.feature", "[minimal]\npattern = tiny\n[graphics]\npattern = x11\n"),
            ("notes.txt", "[ignored]\n"),
        ]);
        let set = load_features(&dir).unwrap();
        assert_eq!(set.get("minimal", "pattern"), Some("tiny"));
        let names: Vec<_> = set.list().into_iter().map(|c| c.value).collect();
        assert_eq!(names, vec!["devel", "graphics", "minimal"]);
    }

    #[test]
    fn missing_directory_yields_empty_set() {
        let set = load_features("target/test-data/definitely-not-here").unwrap();
        assert!(set.list().is_empty());
    }
}
