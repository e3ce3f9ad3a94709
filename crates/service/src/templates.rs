//! Kickstart templates offered by the job form.

use std::path::Path;

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::warn;

use crate::features::{matching_files, FeatureError};
use crate::forms::field::Choice;

static DISPLAY_NAME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^#.*?DisplayName:.+$").expect("display name regex"));

/// Template choices for `dir`: the `None` sentinel plus one entry per
/// `*.ks` file, sorted by display name.
pub fn list_templates(dir: impl AsRef<Path>) -> Result<Vec<Choice>, FeatureError> {
    let mut choices = vec![Choice::none()];
    for path in matching_files(dir.as_ref(), "ks")? {
        let Some(file_name) = path.file_name().map(|n| n.to_string_lossy().into_owned()) else {
            continue;
        };
        let label = template_label(&path, &file_name);
        choices.push(Choice::new(file_name, label));
    }
    choices.sort_by(|a, b| a.label.cmp(&b.label));
    Ok(choices)
}

/// Display name of one template, else its file name. Invalid UTF-8 is
/// replaced rather than rejected so a stray byte does not hide the name.
fn template_label(path: &Path, file_name: &str) -> String {
    match std::fs::read(path) {
        Ok(bytes) => display_name(&String::from_utf8_lossy(&bytes)).unwrap_or_else(|| file_name.to_string()),
        Err(e) => {
            warn!(path = %path.display(), error = %e, "cannot read template; using file name");
            file_name.to_string()
        }
    }
}

/// Display name from the first `# ... DisplayName: <name>` comment.
///
/// Only the text up to the next `:` is taken.
pub fn display_name(text: &str) -> Option<String> {
    let line = text.lines().find(|l| DISPLAY_NAME.is_match(l))?;
    line.split(':').nth(1).map(|s| s.trim().to_string())
}
