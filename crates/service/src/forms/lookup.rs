//! Small single-purpose forms: tagging an image and searching by tag.

use serde::{Deserialize, Serialize};

use super::field::{FieldSpec, FormErrors, FormSchema};
use crate::tags::parse_tags;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct TagInput {
    pub tags: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TagList {
    pub tags: Vec<String>,
}

pub struct TagForm {
    tags: FieldSpec,
}

impl Default for TagForm {
    fn default() -> Self {
        Self { tags: FieldSpec::char("tags", "Tags").help("A comma-separated list of tags.") }
    }
}

impl TagForm {
    pub fn schema(&self) -> FormSchema { FormSchema { fields: vec![self.tags.clone()] } }

    pub fn clean(&self, input: &TagInput) -> Result<TagList, FormErrors> {
        let mut errors = FormErrors::default();
        let raw = self.tags.clean_char(input.tags.as_deref(), &mut errors);
        errors.into_result(TagList { tags: parse_tags(&raw) })
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SearchInput {
    pub searchterm: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchQuery {
    pub searchterm: String,
}

pub struct SearchForm {
    searchterm: FieldSpec,
}

impl Default for SearchForm {
    fn default() -> Self {
        Self {
            searchterm: FieldSpec::char("searchterm", "Search term")
                .help("partial or full tag name to search with"),
        }
    }
}

impl SearchForm {
    pub fn schema(&self) -> FormSchema { FormSchema { fields: vec![self.searchterm.clone()] } }

    pub fn clean(&self, input: &SearchInput) -> Result<SearchQuery, FormErrors> {
        let mut errors = FormErrors::default();
        let searchterm = self.searchterm.clean_char(input.searchterm.as_deref(), &mut errors);
        errors.into_result(SearchQuery { searchterm })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::forms::field::MSG_REQUIRED;

    #[test]
    fn tags_required_then_parsed() {
        let form = TagForm::default();
        let err = form.clean(&TagInput { tags: Some("   ".into()) }).unwrap_err();
        assert_eq!(err.get("tags"), [MSG_REQUIRED.to_string()]);
        let ok = form.clean(&TagInput { tags: Some("b a, c".into()) }).unwrap();
        assert_eq!(ok.tags, ["b a", "c"]);
    }

    #[test]
    fn search_term_trimmed() {
        let q = SearchForm::default().clean(&SearchInput { searchterm: Some(" night ".into()) }).unwrap();
        assert_eq!(q.searchterm, "night");
        assert!(SearchForm::default().clean(&SearchInput::default()).is_err());
    }
}
