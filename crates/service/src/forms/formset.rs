//! Repeated forms submitted as a list.

use std::collections::BTreeMap;

use serde::Serialize;

use super::field::{FieldSpec, FormErrors};

/// Upper bound on entries accepted in one formset.
pub const MAX_FORMS: usize = 1000;

/// A form that can appear any number of times in one submission.
pub trait RepeatedForm {
    type Input;
    type Output;

    fn fields(&self) -> Vec<FieldSpec>;

    /// Blank entries are extra forms the user never touched.
    fn is_blank(&self, input: &Self::Input) -> bool;

    fn clean(&self, input: &Self::Input) -> Result<Self::Output, FormErrors>;
}

#[derive(Debug, Clone, Serialize)]
pub struct FormsetSchema {
    pub fields: Vec<FieldSpec>,
    pub extra: usize,
    pub max_num: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FormsetErrors {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub non_form: Vec<String>,
    /// Errors by submitted entry index.
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub forms: BTreeMap<usize, FormErrors>,
}

impl FormsetErrors {
    pub fn is_empty(&self) -> bool { self.non_form.is_empty() && self.forms.is_empty() }
}

pub struct Formset<F> {
    form: F,
    extra: usize,
}

impl<F: RepeatedForm> Formset<F> {
    pub fn new(form: F) -> Self { Self { form, extra: 1 } }

    pub fn schema(&self) -> FormsetSchema {
        FormsetSchema { fields: self.form.fields(), extra: self.extra, max_num: MAX_FORMS }
    }

    /// Clean every non-blank entry, collecting errors by index.
    pub fn clean(&self, entries: &[F::Input]) -> Result<Vec<F::Output>, FormsetErrors> {
        let mut errors = FormsetErrors::default();
        if entries.len() > MAX_FORMS {
            errors.non_form.push(format!("Please submit at most {MAX_FORMS} forms."));
            return Err(errors);
        }
        let mut cleaned = Vec::new();
        for (idx, entry) in entries.iter().enumerate() {
            if self.form.is_blank(entry) {
                continue;
            }
            match self.form.clean(entry) {
                Ok(out) => cleaned.push(out),
                Err(e) => {
                    errors.forms.insert(idx, e);
                }
            }
        }
        if errors.is_empty() { Ok(cleaned) } else { Err(errors) }
    }
}
