//! Values for kickstart substitution tokens, one field per token row.

use std::collections::BTreeMap;

use super::field::{FieldSpec, FormErrors};
use super::formset::RepeatedForm;
use crate::choices::TokenEntry;

pub type TokenValues = BTreeMap<String, String>;

pub struct ExtraTokensForm {
    fields: Vec<FieldSpec>,
}

impl ExtraTokensForm {
    pub fn new(tokens: &[TokenEntry]) -> Self {
        let fields = tokens
            .iter()
            .map(|t| {
                FieldSpec::char(&t.name, &t.name)
                    .optional()
                    .initial(t.default_value.clone())
                    .help(&t.description)
            })
            .collect();
        Self { fields }
    }
}

impl RepeatedForm for ExtraTokensForm {
    type Input = TokenValues;
    type Output = TokenValues;

    fn fields(&self) -> Vec<FieldSpec> { self.fields.clone() }

    fn is_blank(&self, input: &TokenValues) -> bool {
        self.fields
            .iter()
            .all(|f| input.get(&f.name).map_or(true, |v| v.trim().is_empty()))
    }

    /// Every known token gets a value; submitted keys naming no token are dropped.
    fn clean(&self, input: &TokenValues) -> Result<TokenValues, FormErrors> {
        let mut errors = FormErrors::default();
        let values = self
            .fields
            .iter()
            .map(|f| (f.name.clone(), f.clean_char(input.get(&f.name).map(String::as_str), &mut errors)))
            .collect();
        errors.into_result(values)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form() -> ExtraTokensForm {
        ExtraTokensForm::new(&[
            TokenEntry { name: "RELEASE".into(), default_value: "1.2".into(), description: "Release to build".into() },
            TokenEntry { name: "FLAVOUR".into(), default_value: "devel".into(), description: "Repo flavour".into() },
        ])
    }

    #[test]
    fn one_optional_field_per_token() {
        let fields = form().fields();
        assert_eq!(fields.len(), 2);
        assert_eq!(fields[0].label, "RELEASE");
        assert_eq!(fields[0].initial, Some(serde_json::json!("1.2")));
        assert_eq!(fields[1].help_text, "Repo flavour");
        assert!(fields.iter().all(|f| !f.required));
    }

    #[test]
    fn clean_keeps_known_tokens_only() {
        let input: TokenValues = [("RELEASE", " 2.0 "), ("BOGUS", "x")]
            .into_iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        let out = form().clean(&input).unwrap();
        assert_eq!(out.get("RELEASE").map(String::as_str), Some("2.0"));
        assert_eq!(out.get("FLAVOUR").map(String::as_str), Some(""));
        assert!(!out.contains_key("BOGUS"));
    }

    #[test]
    fn untouched_entry_is_blank() {
        let input: TokenValues = [("BOGUS".to_string(), "x".to_string())].into_iter().collect();
        assert!(form().is_blank(&input));
    }
}
