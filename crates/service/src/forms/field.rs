//! Field descriptors and field-level cleaning shared by all forms.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Key holding errors that belong to the form as a whole.
pub const NON_FIELD_ERRORS: &str = "_all";
/// Choice value meaning "nothing selected" in select widgets.
pub const NONE_CHOICE: &str = "None";

pub const MSG_REQUIRED: &str = "This field is required.";
pub const MSG_EMPTY_FILE: &str = "The submitted file is empty.";
pub const MSG_INVALID_EMAIL: &str = "Enter a valid email address.";

pub fn msg_invalid_choice(value: &str) -> String {
    format!("Select a valid choice. {value} is not one of the available choices.")
}

pub fn msg_max_length(max: usize, actual: usize) -> String {
    format!("Ensure this value has at most {max} characters (it has {actual}).")
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Choice {
    pub value: String,
    pub label: String,
}

impl Choice {
    pub fn new(value: impl Into<String>, label: impl Into<String>) -> Self {
        Self { value: value.into(), label: label.into() }
    }

    pub fn none() -> Self { Self::new(NONE_CHOICE, NONE_CHOICE) }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Widget {
    Select,
    CheckboxSelectMultiple,
    TextInput,
    Textarea { rows: u8 },
    Checkbox,
    FileInput,
}

/// An uploaded file as carried in a JSON submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadedFile {
    pub name: String,
    #[serde(default)]
    pub content: String,
}

/// Everything a client needs to render one field.
#[derive(Debug, Clone, Serialize)]
pub struct FieldSpec {
    pub name: String,
    pub label: String,
    pub help_text: String,
    pub required: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub initial: Option<serde_json::Value>,
    pub widget: Widget,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub choices: Vec<Choice>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_length: Option<usize>,
}

impl FieldSpec {
    fn new(name: &str, label: &str, widget: Widget) -> Self {
        Self {
            name: name.to_string(),
            label: label.to_string(),
            help_text: String::new(),
            required: true,
            initial: None,
            widget,
            choices: Vec::new(),
            max_length: None,
        }
    }

    pub fn choice(name: &str, label: &str) -> Self { Self::new(name, label, Widget::Select) }

    pub fn multiple_choice(name: &str, label: &str) -> Self {
        Self::new(name, label, Widget::CheckboxSelectMultiple)
    }

    pub fn char(name: &str, label: &str) -> Self { Self::new(name, label, Widget::TextInput) }

    /// Checkboxes are never required: unchecked means `false`.
    pub fn boolean(name: &str, label: &str) -> Self {
        Self::new(name, label, Widget::Checkbox).optional().initial(false)
    }

    pub fn file(name: &str, label: &str) -> Self { Self::new(name, label, Widget::FileInput) }

    pub fn help(mut self, text: &str) -> Self {
        self.help_text = text.to_string();
        self
    }

    pub fn optional(mut self) -> Self {
        self.required = false;
        self
    }

    pub fn initial(mut self, value: impl Into<serde_json::Value>) -> Self {
        self.initial = Some(value.into());
        self
    }

    pub fn textarea(mut self, rows: u8) -> Self {
        self.widget = Widget::Textarea { rows };
        self
    }

    pub fn max_length(mut self, max: usize) -> Self {
        self.max_length = Some(max);
        self
    }

    pub fn with_choices(mut self, choices: Vec<Choice>) -> Self {
        self.choices = choices;
        self
    }

    pub fn offers(&self, value: &str) -> bool { self.choices.iter().any(|c| c.value == value) }

    /// Validate a single-choice submission. Returns the value if valid
    /// and non-empty.
    pub fn clean_choice(&self, raw: Option<&str>, errors: &mut FormErrors) -> Option<String> {
        let value = raw.unwrap_or_default();
        if value.is_empty() {
            if self.required {
                errors.add(&self.name, MSG_REQUIRED);
            }
            return None;
        }
        if !self.offers(value) {
            errors.add(&self.name, msg_invalid_choice(value));
            return None;
        }
        Some(value.to_string())
    }

    /// Validate a multiple-choice submission; every value must be offered.
    pub fn clean_multiple_choice(&self, raw: &[String], errors: &mut FormErrors) -> Vec<String> {
        if raw.is_empty() {
            if self.required {
                errors.add(&self.name, MSG_REQUIRED);
            }
            return Vec::new();
        }
        if let Some(bad) = raw.iter().find(|v| !self.offers(v)) {
            errors.add(&self.name, msg_invalid_choice(bad));
            return Vec::new();
        }
        raw.to_vec()
    }

    /// Trim a text submission and check requiredness and length.
    pub fn clean_char(&self, raw: Option<&str>, errors: &mut FormErrors) -> String {
        let value = raw.unwrap_or_default().trim();
        if value.is_empty() && self.required {
            errors.add(&self.name, MSG_REQUIRED);
        }
        if let Some(max) = self.max_length {
            let len = value.chars().count();
            if len > max {
                errors.add(&self.name, msg_max_length(max, len));
            }
        }
        value.to_string()
    }

    pub fn clean_file(&self, raw: Option<&UploadedFile>, errors: &mut FormErrors) -> Option<UploadedFile> {
        match raw {
            None => {
                if self.required {
                    errors.add(&self.name, MSG_REQUIRED);
                }
                None
            }
            Some(file) if file.content.is_empty() => {
                errors.add(&self.name, MSG_EMPTY_FILE);
                None
            }
            Some(file) => Some(file.clone()),
        }
    }
}

/// Validation messages keyed by field name; form-level messages live
/// under [`NON_FIELD_ERRORS`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FormErrors(BTreeMap<String, Vec<String>>);

impl FormErrors {
    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.0.entry(field.to_string()).or_default().push(message.into());
    }

    pub fn add_non_field(&mut self, message: impl Into<String>) { self.add(NON_FIELD_ERRORS, message) }

    pub fn is_empty(&self) -> bool { self.0.is_empty() }

    pub fn has(&self, field: &str) -> bool { self.0.contains_key(field) }

    pub fn get(&self, field: &str) -> &[String] {
        self.0.get(field).map(Vec::as_slice).unwrap_or_default()
    }

    pub fn non_field(&self) -> &[String] { self.get(NON_FIELD_ERRORS) }

    /// `Ok(value)` when nothing was recorded.
    pub fn into_result<T>(self, value: T) -> Result<T, FormErrors> {
        if self.is_empty() { Ok(value) } else { Err(self) }
    }
}

/// Serialisable description of a form.
#[derive(Debug, Clone, Serialize)]
pub struct FormSchema {
    pub fields: Vec<FieldSpec>,
}
