//! Form definitions: what the client renders and how submissions are cleaned.
//!
//! Forms are plain values built from choices loaded at construction time;
//! `clean` returns either the typed result or [`FormErrors`].

pub mod field;
pub mod formset;
pub mod extra_repos;
pub mod extra_tokens;
pub mod image_job;
pub mod lookup;

pub use field::{Choice, FieldSpec, FormErrors, FormSchema, UploadedFile};
pub use formset::{Formset, FormsetErrors, FormsetSchema, RepeatedForm};
pub use extra_repos::{ExtraRepo, ExtraRepoForm, ExtraRepoInput};
pub use extra_tokens::{ExtraTokensForm, TokenValues};
pub use image_job::{ImageJob, ImageJobChoices, ImageJobForm, ImageJobInput};
pub use lookup::{SearchForm, SearchInput, SearchQuery, TagForm, TagInput, TagList};
