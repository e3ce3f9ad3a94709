//! Extra OBS repositories packages may be pulled from.

use serde::{Deserialize, Serialize};

use super::field::{Choice, FieldSpec, FormErrors, NONE_CHOICE};
use super::formset::RepeatedForm;
use crate::choices::BuildServiceEntry;

pub const MSG_OBS_WITHOUT_REPO: &str =
    "You chose an extra OBS without adding a corresponding repository.";

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct ExtraRepoInput {
    pub obs: Option<String>,
    pub project: Option<String>,
    pub repo: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExtraRepo {
    /// API URL of the chosen build service.
    pub obs: Option<String>,
    pub project: String,
    pub repo: Option<String>,
}

pub struct ExtraRepoForm {
    obs: FieldSpec,
    project: FieldSpec,
    repo: FieldSpec,
}

impl ExtraRepoForm {
    pub fn new(services: &[BuildServiceEntry]) -> Self {
        let mut choices = vec![Choice::none()];
        choices.extend(services.iter().map(|s| Choice::new(&s.apiurl, &s.name)));
        Self {
            obs: FieldSpec::choice("obs", "OBS")
                .help("Extra OBS instances from which packages may be downloaded from.")
                .with_choices(choices),
            project: FieldSpec::char("project", "Project")
                .optional()
                .max_length(500)
                .help("Project name in which the repository lives. For example: home:user"),
            repo: FieldSpec::char("repo", "Repository")
                .optional()
                .max_length(500)
                .help("Repository name in which the packages live. For example: latest_i486"),
        }
    }
}

impl RepeatedForm for ExtraRepoForm {
    type Input = ExtraRepoInput;
    type Output = ExtraRepo;

    fn fields(&self) -> Vec<FieldSpec> {
        vec![self.obs.clone(), self.project.clone(), self.repo.clone()]
    }

    fn is_blank(&self, input: &ExtraRepoInput) -> bool {
        let empty = |v: &Option<String>| v.as_deref().map_or(true, |s| s.trim().is_empty());
        let obs_unset = input.obs.as_deref().map_or(true, |o| o.is_empty() || o == NONE_CHOICE);
        obs_unset && empty(&input.project) && empty(&input.repo)
    }

    fn clean(&self, input: &ExtraRepoInput) -> Result<ExtraRepo, FormErrors> {
        let mut errors = FormErrors::default();
        let obs = self
            .obs
            .clean_choice(input.obs.as_deref(), &mut errors)
            .filter(|o| o != NONE_CHOICE);
        let project = self.project.clean_char(input.project.as_deref(), &mut errors);
        let repo = Some(self.repo.clean_char(input.repo.as_deref(), &mut errors)).filter(|r| !r.is_empty());

        if !errors.has("obs") && !errors.has("repo") && obs.is_some() && repo.is_none() {
            errors.add_non_field(MSG_OBS_WITHOUT_REPO);
        }
        errors.into_result(ExtraRepo { obs, project, repo })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::forms::formset::Formset;

    fn form() -> ExtraRepoForm {
        ExtraRepoForm::new(&[BuildServiceEntry { name: "Public OBS".into(), apiurl: "https://api.opensuse.org".into() }])
    }

    fn input(obs: &str, project: &str, repo: &str) -> ExtraRepoInput {
        ExtraRepoInput { obs: Some(obs.into()), project: Some(project.into()), repo: Some(repo.into()) }
    }

    #[test]
    fn choices_start_with_none_then_apiurl() {
        let fields = form().fields();
        assert_eq!(fields[0].choices, vec![Choice::none(), Choice::new("https://api.opensuse.org", "Public OBS")]);
    }

    #[test]
    fn none_obs_and_empty_repo_become_absent() {
        let out = form().clean(&input("None", "home:user", "")).unwrap();
        assert_eq!(out, ExtraRepo { obs: None, project: "home:user".into(), repo: None });
    }

    #[test]
    fn obs_without_repo_is_a_form_error() {
        let err = form().clean(&input("https://api.opensuse.org", "home:user", " ")).unwrap_err();
        assert_eq!(err.non_field(), [MSG_OBS_WITHOUT_REPO.to_string()]);
    }

    #[test]
    fn unknown_obs_is_a_field_error() {
        let err = form().clean(&input("https://evil.example.com", "", "x")).unwrap_err();
        assert!(err.has("obs"));
        assert!(err.non_field().is_empty());
    }

    #[test]
    fn formset_skips_blank_entries_and_indexes_errors() {
        let set = Formset::new(form());
        let entries = vec![
            ExtraRepoInput::default(),
            input("https://api.opensuse.org", "home:user", "latest_i486"),
            input("https://api.opensuse.org", "", ""),
        ];
        let errors = set.clean(&entries).unwrap_err();
        assert_eq!(errors.forms.keys().copied().collect::<Vec<_>>(), vec![2]);

        let ok = set.clean(&entries[..2]).unwrap();
        assert_eq!(ok.len(), 1);
        assert_eq!(ok[0].repo.as_deref(), Some("latest_i486"));
    }

    #[test]
    fn formset_caps_entry_count() {
        let set = Formset::new(form());
        let entries = vec![ExtraRepoInput::default(); crate::forms::formset::MAX_FORMS + 1];
        let errors = set.clean(&entries).unwrap_err();
        assert_eq!(errors.non_form.len(), 1);
    }
}
