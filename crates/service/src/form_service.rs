use std::collections::BTreeMap;
use std::sync::Arc;

use configs::ImagingConfig;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, instrument};

use crate::choices::ChoiceSource;
use crate::errors::ServiceError;
use crate::features::{self, ExpandedFeature};
use crate::forms::{
    Choice, ExtraRepo, ExtraRepoForm, ExtraRepoInput, ExtraTokensForm, FormErrors, Formset, FormsetErrors,
    FormsetSchema, ImageJob, ImageJobChoices, ImageJobForm, ImageJobInput, SearchForm, SearchInput,
    SearchQuery, TagForm, TagInput, TagList, TokenValues,
};
use crate::templates;

/// A full job submission: the job form plus both formsets.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct JobSubmission {
    pub job: ImageJobInput,
    pub extra_repos: Vec<ExtraRepoInput>,
    pub extra_tokens: Vec<TokenValues>,
}

/// A cleaned job submission, ready to hand to a build backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct JobRequest {
    pub job: ImageJob,
    pub extra_repos: Vec<ExtraRepo>,
    /// Token values merged across token forms; later forms win.
    pub tokens: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct JobFormErrors {
    #[serde(skip_serializing_if = "FormErrors::is_empty")]
    pub job: FormErrors,
    #[serde(skip_serializing_if = "FormsetErrors::is_empty")]
    pub extra_repos: FormsetErrors,
    #[serde(skip_serializing_if = "FormsetErrors::is_empty")]
    pub extra_tokens: FormsetErrors,
}

impl JobFormErrors {
    pub fn is_empty(&self) -> bool {
        self.job.is_empty() && self.extra_repos.is_empty() && self.extra_tokens.is_empty()
    }
}

#[derive(Debug, Error)]
pub enum SubmitError {
    #[error("submission did not validate")]
    Invalid(JobFormErrors),
    #[error(transparent)]
    Service(#[from] ServiceError),
}

/// Schemas of everything the job page renders.
#[derive(Debug, Clone, Serialize)]
pub struct JobFormSchema {
    pub job: crate::forms::FormSchema,
    pub extra_repos: FormsetSchema,
    pub extra_tokens: FormsetSchema,
}

/// Builds forms from current choices and validates submissions,
/// independent of the web framework.
pub struct FormService<R: ChoiceSource + ?Sized> {
    source: Arc<R>,
    cfg: ImagingConfig,
}

impl<R: ChoiceSource + ?Sized> FormService<R> {
    pub fn new(source: Arc<R>, cfg: ImagingConfig) -> Self { Self { source, cfg } }

    /// Job form with choices read now from disk and the store.
    ///
    /// # Examples
    /// ```
    /// use service::choices::repository::mock::MockChoiceSource;
    /// use service::form_service::FormService;
    /// use std::sync::Arc;
    /// let source = Arc::new(MockChoiceSource::default().with_archs(&["i586"]).with_image_types(&["raw"]));
    /// let svc = FormService::new(source, configs::ImagingConfig::default());
    /// let form = tokio_test::block_on(svc.image_job_form()).unwrap();
    /// assert_eq!(form.fields()[0].name, "imagetype");
    /// ```
    #[instrument(skip(self), fields(features_dir = %self.cfg.features_dir, templates_dir = %self.cfg.templates_dir))]
    pub async fn image_job_form(&self) -> Result<ImageJobForm, ServiceError> {
        let templates = templates::list_templates(&self.cfg.templates_dir)?;
        let features = features::load_features(&self.cfg.features_dir)?;
        let archs = self.source.archs().await?;
        let image_types = self.source.image_types().await?;
        debug!(templates = templates.len(), archs = archs.len(), image_types = image_types.len(), "job form choices loaded");
        let choices = ImageJobChoices { image_types, archs, templates, features };
        Ok(ImageJobForm::new(choices, self.cfg.notify_enabled, self.cfg.testing_enabled))
    }

    pub async fn extra_repo_form(&self) -> Result<Formset<ExtraRepoForm>, ServiceError> {
        let services = self.source.build_services().await?;
        Ok(Formset::new(ExtraRepoForm::new(&services)))
    }

    pub async fn extra_tokens_form(&self) -> Result<Formset<ExtraTokensForm>, ServiceError> {
        let tokens = self.source.tokens().await?;
        Ok(Formset::new(ExtraTokensForm::new(&tokens)))
    }

    pub async fn job_form_schema(&self) -> Result<JobFormSchema, ServiceError> {
        Ok(JobFormSchema {
            job: self.image_job_form().await?.schema(),
            extra_repos: self.extra_repo_form().await?.schema(),
            extra_tokens: self.extra_tokens_form().await?.schema(),
        })
    }

    /// Validate the job form and both formsets together.
    #[instrument(skip(self, submission), fields(extra_repos = submission.extra_repos.len(), extra_tokens = submission.extra_tokens.len()))]
    pub async fn submit_job(&self, submission: &JobSubmission) -> Result<JobRequest, SubmitError> {
        let job_form = self.image_job_form().await?;
        let repos = self.extra_repo_form().await?;
        let tokens = self.extra_tokens_form().await?;

        let mut errors = JobFormErrors::default();
        let job = job_form.clean(&submission.job).map_err(|e| errors.job = e).ok();
        let extra_repos = repos.clean(&submission.extra_repos).map_err(|e| errors.extra_repos = e).ok();
        let token_sets = tokens.clean(&submission.extra_tokens).map_err(|e| errors.extra_tokens = e).ok();

        match (job, extra_repos, token_sets) {
            (Some(job), Some(extra_repos), Some(token_sets)) if errors.is_empty() => {
                let tokens = token_sets.into_iter().flatten().collect();
                info!(imagetype = %job.imagetype, architecture = %job.architecture, template = ?job.template, "job submission valid");
                Ok(JobRequest { job, extra_repos, tokens })
            }
            _ => {
                info!(
                    job_errors = !errors.job.is_empty(),
                    repo_errors = !errors.extra_repos.is_empty(),
                    token_errors = !errors.extra_tokens.is_empty(),
                    "job submission rejected"
                );
                Err(SubmitError::Invalid(errors))
            }
        }
    }

    pub fn clean_tags(&self, input: &TagInput) -> Result<TagList, FormErrors> {
        TagForm::default().clean(input)
    }

    pub fn clean_search(&self, input: &SearchInput) -> Result<SearchQuery, FormErrors> {
        SearchForm::default().clean(input)
    }

    pub fn list_features(&self) -> Result<Vec<Choice>, ServiceError> {
        Ok(features::load_features(&self.cfg.features_dir)?.list())
    }

    /// Expansion of one feature; names not offered as features are not found.
    pub fn expand_feature(&self, name: &str) -> Result<ExpandedFeature, ServiceError> {
        let set = features::load_features(&self.cfg.features_dir)?;
        if name == features::REPOSITORIES_SECTION || !set.has_section(name) {
            return Err(ServiceError::not_found(&format!("feature {name}")));
        }
        Ok(set.expand(name)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::choices::repository::mock::MockChoiceSource;
    use crate::forms::field::NON_FIELD_ERRORS;
    use crate::forms::extra_repos::MSG_OBS_WITHOUT_REPO;
    use crate::test_support::fixture_dir;

    const FEATURES: &str = "[repositories]\ncore = http://repo/core\n[devel]\npattern = devel\nrepos = core\n";

    fn service(notify: bool) -> (Arc<MockChoiceSource>, FormService<MockChoiceSource>) {
        let features = fixture_dir(&[("base.feature", FEATURES)]);
        let templates = fixture_dir(&[("handset.ks", "# DisplayName: Handset\n")]);
        let cfg = ImagingConfig {
            features_dir: features.display().to_string(),
            templates_dir: templates.display().to_string(),
            notify_enabled: notify,
            testing_enabled: false,
        };
        let source = Arc::new(
            MockChoiceSource::default()
                .with_image_types(&["raw", "livecd"])
                .with_archs(&["i586"])
                .with_build_service("Public OBS", "https://api.opensuse.org")
                .with_token("RELEASE", "1.0", "Release"),
        );
        (source.clone(), FormService::new(source, cfg))
    }

    fn submission() -> JobSubmission {
        JobSubmission {
            job: ImageJobInput {
                imagetype: Some("raw".into()),
                architecture: Some("i586".into()),
                template: Some("handset.ks".into()),
                features: vec!["devel".into()],
                ..Default::default()
            },
            extra_repos: vec![ExtraRepoInput {
                obs: Some("https://api.opensuse.org".into()),
                project: Some("home:user".into()),
                repo: Some("latest_i486".into()),
            }],
            extra_tokens: vec![[("RELEASE".to_string(), "2.0".to_string())].into_iter().collect()],
        }
    }

    #[tokio::test]
    async fn valid_submission_is_cleaned() {
        let (_, svc) = service(false);
        let req = svc.submit_job(&submission()).await.unwrap();
        assert_eq!(req.job.template.as_deref(), Some("handset.ks"));
        assert_eq!(req.extra_repos.len(), 1);
        assert_eq!(req.tokens.get("RELEASE").map(String::as_str), Some("2.0"));
        assert!(req.job.features[0].repos.contains("http://repo/core"));
    }

    #[tokio::test]
    async fn errors_collected_from_all_parts() {
        let (_, svc) = service(false);
        let mut sub = submission();
        sub.job.ksfile = Some(crate::forms::UploadedFile { name: "x.ks".into(), content: "lang".into() });
        sub.extra_repos[0].repo = None;
        let Err(SubmitError::Invalid(errors)) = svc.submit_job(&sub).await else {
            panic!("expected validation failure");
        };
        assert!(!errors.job.get(NON_FIELD_ERRORS).is_empty());
        assert_eq!(errors.extra_repos.forms[&0].non_field(), [MSG_OBS_WITHOUT_REPO.to_string()]);
        assert!(errors.extra_tokens.is_empty());
    }

    #[tokio::test]
    async fn choices_reflect_rows_at_construction_time() {
        let (source, svc) = service(false);
        let mut sub = submission();
        sub.job.architecture = Some("armv7hl".into());
        assert!(matches!(svc.submit_job(&sub).await, Err(SubmitError::Invalid(_))));
        source.push_arch("armv7hl");
        assert!(svc.submit_job(&sub).await.is_ok());
    }

    #[tokio::test]
    async fn schema_contains_notify_fields_when_enabled() {
        let (_, svc) = service(true);
        let schema = svc.job_form_schema().await.unwrap();
        assert!(schema.job.fields.iter().any(|f| f.name == "email"));
        assert_eq!(schema.extra_repos.extra, 1);
        assert_eq!(schema.extra_tokens.fields[0].name, "RELEASE");
    }

    #[test]
    fn tag_and_search_cleaning() {
        let (_, svc) = service(false);
        let tags = svc.clean_tags(&TagInput { tags: Some("nightly, \"rc 1\"".into()) }).unwrap();
        assert_eq!(tags.tags, vec!["nightly", "rc 1"]);
        let err = svc.clean_search(&SearchInput { searchterm: Some("  ".into()) }).unwrap_err();
        assert!(err.has("searchterm"));
    }

    #[test]
    fn feature_lookup() {
        let (_, svc) = service(false);
        assert_eq!(svc.list_features().unwrap(), vec![Choice::new("devel", "devel")]);
        assert!(svc.expand_feature("devel").is_ok());
        assert!(matches!(svc.expand_feature("repositories"), Err(ServiceError::NotFound(_))));
        assert!(matches!(svc.expand_feature("ghost"), Err(ServiceError::NotFound(_))));
    }
}
