//! The main image job request form.

use serde::{Deserialize, Serialize};
use validator::ValidateEmail;

use super::field::{Choice, FieldSpec, FormErrors, FormSchema, UploadedFile, MSG_INVALID_EMAIL, NONE_CHOICE};
use crate::features::{ExpandedFeature, FeatureSet};
use crate::tags::parse_tags;

pub const MSG_TEMPLATE_AND_KICKSTART: &str = "Please choose template or upload a kickstart, not both!";
pub const MSG_TEMPLATE_OR_KICKSTART: &str = "Please choose either a template or upload a kickstart file.";

/// Choices loaded at form construction time.
#[derive(Debug, Clone, Default)]
pub struct ImageJobChoices {
    pub image_types: Vec<String>,
    pub archs: Vec<String>,
    pub templates: Vec<Choice>,
    pub features: FeatureSet,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct ImageJobInput {
    pub imagetype: Option<String>,
    pub architecture: Option<String>,
    pub ksfile: Option<UploadedFile>,
    pub template: Option<String>,
    pub notify_image: bool,
    pub email: Option<String>,
    pub test_image: bool,
    pub devicegroup: Option<String>,
    pub test_options: Option<String>,
    pub features: Vec<String>,
    pub overlay: Option<String>,
    pub pinned: bool,
    pub tags: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notification {
    pub notify_image: bool,
    pub emails: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QaRequest {
    pub test_image: bool,
    pub devicegroup: String,
    pub test_options: Vec<String>,
}

/// Packages from the overlay field: `-name` excludes, `@name` is a group.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PackageOverlay {
    pub packages: Vec<String>,
    pub excluded: Vec<String>,
    pub groups: Vec<String>,
}

impl PackageOverlay {
    pub fn parse(raw: &str) -> Self {
        let mut out = Self::default();
        for item in raw.split([',', '\n']).map(str::trim).filter(|s| !s.is_empty()) {
            let (bucket, name) = if let Some(name) = item.strip_prefix('-') {
                (&mut out.excluded, name.trim())
            } else if let Some(name) = item.strip_prefix('@') {
                (&mut out.groups, name.trim())
            } else {
                (&mut out.packages, item)
            };
            if !name.is_empty() && !bucket.iter().any(|p| p == name) {
                bucket.push(name.to_string());
            }
        }
        out
    }

    pub fn is_empty(&self) -> bool {
        self.packages.is_empty() && self.excluded.is_empty() && self.groups.is_empty()
    }
}

/// A cleaned job form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImageJob {
    pub imagetype: String,
    pub architecture: String,
    pub template: Option<String>,
    pub ksfile: Option<UploadedFile>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notify: Option<Notification>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub qa: Option<QaRequest>,
    pub features: Vec<ExpandedFeature>,
    pub overlay: PackageOverlay,
    pub pinned: bool,
    pub tags: Vec<String>,
}

struct NotifyFields {
    notify_image: FieldSpec,
    email: FieldSpec,
}

struct TestingFields {
    test_image: FieldSpec,
    devicegroup: FieldSpec,
    test_options: FieldSpec,
}

pub struct ImageJobForm {
    imagetype: FieldSpec,
    architecture: FieldSpec,
    ksfile: FieldSpec,
    template: FieldSpec,
    notify: Option<NotifyFields>,
    testing: Option<TestingFields>,
    features: FieldSpec,
    overlay: FieldSpec,
    pinned: FieldSpec,
    tags: FieldSpec,
    feature_set: FeatureSet,
}

fn same_value_and_label(names: Vec<String>) -> Vec<Choice> {
    names.into_iter().map(|n| Choice::new(n.clone(), n)).collect()
}

impl ImageJobForm {
    pub fn new(choices: ImageJobChoices, notify_enabled: bool, testing_enabled: bool) -> Self {
        let notify = notify_enabled.then(|| NotifyFields {
            notify_image: FieldSpec::boolean("notify_image", "Notify")
                .initial(true)
                .help("Notify image: Send notification when image building process is done. "),
            email: FieldSpec::char("email", "Emails")
                .optional()
                .textarea(2)
                .help("Emails: Comma separated list of emails to send a notification to when the image building is done."),
        });
        let testing = testing_enabled.then(|| TestingFields {
            test_image: FieldSpec::boolean("test_image", "QA image").help("Test image: Send image for QA. "),
            devicegroup: FieldSpec::char("devicegroup", "Device group")
                .optional()
                .initial("")
                .help("Device group: device group to use for test run."),
            test_options: FieldSpec::char("test_options", "Test options")
                .optional()
                .textarea(2)
                .help("Test options: comma separated list of test options you want to send to the testing server."),
        });

        Self {
            imagetype: FieldSpec::choice("imagetype", "Image type")
                .help("Type: format of image you want to produce.")
                .with_choices(same_value_and_label(choices.image_types)),
            architecture: FieldSpec::choice("architecture", "Architecture")
                .help("Target architecture of the image you want to build from your customized kickstart.")
                .with_choices(same_value_and_label(choices.archs)),
            ksfile: FieldSpec::file("ksfile", "Kickstart file")
                .optional()
                .help("Kickstart: customized kickstart file, if the templates don't fit your needs."),
            template: FieldSpec::choice("template", "Template")
                .help(
                    "Template: Choose a base template ontop of which your packages will be added. \
                     Each template is targeted at a certain device and architecture so the \
                     architecture and kickstart fields will be ignored.",
                )
                .with_choices(choices.templates),
            notify,
            testing,
            features: FieldSpec::multiple_choice("features", "Features")
                .optional()
                .help("Features: Commonly used extra features")
                .with_choices(choices.features.list()),
            overlay: FieldSpec::char("overlay", "Packages")
                .optional()
                .textarea(4)
                .help(
                    "Packages: comma separated list of packages you want to include in the image \
                     built from the chosen template. A packagename prefixed with \"-\" is excluded. \
                     Package groups are denoted by \"@\" prefix.",
                ),
            pinned: FieldSpec::boolean("pinned", "Pin image")
                .help("Pin image so it doesn't expire or get deleted by mistake. "),
            tags: FieldSpec::char("tags", "Tags")
                .optional()
                .textarea(2)
                .help("Tags: comma separated list of tags to describe the image built."),
            feature_set: choices.features,
        }
    }

    /// Fields in display order.
    pub fn fields(&self) -> Vec<&FieldSpec> {
        let mut fields = vec![&self.imagetype, &self.architecture, &self.ksfile, &self.template];
        if let Some(n) = &self.notify {
            fields.extend([&n.notify_image, &n.email]);
        }
        if let Some(t) = &self.testing {
            fields.extend([&t.test_image, &t.devicegroup, &t.test_options]);
        }
        fields.extend([&self.features, &self.overlay, &self.pinned, &self.tags]);
        fields
    }

    pub fn schema(&self) -> FormSchema {
        FormSchema { fields: self.fields().into_iter().cloned().collect() }
    }

    pub fn clean(&self, input: &ImageJobInput) -> Result<ImageJob, FormErrors> {
        let mut errors = FormErrors::default();

        let imagetype = self.imagetype.clean_choice(input.imagetype.as_deref(), &mut errors);
        let architecture = self.architecture.clean_choice(input.architecture.as_deref(), &mut errors);
        let ksfile = self.ksfile.clean_file(input.ksfile.as_ref(), &mut errors);
        let template = self
            .template
            .clean_choice(input.template.as_deref(), &mut errors)
            .filter(|t| t != NONE_CHOICE);

        let notify = self.notify.as_ref().map(|n| {
            let raw = n.email.clean_char(input.email.as_deref(), &mut errors);
            let emails = split_emails(&raw);
            if emails.iter().any(|e| !e.validate_email()) {
                errors.add(&n.email.name, MSG_INVALID_EMAIL);
            }
            Notification { notify_image: input.notify_image, emails }
        });

        let qa = self.testing.as_ref().map(|t| QaRequest {
            test_image: input.test_image,
            devicegroup: t.devicegroup.clean_char(input.devicegroup.as_deref(), &mut errors),
            test_options: split_list(&t.test_options.clean_char(input.test_options.as_deref(), &mut errors)),
        });

        let mut features = Vec::new();
        for name in self.features.clean_multiple_choice(&input.features, &mut errors) {
            match self.feature_set.expand(&name) {
                Ok(f) => features.push(f),
                Err(e) => errors.add(&self.features.name, e.to_string()),
            }
        }

        let overlay = PackageOverlay::parse(&self.overlay.clean_char(input.overlay.as_deref(), &mut errors));
        let tags = parse_tags(&self.tags.clean_char(input.tags.as_deref(), &mut errors));

        if !errors.has("ksfile") && !errors.has("template") {
            match (&ksfile, &template) {
                (Some(_), Some(_)) => errors.add_non_field(MSG_TEMPLATE_AND_KICKSTART),
                (None, None) => errors.add_non_field(MSG_TEMPLATE_OR_KICKSTART),
                _ => {}
            }
        }

        if !errors.is_empty() {
            return Err(errors);
        }
        match (imagetype, architecture) {
            (Some(imagetype), Some(architecture)) => Ok(ImageJob {
                imagetype,
                architecture,
                template,
                ksfile,
                notify,
                qa,
                features,
                overlay,
                pinned: input.pinned,
                tags,
            }),
            // both fields are required, so a missing value always left an error
            _ => Err(errors),
        }
    }
}

/// Split a comma separated address list; one trailing comma is tolerated.
pub fn split_emails(raw: &str) -> Vec<String> {
    let raw = raw.strip_suffix(',').unwrap_or(raw);
    split_list(raw)
}

fn split_list(raw: &str) -> Vec<String> {
    raw.split(',').map(str::trim).filter(|s| !s.is_empty()).map(String::from).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::forms::field::{MSG_REQUIRED, NON_FIELD_ERRORS};

    fn choices() -> ImageJobChoices {
        let mut features = FeatureSet::default();
        features
            .merge_str(
                "t.feature",
                "[repositories]\ncore = http://repo/core\n[devel]\ndescription = Devel\npattern = devel\nrepos = core\n[broken]\nrepos = ghost\n",
            )
            .unwrap();
        ImageJobChoices {
            image_types: vec!["raw".into(), "livecd".into()],
            archs: vec!["i586".into(), "armv7hl".into()],
            templates: vec![Choice::new("handset.ks", "Handset"), Choice::none()],
            features,
        }
    }

    fn valid_input() -> ImageJobInput {
        ImageJobInput {
            imagetype: Some("raw".into()),
            architecture: Some("i586".into()),
            template: Some("handset.ks".into()),
            ..Default::default()
        }
    }

    #[test]
    fn field_order_follows_enabled_sections() {
        let names = |f: &ImageJobForm| f.fields().iter().map(|s| s.name.clone()).collect::<Vec<_>>();
        let plain = ImageJobForm::new(choices(), false, false);
        assert_eq!(names(&plain), ["imagetype", "architecture", "ksfile", "template", "features", "overlay", "pinned", "tags"]);
        let full = ImageJobForm::new(choices(), true, true);
        assert_eq!(
            names(&full),
            [
                "imagetype", "architecture", "ksfile", "template", "notify_image", "email", "test_image",
                "devicegroup", "test_options", "features", "overlay", "pinned", "tags"
            ]
        );
    }

    #[test]
    fn clean_minimal_template_job() {
        let job = ImageJobForm::new(choices(), false, false).clean(&valid_input()).unwrap();
        assert_eq!(job.template.as_deref(), Some("handset.ks"));
        assert!(job.ksfile.is_none());
        assert!(job.notify.is_none());
        assert!(job.features.is_empty());
    }

    #[test]
    fn template_and_kickstart_together_rejected() {
        let mut input = valid_input();
        input.ksfile = Some(UploadedFile { name: "my.ks".into(), content: "lang en_US".into() });
        let err = ImageJobForm::new(choices(), false, false).clean(&input).unwrap_err();
        assert_eq!(err.get(NON_FIELD_ERRORS), [MSG_TEMPLATE_AND_KICKSTART.to_string()]);
    }

    #[test]
    fn none_template_without_kickstart_rejected() {
        let mut input = valid_input();
        input.template = Some("None".into());
        let err = ImageJobForm::new(choices(), false, false).clean(&input).unwrap_err();
        assert_eq!(err.non_field(), [MSG_TEMPLATE_OR_KICKSTART.to_string()]);
    }

    #[test]
    fn kickstart_with_none_template_accepted() {
        let mut input = valid_input();
        input.template = Some("None".into());
        input.ksfile = Some(UploadedFile { name: "my.ks".into(), content: "lang en_US".into() });
        let job = ImageJobForm::new(choices(), false, false).clean(&input).unwrap();
        assert_eq!(job.template, None);
        assert_eq!(job.ksfile.map(|f| f.name).as_deref(), Some("my.ks"));
    }

    #[test]
    fn missing_required_choices_reported_per_field() {
        let err = ImageJobForm::new(choices(), false, false).clean(&ImageJobInput::default()).unwrap_err();
        for field in ["imagetype", "architecture", "template"] {
            assert_eq!(err.get(field), [MSG_REQUIRED.to_string()], "{field}");
        }
        assert!(err.non_field().is_empty());
    }

    #[test]
    fn emails_validated_with_trailing_comma() {
        let form = ImageJobForm::new(choices(), true, false);
        let mut input = valid_input();
        input.notify_image = true;
        input.email = Some("a@example.com, b@example.org,".into());
        let job = form.clean(&input).unwrap();
        let notify = job.notify.unwrap();
        assert!(notify.notify_image);
        assert_eq!(notify.emails, ["a@example.com", "b@example.org"]);

        input.email = Some("a@example.com, not-an-address".into());
        let err = form.clean(&input).unwrap_err();
        assert_eq!(err.get("email"), [MSG_INVALID_EMAIL.to_string()]);
    }

    #[test]
    fn disabled_sections_ignore_submitted_values() {
        let mut input = valid_input();
        input.email = Some("garbage".into());
        input.test_options = Some("a,b".into());
        let job = ImageJobForm::new(choices(), false, false).clean(&input).unwrap();
        assert!(job.notify.is_none());
        assert!(job.qa.is_none());
    }

    #[test]
    fn qa_options_are_split() {
        let mut input = valid_input();
        input.test_image = true;
        input.devicegroup = Some(" n900 ".into());
        input.test_options = Some("smoke, , full".into());
        let qa = ImageJobForm::new(choices(), false, true).clean(&input).unwrap().qa.unwrap();
        assert_eq!(qa, QaRequest { test_image: true, devicegroup: "n900".into(), test_options: vec!["smoke".into(), "full".into()] });
    }

    #[test]
    fn features_are_expanded() {
        let mut input = valid_input();
        input.features = vec!["devel".into()];
        let job = ImageJobForm::new(choices(), false, false).clean(&input).unwrap();
        assert_eq!(job.features.len(), 1);
        assert!(job.features[0].repos.contains("http://repo/core"));
    }

    #[test]
    fn unknown_or_broken_features_rejected() {
        let form = ImageJobForm::new(choices(), false, false);
        let mut input = valid_input();
        input.features = vec!["repositories".into()];
        assert!(form.clean(&input).unwrap_err().has("features"));
        input.features = vec!["broken".into()];
        assert!(form.clean(&input).unwrap_err().has("features"));
    }

    #[test]
    fn overlay_and_tags_are_parsed() {
        let mut input = valid_input();
        input.overlay = Some("vim, -emacs,\n@Base, vim".into());
        input.tags = Some("nightly \"ux build\"".into());
        let job = ImageJobForm::new(choices(), false, false).clean(&input).unwrap();
        assert_eq!(job.overlay, PackageOverlay { packages: vec!["vim".into()], excluded: vec!["emacs".into()], groups: vec!["Base".into()] });
        assert_eq!(job.tags, ["nightly", "ux build"]);
    }

    #[test]
    fn schema_includes_current_choices() {
        let schema = ImageJobForm::new(choices(), false, false).schema();
        let features = schema.fields.iter().find(|f| f.name == "features").unwrap();
        assert_eq!(features.choices.len(), 2);
        let template = schema.fields.iter().find(|f| f.name == "template").unwrap();
        assert!(template.offers("None"));
    }
}
