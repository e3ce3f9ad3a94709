use std::collections::HashMap;

use utoipa::OpenApi;
use utoipa::ToSchema;

#[derive(ToSchema)]
pub struct HealthResponse { pub status: String }

#[derive(ToSchema)]
pub struct UploadedFileDoc { pub name: String, pub content: String }

#[derive(ToSchema)]
pub struct ImageJobInputDoc {
    pub imagetype: Option<String>,
    pub architecture: Option<String>,
    pub ksfile: Option<UploadedFileDoc>,
    pub template: Option<String>,
    pub notify_image: bool,
    /// Comma-separated addresses.
    pub email: Option<String>,
    pub test_image: bool,
    pub devicegroup: Option<String>,
    pub test_options: Option<String>,
    pub features: Vec<String>,
    pub overlay: Option<String>,
    pub pinned: bool,
    pub tags: Option<String>,
}

#[derive(ToSchema)]
pub struct ExtraRepoInputDoc {
    /// API URL of a build service, or `None`.
    pub obs: Option<String>,
    pub project: Option<String>,
    pub repo: Option<String>,
}

#[derive(ToSchema)]
pub struct JobSubmissionDoc {
    pub job: ImageJobInputDoc,
    pub extra_repos: Vec<ExtraRepoInputDoc>,
    /// Token name to value, one map per token form.
    pub extra_tokens: Vec<HashMap<String, String>>,
}

#[derive(ToSchema)]
pub struct TagInputDoc { pub tags: String }

#[derive(ToSchema)]
pub struct SearchInputDoc { pub searchterm: String }

#[derive(ToSchema)]
pub struct ErrorBodyDoc {
    pub error: String,
    pub detail: Option<String>,
    /// Messages by field; `_all` holds form-level messages.
    pub errors: Option<HashMap<String, Vec<String>>>,
}

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::routes::health,
        crate::routes::forms::image_job_schema,
        crate::routes::forms::submit_image_job,
        crate::routes::forms::extra_repos_schema,
        crate::routes::forms::extra_tokens_schema,
        crate::routes::forms::clean_tags,
        crate::routes::forms::clean_search,
        crate::routes::features::list,
        crate::routes::features::expand,
    ),
    components(
        schemas(
            HealthResponse,
            UploadedFileDoc,
            ImageJobInputDoc,
            ExtraRepoInputDoc,
            JobSubmissionDoc,
            TagInputDoc,
            SearchInputDoc,
            ErrorBodyDoc,
        )
    ),
    tags(
        (name = "health"),
        (name = "forms"),
        (name = "features")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_lists_every_route() {
        let doc = ApiDoc::openapi();
        let paths: Vec<&String> = doc.paths.paths.keys().collect();
        for p in ["/health", "/forms/image-job", "/forms/tags", "/forms/search", "/features/{name}"] {
            assert!(paths.iter().any(|k| k.as_str() == p), "missing {p}");
        }
    }
}
