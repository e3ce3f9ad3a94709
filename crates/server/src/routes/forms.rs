use axum::{extract::State, Json};
use service::form_service::{JobFormSchema, JobRequest, JobSubmission};
use service::forms::{FormsetSchema, SearchInput, SearchQuery, TagInput, TagList};
use tracing::info;

use crate::errors::JsonApiError;
use crate::state::ServerState;

#[utoipa::path(
    get, path = "/forms/image-job", tag = "forms",
    responses(
        (status = 200, description = "Job form and formset schemas"),
        (status = 500, description = "Choices could not be loaded")
    )
)]
pub async fn image_job_schema(State(state): State<ServerState>) -> Result<Json<JobFormSchema>, JsonApiError> {
    Ok(Json(state.forms.job_form_schema().await?))
}

#[utoipa::path(
    post, path = "/forms/image-job", tag = "forms",
    request_body = crate::openapi::JobSubmissionDoc,
    responses(
        (status = 200, description = "Cleaned job request"),
        (status = 400, description = "Validation Error", body = crate::openapi::ErrorBodyDoc),
        (status = 500, description = "Choices could not be loaded")
    )
)]
pub async fn submit_image_job(
    State(state): State<ServerState>,
    Json(input): Json<JobSubmission>,
) -> Result<Json<JobRequest>, JsonApiError> {
    let req = state.forms.submit_job(&input).await?;
    info!(imagetype = %req.job.imagetype, extra_repos = req.extra_repos.len(), "image job accepted");
    Ok(Json(req))
}

#[utoipa::path(get, path = "/forms/extra-repos", tag = "forms", responses((status = 200, description = "Extra repository formset schema")))]
pub async fn extra_repos_schema(State(state): State<ServerState>) -> Result<Json<FormsetSchema>, JsonApiError> {
    Ok(Json(state.forms.extra_repo_form().await?.schema()))
}

#[utoipa::path(get, path = "/forms/extra-tokens", tag = "forms", responses((status = 200, description = "Extra tokens formset schema")))]
pub async fn extra_tokens_schema(State(state): State<ServerState>) -> Result<Json<FormsetSchema>, JsonApiError> {
    Ok(Json(state.forms.extra_tokens_form().await?.schema()))
}

#[utoipa::path(
    post, path = "/forms/tags", tag = "forms",
    request_body = crate::openapi::TagInputDoc,
    responses((status = 200, description = "Parsed tags"), (status = 400, description = "Validation Error"))
)]
pub async fn clean_tags(State(state): State<ServerState>, Json(input): Json<TagInput>) -> Result<Json<TagList>, JsonApiError> {
    Ok(Json(state.forms.clean_tags(&input)?))
}

#[utoipa::path(
    post, path = "/forms/search", tag = "forms",
    request_body = crate::openapi::SearchInputDoc,
    responses((status = 200, description = "Search query"), (status = 400, description = "Validation Error"))
)]
pub async fn clean_search(
    State(state): State<ServerState>,
    Json(input): Json<SearchInput>,
) -> Result<Json<SearchQuery>, JsonApiError> {
    Ok(Json(state.forms.clean_search(&input)?))
}
