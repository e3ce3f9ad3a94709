use axum::{extract::{Path, State}, Json};
use service::features::ExpandedFeature;
use service::forms::Choice;

use crate::errors::JsonApiError;
use crate::state::ServerState;

#[utoipa::path(get, path = "/features", tag = "features", responses((status = 200, description = "Selectable features")))]
pub async fn list(State(state): State<ServerState>) -> Result<Json<Vec<Choice>>, JsonApiError> {
    Ok(Json(state.forms.list_features()?))
}

#[utoipa::path(
    get, path = "/features/{name}", tag = "features",
    params(("name" = String, Path, description = "Feature section name")),
    responses(
        (status = 200, description = "Patterns and repository URLs"),
        (status = 404, description = "Not Found")
    )
)]
pub async fn expand(State(state): State<ServerState>, Path(name): Path<String>) -> Result<Json<ExpandedFeature>, JsonApiError> {
    Ok(Json(state.forms.expand_feature(&name)?))
}
