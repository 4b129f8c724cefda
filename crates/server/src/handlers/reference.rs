use axum::extract::State;
use axum::Json;
use models::{category, state};

use super::DataResponse;
use crate::errors::AppError;
use crate::state::ServerState;

#[utoipa::path(get, path = "/api/states", responses((status = 200, description = "States ordered by code", body = crate::openapi::StateListDoc)), tag = "reference")]
pub async fn list_states(State(st): State<ServerState>) -> Result<Json<DataResponse<Vec<state::Model>>>, AppError> {
    let states = service::reference::list_states(&st.db).await?;
    Ok(Json(DataResponse::new(states)))
}

#[utoipa::path(get, path = "/api/categories", responses((status = 200, description = "Categories ordered by name", body = crate::openapi::CategoryListDoc)), tag = "reference")]
pub async fn list_categories(State(st): State<ServerState>) -> Result<Json<DataResponse<Vec<category::Model>>>, AppError> {
    let categories = service::reference::list_categories(&st.db).await?;
    Ok(Json(DataResponse::new(categories)))
}
