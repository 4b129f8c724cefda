use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use axum_extra::extract::Query;
use models::user;
use serde::Deserialize;
use validator::Validate;

use service::search::{self, ScoredService};

use super::{DataResponse, ListResponse};
use crate::errors::AppError;
use crate::extract::ValidatedJson;
use crate::state::ServerState;
use crate::validation::{self, PageParams};

#[derive(Debug, Deserialize, Validate)]
pub struct CreateUserBody {
    #[validate(length(min = 1, max = 128, message = "The name must be between 1 and 128 characters."))]
    pub name: String,
    #[validate(email(message = "The email must be a valid email address."))]
    pub email: String,
}

#[utoipa::path(
    post,
    path = "/api/users",
    request_body = crate::openapi::CreateUserDoc,
    responses(
        (status = 201, description = "User created", body = crate::openapi::UserDoc),
        (status = 422, description = "Validation failed", body = crate::openapi::ValidationErrorDoc)
    ),
    tag = "users"
)]
pub async fn create_user(
    State(st): State<ServerState>,
    ValidatedJson(body): ValidatedJson<CreateUserBody>,
) -> Result<(StatusCode, Json<DataResponse<user::Model>>), AppError> {
    let created = service::users::create_user(&st.db, &body.name, &body.email).await?;
    Ok((StatusCode::CREATED, Json(DataResponse::with_message(created, "User created."))))
}

#[utoipa::path(
    get,
    path = "/api/users/{id}/services",
    params(("id" = i32, Path, description = "Owner id"), PageParams),
    responses(
        (status = 200, description = "Services owned by the user", body = crate::openapi::ServiceListDoc),
        (status = 404, description = "User not found")
    ),
    tag = "users"
)]
pub async fn user_services(
    State(st): State<ServerState>,
    Path(id): Path<i32>,
    Query(params): Query<PageParams>,
) -> Result<Json<ListResponse<ScoredService>>, AppError> {
    let pagination = validation::validate_page(&params)?;
    let page = search::list_user_services(&st.db, id, pagination).await?;
    Ok(Json(page.into()))
}
