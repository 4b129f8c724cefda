use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use axum_extra::extract::Query;
use models::review;
use serde::Deserialize;
use tracing::info;
use validator::{Validate, ValidationErrors};

use service::catalog::{self, NewService, ServiceChanges, ServiceDetail, ServiceLocation};
use service::search::{self, ScoredService};

use super::{DataResponse, ListResponse};
use crate::errors::{field_error, AppError, JsonApiError, ValidationFailed};
use crate::extract::ValidatedJson;
use crate::metrics;
use crate::state::ServerState;
use crate::validation::{self, SearchParams};

#[derive(Debug, Deserialize, Validate)]
pub struct LocationBody {
    #[validate(length(min = 1, max = 255, message = "The street address must be between 1 and 255 characters."))]
    pub street_address: String,
    #[validate(length(min = 1, max = 128, message = "The city must be between 1 and 128 characters."))]
    pub city: String,
    pub county: Option<String>,
    #[validate(length(min = 1, max = 16, message = "The zip must be between 1 and 16 characters."))]
    pub zip: String,
    #[validate(length(min = 1, message = "The state code field is required."))]
    pub state_code: String,
    #[validate(custom(function = "validation::validate_latitude"))]
    pub latitude: String,
    #[validate(custom(function = "validation::validate_longitude"))]
    pub longitude: String,
}

impl From<LocationBody> for ServiceLocation {
    fn from(b: LocationBody) -> Self {
        ServiceLocation {
            street_address: b.street_address,
            city: b.city,
            county: b.county,
            zip: b.zip,
            state_code: b.state_code,
            latitude: b.latitude,
            longitude: b.longitude,
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateServiceBody {
    pub user_id: i32,
    #[validate(length(min = 1, max = 255, message = "The title must be between 1 and 255 characters."))]
    pub title: String,
    #[validate(length(min = 1, max = 5000, message = "The description must be between 1 and 5000 characters."))]
    pub description: String,
    #[validate(custom(function = "validation::validate_price"))]
    pub price: String,
    pub photo: Option<String>,
    #[serde(default)]
    pub category_ids: Vec<i32>,
    #[validate(nested)]
    pub location: Option<LocationBody>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateServiceBody {
    #[validate(length(min = 1, max = 255, message = "The title must be between 1 and 255 characters."))]
    pub title: Option<String>,
    #[validate(length(min = 1, max = 5000, message = "The description must be between 1 and 5000 characters."))]
    pub description: Option<String>,
    #[validate(custom(function = "validation::validate_price"))]
    pub price: Option<String>,
    pub photo: Option<String>,
    pub category_ids: Option<Vec<i32>>,
    #[validate(nested)]
    pub location: Option<LocationBody>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateReviewBody {
    pub user_id: i32,
    #[validate(range(min = 1, max = 5, message = "The score must be between 1 and 5."))]
    pub score: i32,
    #[validate(length(min = 1, max = 5000, message = "The body must be between 1 and 5000 characters."))]
    pub body: String,
}

/// Reference checks that need the database: state codes and category ids.
async fn check_references(st: &ServerState, state_code: Option<&str>, category_ids: Option<&[i32]>) -> Result<(), AppError> {
    let mut errors = ValidationErrors::new();
    if let Some(code) = state_code {
        if !service::reference::state_code_exists(&st.db, code).await? {
            errors.add("location.state_code", field_error("exists", "The selected location state code is invalid."));
        }
    }
    if let Some(ids) = category_ids {
        let found = service::reference::existing_category_ids(&st.db, ids).await?;
        if ids.iter().any(|id| !found.contains(id)) {
            errors.add("category_ids", field_error("exists", "The selected category ids are invalid."));
        }
    }
    if !errors.is_empty() {
        return Err(ValidationFailed(errors).into());
    }
    Ok(())
}

#[utoipa::path(
    get,
    path = "/api/services",
    params(SearchParams),
    responses(
        (status = 200, description = "One page of matching services", body = crate::openapi::ServiceListDoc),
        (status = 422, description = "Invalid filters", body = crate::openapi::ValidationErrorDoc)
    ),
    tag = "services"
)]
pub async fn search_services(
    State(st): State<ServerState>,
    Query(params): Query<SearchParams>,
) -> Result<Json<ListResponse<ScoredService>>, AppError> {
    let search = validation::validate_search(&st.db, &params).await?;
    let page = metrics::time_search(search::search_services(&st.db, &search)).await?;
    Ok(Json(page.into()))
}

#[utoipa::path(
    post,
    path = "/api/services",
    request_body = crate::openapi::CreateServiceDoc,
    responses(
        (status = 201, description = "Service created", body = crate::openapi::ServiceDetailDoc),
        (status = 404, description = "Owner not found"),
        (status = 422, description = "Validation failed", body = crate::openapi::ValidationErrorDoc)
    ),
    tag = "services"
)]
pub async fn create_service(
    State(st): State<ServerState>,
    ValidatedJson(body): ValidatedJson<CreateServiceBody>,
) -> Result<(StatusCode, Json<DataResponse<ServiceDetail>>), AppError> {
    let state_code = body.location.as_ref().map(|l| l.state_code.as_str());
    check_references(&st, state_code, Some(body.category_ids.as_slice())).await?;
    let created = catalog::create_service(
        &st.db,
        NewService {
            user_id: body.user_id,
            title: body.title,
            description: body.description,
            price: body.price,
            photo: body.photo,
            category_ids: body.category_ids,
            location: body.location.map(Into::into),
        },
    )
    .await?;
    let detail = catalog::get_service_detail(&st.db, created.id).await?;
    Ok((StatusCode::CREATED, Json(DataResponse::with_message(detail, "Service created."))))
}

#[utoipa::path(
    get,
    path = "/api/services/{id}",
    params(("id" = i32, Path, description = "Service id")),
    responses(
        (status = 200, description = "Service with categories, location and reviews", body = crate::openapi::ServiceDetailDoc),
        (status = 404, description = "Service not found")
    ),
    tag = "services"
)]
pub async fn show_service(
    State(st): State<ServerState>,
    Path(id): Path<i32>,
) -> Result<Json<DataResponse<ServiceDetail>>, AppError> {
    let detail = catalog::get_service_detail(&st.db, id).await?;
    Ok(Json(DataResponse::new(detail)))
}

#[utoipa::path(
    put,
    path = "/api/services/{id}",
    params(("id" = i32, Path, description = "Service id")),
    request_body = crate::openapi::UpdateServiceDoc,
    responses(
        (status = 200, description = "Service updated", body = crate::openapi::ServiceDetailDoc),
        (status = 404, description = "Service not found"),
        (status = 422, description = "Validation failed", body = crate::openapi::ValidationErrorDoc)
    ),
    tag = "services"
)]
pub async fn update_service(
    State(st): State<ServerState>,
    Path(id): Path<i32>,
    ValidatedJson(body): ValidatedJson<UpdateServiceBody>,
) -> Result<Json<DataResponse<ServiceDetail>>, AppError> {
    let state_code = body.location.as_ref().map(|l| l.state_code.as_str());
    check_references(&st, state_code, body.category_ids.as_deref()).await?;
    catalog::update_service(
        &st.db,
        id,
        ServiceChanges {
            title: body.title,
            description: body.description,
            price: body.price,
            photo: body.photo,
            category_ids: body.category_ids,
            location: body.location.map(Into::into),
        },
    )
    .await?;
    let detail = catalog::get_service_detail(&st.db, id).await?;
    Ok(Json(DataResponse::with_message(detail, "Service updated.")))
}

#[utoipa::path(
    delete,
    path = "/api/services/{id}",
    params(("id" = i32, Path, description = "Service id")),
    responses((status = 204, description = "Deleted"), (status = 404, description = "Service not found")),
    tag = "services"
)]
pub async fn delete_service(State(st): State<ServerState>, Path(id): Path<i32>) -> Result<StatusCode, AppError> {
    if catalog::delete_service(&st.db, id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(JsonApiError::not_found("service not found").into())
    }
}

#[utoipa::path(
    post,
    path = "/api/services/{id}/reviews",
    params(("id" = i32, Path, description = "Service id")),
    request_body = crate::openapi::CreateReviewDoc,
    responses(
        (status = 201, description = "Review added", body = crate::openapi::ReviewDoc),
        (status = 404, description = "Service or user not found"),
        (status = 422, description = "Validation failed", body = crate::openapi::ValidationErrorDoc)
    ),
    tag = "services"
)]
pub async fn create_review(
    State(st): State<ServerState>,
    Path(id): Path<i32>,
    ValidatedJson(body): ValidatedJson<CreateReviewBody>,
) -> Result<(StatusCode, Json<DataResponse<review::Model>>), AppError> {
    let created = service::reviews::create_review(&st.db, id, body.user_id, body.score, &body.body).await?;
    info!(service_id = id, review_id = created.id, "review added");
    Ok((StatusCode::CREATED, Json(DataResponse::with_message(created, "Review created."))))
}
