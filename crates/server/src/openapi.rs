//! OpenAPI document. Schemas here mirror the JSON payloads; the handlers
//! serialize the entity models directly.
use utoipa::OpenApi;
use utoipa::ToSchema;

#[derive(ToSchema)]
pub struct HealthResponse { pub status: String }

#[derive(ToSchema)]
pub struct PageMetaDoc { pub current_page: u64, pub last_page: u64, pub per_page: u64, pub total: u64 }

#[derive(ToSchema)]
pub struct ServiceDoc {
    pub id: i32,
    pub user_id: i32,
    pub location_id: Option<i32>,
    pub title: String,
    pub description: String,
    /// Decimal string with two fraction digits.
    pub price: String,
    pub photo: Option<String>,
    pub created_at: String,
    pub updated_at: String,
    /// Mean review score, null when the service has no reviews.
    pub avg_score: Option<f64>,
}

#[derive(ToSchema)]
pub struct ServiceListDoc { pub data: Vec<ServiceDoc>, pub meta: PageMetaDoc }

#[derive(ToSchema)]
pub struct StateDoc { pub id: i32, pub name: String, pub code: String }

#[derive(ToSchema)]
pub struct StateListDoc { pub data: Vec<StateDoc> }

#[derive(ToSchema)]
pub struct CategoryDoc { pub id: i32, pub name: String }

#[derive(ToSchema)]
pub struct CategoryListDoc { pub data: Vec<CategoryDoc> }

#[derive(ToSchema)]
pub struct LocationDoc {
    pub street_address: String,
    pub city: String,
    pub county: Option<String>,
    pub zip: String,
    pub state_code: String,
    pub latitude: String,
    pub longitude: String,
}

#[derive(ToSchema)]
pub struct ReviewDoc { pub id: i32, pub service_id: i32, pub user_id: i32, pub score: i32, pub body: String, pub created_at: String }

#[derive(ToSchema)]
pub struct ReviewWithAuthorDoc { pub id: i32, pub user_id: i32, pub score: i32, pub body: String, pub created_at: String, pub author: Option<String> }

/// Service fields plus `avg_score`, categories, location with state, and reviews newest first.
#[derive(ToSchema)]
pub struct ServiceDetailDataDoc {
    pub id: i32,
    pub user_id: i32,
    pub title: String,
    pub description: String,
    pub price: String,
    pub photo: Option<String>,
    pub avg_score: Option<f64>,
    pub categories: Vec<CategoryDoc>,
    pub location: Option<LocationDoc>,
    pub reviews: Vec<ReviewWithAuthorDoc>,
}

#[derive(ToSchema)]
pub struct ServiceDetailDoc { pub data: ServiceDetailDataDoc, pub message: Option<String> }

#[derive(ToSchema)]
pub struct CreateServiceDoc {
    pub user_id: i32,
    pub title: String,
    pub description: String,
    pub price: String,
    pub photo: Option<String>,
    pub category_ids: Vec<i32>,
    pub location: Option<LocationDoc>,
}

#[derive(ToSchema)]
pub struct UpdateServiceDoc {
    pub title: Option<String>,
    pub description: Option<String>,
    pub price: Option<String>,
    pub photo: Option<String>,
    pub category_ids: Option<Vec<i32>>,
    pub location: Option<LocationDoc>,
}

#[derive(ToSchema)]
pub struct CreateReviewDoc { pub user_id: i32, pub score: i32, pub body: String }

#[derive(ToSchema)]
pub struct CreateUserDoc { pub name: String, pub email: String }

#[derive(ToSchema)]
pub struct UserDoc { pub id: i32, pub name: String, pub email: String, pub created_at: String }

/// `{"message": "The given data was invalid.", "errors": {"field": ["..."]}}`
#[derive(ToSchema)]
pub struct ValidationErrorDoc {
    pub message: String,
    pub errors: std::collections::HashMap<String, Vec<String>>,
}

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::handlers::health::health,
        crate::handlers::services::search_services,
        crate::handlers::services::create_service,
        crate::handlers::services::show_service,
        crate::handlers::services::update_service,
        crate::handlers::services::delete_service,
        crate::handlers::services::create_review,
        crate::handlers::users::create_user,
        crate::handlers::users::user_services,
        crate::handlers::reference::list_states,
        crate::handlers::reference::list_categories,
    ),
    components(
        schemas(
            HealthResponse,
            PageMetaDoc,
            ServiceDoc,
            ServiceListDoc,
            StateDoc,
            StateListDoc,
            CategoryDoc,
            CategoryListDoc,
            LocationDoc,
            ReviewDoc,
            ReviewWithAuthorDoc,
            ServiceDetailDataDoc,
            ServiceDetailDoc,
            CreateServiceDoc,
            UpdateServiceDoc,
            CreateReviewDoc,
            CreateUserDoc,
            UserDoc,
            ValidationErrorDoc,
        )
    ),
    tags(
        (name = "health"),
        (name = "services"),
        (name = "users"),
        (name = "reference")
    )
)]
pub struct ApiDoc;
