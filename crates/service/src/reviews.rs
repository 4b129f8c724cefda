use sea_orm::{DatabaseConnection, EntityTrait};
use tracing::info;

use models::{review, service, user};
use crate::errors::ServiceError;

/// Add a review to a service. Both the service and the author must exist.
pub async fn create_review(
    db: &DatabaseConnection,
    service_id: i32,
    user_id: i32,
    score: i32,
    body: &str,
) -> Result<review::Model, ServiceError> {
    service::Entity::find_by_id(service_id)
        .one(db)
        .await?
        .ok_or_else(|| ServiceError::not_found("service"))?;
    user::Entity::find_by_id(user_id)
        .one(db)
        .await?
        .ok_or_else(|| ServiceError::not_found("user"))?;
    let created = review::create(db, service_id, user_id, score, body).await?;
    info!(review_id = created.id, service_id, score, "review created");
    Ok(created)
}
