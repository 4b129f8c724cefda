use sea_orm::{DatabaseConnection, EntityTrait};

use models::user;
use crate::errors::ServiceError;

/// Create a user.
pub async fn create_user(db: &DatabaseConnection, name: &str, email: &str) -> Result<user::Model, ServiceError> {
    let created = user::create(db, name, email).await?;
    tracing::info!(user_id = created.id, "user created");
    Ok(created)
}

/// Get user by id.
pub async fn get_user(db: &DatabaseConnection, id: i32) -> Result<Option<user::Model>, ServiceError> {
    Ok(user::Entity::find_by_id(id).one(db).await?)
}
