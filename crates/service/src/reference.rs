//! Read-only lookups over the reference tables.
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QuerySelect};

use models::{category, state};
use crate::errors::ServiceError;

/// All states ordered by code.
pub async fn list_states(db: &DatabaseConnection) -> Result<Vec<state::Model>, ServiceError> {
    Ok(state::list(db).await?)
}

pub async fn state_code_exists(db: &DatabaseConnection, code: &str) -> Result<bool, ServiceError> {
    Ok(state::find_by_code(db, code).await?.is_some())
}

/// All categories ordered by name.
pub async fn list_categories(db: &DatabaseConnection) -> Result<Vec<category::Model>, ServiceError> {
    Ok(category::list(db).await?)
}

/// The subset of `ids` that refer to existing categories.
pub async fn existing_category_ids(db: &DatabaseConnection, ids: &[i32]) -> Result<Vec<i32>, ServiceError> {
    if ids.is_empty() {
        return Ok(Vec::new());
    }
    let found: Vec<i32> = category::Entity::find()
        .select_only()
        .column(category::Column::Id)
        .filter(category::Column::Id.is_in(ids.to_vec()))
        .into_tuple()
        .all(db)
        .await?;
    Ok(found)
}
