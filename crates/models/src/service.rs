use std::str::FromStr;

use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::{category, errors, location, review, service_category, user};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "service")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub user_id: i32,
    pub location_id: Option<i32>,
    pub title: String,
    #[sea_orm(column_type = "Text")]
    pub description: String,
    /// Fixed-point price, two decimal places, kept as text.
    pub price: String,
    pub photo: Option<String>,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {
    User,
    Location,
    ServiceCategory,
    Review,
}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::User => Entity::belongs_to(user::Entity)
                .from(Column::UserId)
                .to(user::Column::Id)
                .on_delete(ForeignKeyAction::Cascade)
                .into(),
            Relation::Location => Entity::belongs_to(location::Entity)
                .from(Column::LocationId)
                .to(location::Column::Id)
                .on_delete(ForeignKeyAction::SetNull)
                .into(),
            Relation::ServiceCategory => Entity::has_many(service_category::Entity).into(),
            Relation::Review => Entity::has_many(review::Entity).into(),
        }
    }
}

impl Related<user::Entity> for Entity {
    fn to() -> RelationDef { Relation::User.def() }
}

impl Related<location::Entity> for Entity {
    fn to() -> RelationDef { Relation::Location.def() }
}

impl Related<review::Entity> for Entity {
    fn to() -> RelationDef { Relation::Review.def() }
}

impl Related<category::Entity> for Entity {
    fn to() -> RelationDef { service_category::Relation::Category.def() }
    fn via() -> Option<RelationDef> { Some(service_category::Relation::Service.def().rev()) }
}

impl ActiveModelBehavior for ActiveModel {}

pub fn validate_title(title: &str) -> Result<(), errors::ModelError> {
    if title.trim().is_empty() { return Err(errors::ModelError::Validation("title required".into())); }
    if title.chars().count() > 255 { return Err(errors::ModelError::Validation("title too long (<=255)".into())); }
    Ok(())
}

pub fn validate_description(description: &str) -> Result<(), errors::ModelError> {
    if description.trim().is_empty() { return Err(errors::ModelError::Validation("description required".into())); }
    if description.chars().count() > 5000 { return Err(errors::ModelError::Validation("description too long (<=5000)".into())); }
    Ok(())
}

/// Parse a non-negative price with at most two fractional digits.
/// Returns the canonical two-place rendering stored in the column.
pub fn normalize_price(raw: &str) -> Result<String, errors::ModelError> {
    let value = Decimal::from_str(raw.trim())
        .map_err(|_| errors::ModelError::Validation(format!("price '{}' is not a number", raw)))?;
    if value.is_sign_negative() && !value.is_zero() {
        return Err(errors::ModelError::Validation("price must be >= 0".into()));
    }
    if value.normalize().scale() > 2 {
        return Err(errors::ModelError::Validation("price allows at most 2 decimal places".into()));
    }
    let mut value = value.abs();
    value.rescale(2);
    Ok(value.to_string())
}
