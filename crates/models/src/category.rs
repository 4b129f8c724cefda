use sea_orm::{entity::prelude::*, Set, DatabaseConnection, QueryOrder};
use serde::{Deserialize, Serialize};

use crate::{errors, service, service_category};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "category")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub name: String,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation { ServiceCategory }

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::ServiceCategory => Entity::has_many(service_category::Entity).into(),
        }
    }
}

impl Related<service_category::Entity> for Entity {
    fn to() -> RelationDef { Relation::ServiceCategory.def() }
}

impl Related<service::Entity> for Entity {
    fn to() -> RelationDef { service_category::Relation::Service.def() }
    fn via() -> Option<RelationDef> { Some(service_category::Relation::Category.def().rev()) }
}

impl ActiveModelBehavior for ActiveModel {}

pub async fn create(db: &DatabaseConnection, name: &str) -> Result<Model, errors::ModelError> {
    let name = name.trim();
    if name.is_empty() { return Err(errors::ModelError::Validation("category name required".into())); }
    if name.chars().count() > 64 { return Err(errors::ModelError::Validation("category name too long (<=64)".into())); }
    let am = ActiveModel { name: Set(name.to_string()), ..Default::default() };
    am.insert(db).await.map_err(|e| errors::ModelError::Db(e.to_string()))
}

pub async fn list(db: &DatabaseConnection) -> Result<Vec<Model>, errors::ModelError> {
    Entity::find()
        .order_by_asc(Column::Name)
        .all(db)
        .await
        .map_err(|e| errors::ModelError::Db(e.to_string()))
}
