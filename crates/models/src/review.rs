use chrono::Utc;
use sea_orm::{entity::prelude::*, Set, DatabaseConnection};
use serde::{Deserialize, Serialize};

use crate::{errors, service, user};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "review")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub service_id: i32,
    pub user_id: i32,
    pub score: i32,
    #[sea_orm(column_type = "Text")]
    pub body: String,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {
    Service,
    User,
}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::Service => Entity::belongs_to(service::Entity)
                .from(Column::ServiceId)
                .to(service::Column::Id)
                .on_delete(ForeignKeyAction::Cascade)
                .into(),
            Relation::User => Entity::belongs_to(user::Entity)
                .from(Column::UserId)
                .to(user::Column::Id)
                .on_delete(ForeignKeyAction::Cascade)
                .into(),
        }
    }
}

impl Related<service::Entity> for Entity {
    fn to() -> RelationDef { Relation::Service.def() }
}

impl Related<user::Entity> for Entity {
    fn to() -> RelationDef { Relation::User.def() }
}

impl ActiveModelBehavior for ActiveModel {}

pub const MIN_SCORE: i32 = 1;
pub const MAX_SCORE: i32 = 5;

pub fn validate_score(score: i32) -> Result<(), errors::ModelError> {
    if !(MIN_SCORE..=MAX_SCORE).contains(&score) {
        return Err(errors::ModelError::Validation(format!("score must be between {} and {}", MIN_SCORE, MAX_SCORE)));
    }
    Ok(())
}

pub async fn create(db: &DatabaseConnection, service_id: i32, user_id: i32, score: i32, body: &str) -> Result<Model, errors::ModelError> {
    validate_score(score)?;
    if body.trim().is_empty() { return Err(errors::ModelError::Validation("review body required".into())); }
    let am = ActiveModel {
        service_id: Set(service_id),
        user_id: Set(user_id),
        score: Set(score),
        body: Set(body.trim().to_string()),
        created_at: Set(Utc::now().into()),
        ..Default::default()
    };
    am.insert(db).await.map_err(|e| errors::ModelError::Db(e.to_string()))
}
