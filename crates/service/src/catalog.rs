//! Service listing CRUD. Writes that touch several tables run in one
//! transaction.
use std::collections::BTreeSet;

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DatabaseTransaction, EntityTrait, ModelTrait, QueryFilter,
    QueryOrder, Set, TransactionTrait,
};
use serde::{Deserialize, Serialize};
use tracing::info;

use models::{category, location, review, service, service_category, state, user};

use crate::errors::ServiceError;
use crate::reference;
use crate::search::engine::average_scores;

/// Address for a listing; the state is given by code.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct ServiceLocation {
    pub street_address: String,
    pub city: String,
    pub county: Option<String>,
    pub zip: String,
    pub state_code: String,
    pub latitude: String,
    pub longitude: String,
}

#[derive(Clone, Debug)]
pub struct NewService {
    pub user_id: i32,
    pub title: String,
    pub description: String,
    pub price: String,
    pub photo: Option<String>,
    pub category_ids: Vec<i32>,
    pub location: Option<ServiceLocation>,
}

/// Fields to change; `None` leaves the current value alone.
#[derive(Clone, Debug, Default)]
pub struct ServiceChanges {
    pub title: Option<String>,
    pub description: Option<String>,
    pub price: Option<String>,
    pub photo: Option<String>,
    /// Replaces every category link when set.
    pub category_ids: Option<Vec<i32>>,
    pub location: Option<ServiceLocation>,
}

#[derive(Clone, Debug, Serialize)]
pub struct LocationDetail {
    #[serde(flatten)]
    pub location: location::Model,
    pub state: Option<state::Model>,
}

#[derive(Clone, Debug, Serialize)]
pub struct ReviewDetail {
    #[serde(flatten)]
    pub review: review::Model,
    pub author: Option<String>,
}

/// A service with everything the detail page shows.
#[derive(Clone, Debug, Serialize)]
pub struct ServiceDetail {
    #[serde(flatten)]
    pub service: service::Model,
    pub avg_score: Option<f64>,
    pub categories: Vec<category::Model>,
    pub location: Option<LocationDetail>,
    pub reviews: Vec<ReviewDetail>,
}

pub async fn create_service(db: &DatabaseConnection, input: NewService) -> Result<service::Model, ServiceError> {
    service::validate_title(&input.title)?;
    service::validate_description(&input.description)?;
    let price = service::normalize_price(&input.price)?;
    user::Entity::find_by_id(input.user_id)
        .one(db)
        .await?
        .ok_or_else(|| ServiceError::not_found("user"))?;
    let category_ids = checked_category_ids(db, &input.category_ids).await?;

    let txn = db.begin().await?;
    let location_id = match input.location {
        Some(loc) => Some(insert_location(&txn, loc).await?.id),
        None => None,
    };
    let now = Utc::now();
    let created = service::ActiveModel {
        user_id: Set(input.user_id),
        location_id: Set(location_id),
        title: Set(input.title.trim().to_string()),
        description: Set(input.description.trim().to_string()),
        price: Set(price),
        photo: Set(input.photo),
        created_at: Set(now.into()),
        updated_at: Set(now.into()),
        ..Default::default()
    }
    .insert(&txn)
    .await?;
    link_categories(&txn, created.id, &category_ids).await?;
    txn.commit().await?;

    info!(service_id = created.id, user_id = created.user_id, categories = category_ids.len(), "service created");
    Ok(created)
}

pub async fn get_service_detail(db: &DatabaseConnection, id: i32) -> Result<ServiceDetail, ServiceError> {
    let svc = service::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| ServiceError::not_found("service"))?;

    let categories = svc
        .find_related(category::Entity)
        .order_by_asc(category::Column::Name)
        .all(db)
        .await?;

    let location = match svc.location_id {
        Some(location_id) => location::Entity::find_by_id(location_id)
            .find_also_related(state::Entity)
            .one(db)
            .await?
            .map(|(location, state)| LocationDetail { location, state }),
        None => None,
    };

    let reviews = review::Entity::find()
        .filter(review::Column::ServiceId.eq(svc.id))
        .order_by_desc(review::Column::CreatedAt)
        .order_by_desc(review::Column::Id)
        .find_also_related(user::Entity)
        .all(db)
        .await?
        .into_iter()
        .map(|(review, author)| ReviewDetail { review, author: author.map(|u| u.name) })
        .collect();

    let avg_score = average_scores(db, &[svc.id]).await?.remove(&svc.id);
    Ok(ServiceDetail { service: svc, avg_score, categories, location, reviews })
}

pub async fn update_service(db: &DatabaseConnection, id: i32, changes: ServiceChanges) -> Result<service::Model, ServiceError> {
    let current = service::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| ServiceError::not_found("service"))?;

    let mut am: service::ActiveModel = current.into();
    if let Some(title) = changes.title {
        service::validate_title(&title)?;
        am.title = Set(title.trim().to_string());
    }
    if let Some(description) = changes.description {
        service::validate_description(&description)?;
        am.description = Set(description.trim().to_string());
    }
    if let Some(price) = changes.price {
        am.price = Set(service::normalize_price(&price)?);
    }
    if let Some(photo) = changes.photo {
        am.photo = Set(Some(photo));
    }
    let category_ids = match changes.category_ids {
        Some(ids) => Some(checked_category_ids(db, &ids).await?),
        None => None,
    };

    let txn = db.begin().await?;
    if let Some(loc) = changes.location {
        am.location_id = Set(Some(insert_location(&txn, loc).await?.id));
    }
    if let Some(ids) = &category_ids {
        service_category::Entity::delete_many()
            .filter(service_category::Column::ServiceId.eq(id))
            .exec(&txn)
            .await?;
        link_categories(&txn, id, ids).await?;
    }
    am.updated_at = Set(Utc::now().into());
    let updated = am.update(&txn).await?;
    txn.commit().await?;

    info!(service_id = id, "service updated");
    Ok(updated)
}

/// Hard delete; reviews and category links cascade. Returns whether a row went away.
pub async fn delete_service(db: &DatabaseConnection, id: i32) -> Result<bool, ServiceError> {
    let res = service::Entity::delete_by_id(id)
        .exec(db)
        .await?;
    if res.rows_affected > 0 {
        info!(service_id = id, "service deleted");
    }
    Ok(res.rows_affected > 0)
}

/// Deduplicate and require every id to exist.
async fn checked_category_ids(db: &DatabaseConnection, ids: &[i32]) -> Result<Vec<i32>, ServiceError> {
    let wanted: BTreeSet<i32> = ids.iter().copied().collect();
    let wanted: Vec<i32> = wanted.into_iter().collect();
    let found = reference::existing_category_ids(db, &wanted).await?;
    if found.len() != wanted.len() {
        let missing: Vec<String> = wanted.iter().filter(|id| !found.contains(id)).map(|id| id.to_string()).collect();
        return Err(ServiceError::Validation(format!("unknown category ids: {}", missing.join(", "))));
    }
    Ok(wanted)
}

async fn insert_location(txn: &DatabaseTransaction, loc: ServiceLocation) -> Result<location::Model, ServiceError> {
    let st = state::find_by_code(txn, &loc.state_code)
        .await?
        .ok_or_else(|| ServiceError::Validation(format!("unknown state code: {}", loc.state_code)))?;
    let created = location::create(
        txn,
        location::NewLocation {
            street_address: loc.street_address,
            city: loc.city,
            county: loc.county,
            zip: loc.zip,
            state_id: st.id,
            latitude: loc.latitude,
            longitude: loc.longitude,
        },
    )
    .await?;
    Ok(created)
}

async fn link_categories(txn: &DatabaseTransaction, service_id: i32, category_ids: &[i32]) -> Result<(), ServiceError> {
    if category_ids.is_empty() {
        return Ok(());
    }
    let links = category_ids
        .iter()
        .map(|&category_id| service_category::ActiveModel { service_id: Set(service_id), category_id: Set(category_id) });
    service_category::Entity::insert_many(links)
        .exec(txn)
        .await?;
    Ok(())
}
