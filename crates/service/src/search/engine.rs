use std::collections::HashMap;
use std::time::Instant;

use sea_orm::sea_query::{Alias, Expr, Func, SimpleExpr};
use sea_orm::{
    ColumnTrait, Condition, ConnectionTrait, DatabaseConnection, EntityTrait, ItemsAndPagesNumber, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Select,
};
use serde::Serialize;
use tracing::{debug, info};

use models::{review, service, user};

use super::filter::{self, Predicate, ServiceSearch};
use crate::errors::ServiceError;
use crate::pagination::{Page, Pagination};

/// A service row decorated with the mean of its review scores.
#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct ScoredService {
    #[serde(flatten)]
    pub service: service::Model,
    pub avg_score: Option<f64>,
}

/// Run a filtered search and return one page of scored services.
pub async fn search_services(db: &DatabaseConnection, search: &ServiceSearch) -> Result<Page<ScoredService>, ServiceError> {
    let started = Instant::now();
    let predicates = search.predicates();
    let mut condition = Condition::all();
    for predicate in &predicates {
        condition = condition.add(predicate_condition(predicate));
    }
    let page = paginate_scored(db, service::Entity::find().filter(condition), search.pagination).await?;
    info!(
        filters = predicates.len(),
        page = page.current_page,
        total = page.total,
        returned = page.items.len(),
        elapsed_ms = started.elapsed().as_millis() as u64,
        "service search"
    );
    Ok(page)
}

/// All services owned by `user_id`, with the same ordering and page size as search.
pub async fn list_user_services(db: &DatabaseConnection, user_id: i32, pagination: Pagination) -> Result<Page<ScoredService>, ServiceError> {
    user::Entity::find_by_id(user_id)
        .one(db)
        .await?
        .ok_or_else(|| ServiceError::not_found("user"))?;
    let query = service::Entity::find().filter(service::Column::UserId.eq(user_id));
    let page = paginate_scored(db, query, pagination).await?;
    info!(user_id, page = page.current_page, total = page.total, "user services");
    Ok(page)
}

fn predicate_condition(predicate: &Predicate) -> Condition {
    match predicate {
        Predicate::Text(term) => filter::text_condition(term),
        Predicate::Categories(names) => filter::categories_condition(names),
        Predicate::StateCode(code) => filter::state_code_condition(code),
        Predicate::WithinRadius(geo) => filter::within_radius_condition(geo),
    }
}

async fn paginate_scored(db: &DatabaseConnection, query: Select<service::Entity>, pagination: Pagination) -> Result<Page<ScoredService>, ServiceError> {
    let (index, per_page) = pagination.normalize();
    let paginator = query
        .order_by_desc(service::Column::CreatedAt)
        .order_by_desc(service::Column::Id)
        .paginate(db, per_page);
    let ItemsAndPagesNumber { number_of_items, number_of_pages } = paginator.num_items_and_pages().await?;
    // fetch_page multiplies the index by the page size; only existing pages get there
    if index >= number_of_pages {
        debug!(page = pagination.current_page(), number_of_pages, "page beyond the end");
        return Ok(Page::new(Vec::new(), pagination, number_of_items));
    }
    let rows = paginator.fetch_page(index).await?;

    let ids: Vec<i32> = rows.iter().map(|s| s.id).collect();
    let mut scores = average_scores(db, &ids).await?;
    let items = rows
        .into_iter()
        .map(|service| {
            let avg_score = scores.remove(&service.id);
            ScoredService { service, avg_score }
        })
        .collect();
    Ok(Page::new(items, pagination, number_of_items))
}

/// Mean review score per service, for the given ids only. Services without
/// reviews are absent from the map.
pub async fn average_scores<C: ConnectionTrait>(db: &C, service_ids: &[i32]) -> Result<HashMap<i32, f64>, ServiceError> {
    if service_ids.is_empty() {
        return Ok(HashMap::new());
    }
    let avg: SimpleExpr = Func::cast_as(
        Func::avg(Expr::col((review::Entity, review::Column::Score))),
        Alias::new("DOUBLE PRECISION"),
    )
    .into();
    let rows: Vec<(i32, f64)> = review::Entity::find()
        .select_only()
        .column(review::Column::ServiceId)
        .column_as(avg, "avg_score")
        .filter(review::Column::ServiceId.is_in(service_ids.to_vec()))
        .group_by(review::Column::ServiceId)
        .into_tuple()
        .all(db)
        .await?;
    Ok(rows.into_iter().collect())
}
