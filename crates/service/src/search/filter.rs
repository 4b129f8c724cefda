use sea_orm::sea_query::{Expr, Query};
use sea_orm::{ColumnTrait, Condition, IdenStatic};

use models::{category, location, service, service_category, state};

use super::geo::GeoFilter;
use crate::pagination::Pagination;

/// Raw, already-validated search input.
#[derive(Clone, Debug, Default)]
pub struct ServiceSearch {
    pub text: Option<String>,
    pub categories: Vec<String>,
    pub geo: Option<GeoFilter>,
    pub state_code: Option<String>,
    pub pagination: Pagination,
}

/// One narrowing step applied to the service query.
#[derive(Clone, Debug, PartialEq)]
pub enum Predicate {
    /// Case-insensitive substring of title or description.
    Text(String),
    /// Has at least one category with one of these names.
    Categories(Vec<String>),
    WithinRadius(GeoFilter),
    /// Location's state code, exact match.
    StateCode(String),
}

impl ServiceSearch {
    /// Predicates for the filters that are actually set. Blank text, blank
    /// category names and a blank state code are treated as absent.
    pub fn predicates(&self) -> Vec<Predicate> {
        let mut out = Vec::new();
        if let Some(text) = self.text.as_deref().filter(|t| !t.is_empty()) {
            out.push(Predicate::Text(text.to_string()));
        }
        let names: Vec<String> = self
            .categories
            .iter()
            .map(|n| n.trim())
            .filter(|n| !n.is_empty())
            .map(str::to_string)
            .collect();
        if !names.is_empty() {
            out.push(Predicate::Categories(names));
        }
        if let Some(geo) = self.geo {
            out.push(Predicate::WithinRadius(geo));
        }
        if let Some(code) = self.state_code.as_deref().filter(|c| !c.is_empty()) {
            out.push(Predicate::StateCode(code.to_string()));
        }
        out
    }
}

/// Escape LIKE metacharacters so the term matches literally.
pub fn escape_like(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len());
    for ch in term.chars() {
        if matches!(ch, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped
}

/// Both sides go through the store's `LOWER()` so the term and the column
/// fold case the same way on every backend.
pub fn text_condition(term: &str) -> Condition {
    let pattern = format!("%{}%", escape_like(term));
    let like = |column: service::Column| {
        Expr::cust_with_values(
            format!(r#"LOWER("service"."{}") LIKE LOWER(?) ESCAPE '\'"#, column.as_str()),
            [pattern.clone()],
        )
    };
    Condition::any()
        .add(like(service::Column::Title))
        .add(like(service::Column::Description))
}

/// `service.id IN (SELECT service_id ...)`; the subquery keeps rows unique
/// where a join would repeat a service once per matching category.
pub fn categories_condition(names: &[String]) -> Condition {
    let ids = Query::select()
        .column((service_category::Entity, service_category::Column::ServiceId))
        .from(service_category::Entity)
        .inner_join(
            category::Entity,
            Expr::col((category::Entity, category::Column::Id))
                .equals((service_category::Entity, service_category::Column::CategoryId)),
        )
        .and_where(Expr::col((category::Entity, category::Column::Name)).is_in(names.iter().cloned()))
        .to_owned();
    Condition::all().add(service::Column::Id.in_subquery(ids))
}

pub fn state_code_condition(code: &str) -> Condition {
    let location_ids = Query::select()
        .column((location::Entity, location::Column::Id))
        .from(location::Entity)
        .inner_join(
            state::Entity,
            Expr::col((state::Entity, state::Column::Id))
                .equals((location::Entity, location::Column::StateId)),
        )
        .and_where(Expr::col((state::Entity, state::Column::Code)).eq(code))
        .to_owned();
    Condition::all().add(service::Column::LocationId.in_subquery(location_ids))
}

/// `service.location_id IN (SELECT id FROM location WHERE ...)` with the
/// spherical law of cosines evaluated by the store over the stored trig
/// terms. The angle is compared by its cosine:
/// `sin φ0 sin φ + cos φ0 cos φ (cos λ cos λ0 + sin λ sin λ0) >= cos(r / R)`.
pub fn within_radius_condition(geo: &GeoFilter) -> Condition {
    let (lat_sin, lat_cos) = geo.latitude.to_radians().sin_cos();
    let (lng_sin, lng_cos) = geo.longitude.to_radians().sin_cos();
    let inside = Expr::cust_with_values(
        concat!(
            r#"? * "location"."lat_sin" + ? * "location"."lat_cos" * "#,
            r#"("location"."lng_cos" * ? + "location"."lng_sin" * ?) >= ?"#,
        ),
        [lat_sin, lat_cos, lng_cos, lng_sin, geo.min_cos_angle()],
    );
    let location_ids = Query::select()
        .column((location::Entity, location::Column::Id))
        .from(location::Entity)
        .and_where(inside)
        .to_owned();
    Condition::all().add(service::Column::LocationId.in_subquery(location_ids))
}
