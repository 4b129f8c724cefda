use std::str::FromStr;

use chrono::Utc;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use sea_orm::{entity::prelude::*, ConnectionTrait, Set};
use serde::{Deserialize, Serialize};

use crate::{errors, service, state};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "location")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub street_address: String,
    pub city: String,
    pub county: Option<String>,
    pub zip: String,
    pub state_id: i32,
    /// Decimal degrees, kept as text.
    pub latitude: String,
    pub longitude: String,
    /// Trig terms of the coordinates in radians, written on insert.
    #[serde(skip)]
    pub lat_sin: f64,
    #[serde(skip)]
    pub lat_cos: f64,
    #[serde(skip)]
    pub lng_sin: f64,
    #[serde(skip)]
    pub lng_cos: f64,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {
    State,
    Service,
}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::State => Entity::belongs_to(state::Entity)
                .from(Column::StateId)
                .to(state::Column::Id)
                .into(),
            Relation::Service => Entity::has_many(service::Entity).into(),
        }
    }
}

impl Related<state::Entity> for Entity {
    fn to() -> RelationDef { Relation::State.def() }
}

impl Related<service::Entity> for Entity {
    fn to() -> RelationDef { Relation::Service.def() }
}

impl ActiveModelBehavior for ActiveModel {}

/// Parse a coordinate and check it lies in `[-bound, bound]`.
pub fn parse_coordinate(raw: &str, bound: i64) -> Result<Decimal, errors::ModelError> {
    let value = Decimal::from_str(raw.trim())
        .map_err(|_| errors::ModelError::Validation(format!("coordinate '{}' is not a number", raw)))?;
    let bound = Decimal::from(bound);
    if value < -bound || value > bound {
        return Err(errors::ModelError::Validation(format!("coordinate {} out of range", value)));
    }
    Ok(value)
}

pub fn parse_latitude(raw: &str) -> Result<Decimal, errors::ModelError> { parse_coordinate(raw, 90) }

pub fn parse_longitude(raw: &str) -> Result<Decimal, errors::ModelError> { parse_coordinate(raw, 180) }

fn radians(degrees: Decimal) -> Result<f64, errors::ModelError> {
    degrees
        .to_f64()
        .map(f64::to_radians)
        .ok_or_else(|| errors::ModelError::Validation(format!("coordinate {} is not representable", degrees)))
}

/// Input for a new location row.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct NewLocation {
    pub street_address: String,
    pub city: String,
    pub county: Option<String>,
    pub zip: String,
    pub state_id: i32,
    pub latitude: String,
    pub longitude: String,
}

pub async fn create<C: ConnectionTrait>(db: &C, input: NewLocation) -> Result<Model, errors::ModelError> {
    if input.street_address.trim().is_empty() { return Err(errors::ModelError::Validation("street address required".into())); }
    if input.city.trim().is_empty() { return Err(errors::ModelError::Validation("city required".into())); }
    if input.zip.trim().is_empty() { return Err(errors::ModelError::Validation("zip required".into())); }
    let lat = parse_latitude(&input.latitude)?;
    let lng = parse_longitude(&input.longitude)?;
    let (lat_sin, lat_cos) = radians(lat)?.sin_cos();
    let (lng_sin, lng_cos) = radians(lng)?.sin_cos();
    let am = ActiveModel {
        street_address: Set(input.street_address.trim().to_string()),
        city: Set(input.city.trim().to_string()),
        county: Set(input.county.map(|c| c.trim().to_string()).filter(|c| !c.is_empty())),
        zip: Set(input.zip.trim().to_string()),
        state_id: Set(input.state_id),
        latitude: Set(lat.normalize().to_string()),
        longitude: Set(lng.normalize().to_string()),
        lat_sin: Set(lat_sin),
        lat_cos: Set(lat_cos),
        lng_sin: Set(lng_sin),
        lng_cos: Set(lng_cos),
        created_at: Set(Utc::now().into()),
        ..Default::default()
    };
    am.insert(db).await.map_err(|e| errors::ModelError::Db(e.to_string()))
}
