//! Request-level validation rules.
//!
//! Search parameters arrive as raw strings so a bad number can be reported
//! against its own field instead of failing the whole query string.

use std::str::FromStr;

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use sea_orm::DatabaseConnection;
use serde::Deserialize;
use utoipa::IntoParams;
use validator::{ValidationError, ValidationErrors};

use service::pagination::Pagination;
use service::reference;
use service::search::{GeoFilter, ServiceSearch};

use crate::errors::{field_error, AppError, ValidationFailed};

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct SearchParams {
    /// Free-text term matched against title and description.
    pub s: Option<String>,
    /// Category names; a service matches if it has any of them.
    #[serde(default, rename = "categories[]", alias = "categories")]
    pub categories: Vec<String>,
    pub lat: Option<String>,
    pub lng: Option<String>,
    /// Radius in kilometres.
    pub distance: Option<String>,
    /// Two-letter state code, exact match.
    pub state_code: Option<String>,
    pub page: Option<String>,
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PageParams {
    pub page: Option<String>,
}

/// Validate search input and turn it into engine parameters.
pub async fn validate_search(db: &DatabaseConnection, params: &SearchParams) -> Result<ServiceSearch, AppError> {
    let mut errors = ValidationErrors::new();
    let search = parse_search(params, &mut errors);
    if let Some(code) = search.state_code.as_deref() {
        if !reference::state_code_exists(db, code).await? {
            errors.add("state_code", field_error("exists", "The selected state code is invalid."));
        }
    }
    if !errors.is_empty() {
        return Err(ValidationFailed(errors).into());
    }
    Ok(search)
}

pub fn validate_page(params: &PageParams) -> Result<Pagination, AppError> {
    let mut errors = ValidationErrors::new();
    let pagination = parse_page(params.page.as_deref(), &mut errors);
    if !errors.is_empty() {
        return Err(ValidationFailed(errors).into());
    }
    Ok(pagination)
}

/// Everything that can be checked without the database.
pub fn parse_search(params: &SearchParams, errors: &mut ValidationErrors) -> ServiceSearch {
    let text = params.s.as_deref().map(str::trim).filter(|s| !s.is_empty()).map(str::to_string);
    let categories = params
        .categories
        .iter()
        .map(|c| c.trim())
        .filter(|c| !c.is_empty())
        .map(str::to_string)
        .collect();
    let geo = parse_geo(params, errors);
    let state_code = match params.state_code.as_deref().map(str::trim) {
        Some("") => {
            errors.add("state_code", field_error("required", "The state code field is required."));
            None
        }
        Some(code) => Some(code.to_string()),
        None => None,
    };
    let pagination = parse_page(params.page.as_deref(), errors);
    ServiceSearch { text, categories, geo, state_code, pagination }
}

fn parse_page(raw: Option<&str>, errors: &mut ValidationErrors) -> Pagination {
    match raw.map(str::trim).filter(|p| !p.is_empty()) {
        None => Pagination::default(),
        Some(p) => match p.parse::<i64>() {
            Ok(n) => Pagination::new(n.max(1) as u64),
            Err(_) => {
                errors.add("page", field_error("numeric", "The page must be a number."));
                Pagination::default()
            }
        },
    }
}

/// lat, lng and distance are all-or-nothing.
fn parse_geo(params: &SearchParams, errors: &mut ValidationErrors) -> Option<GeoFilter> {
    let fields: [(&'static str, Option<&str>); 3] = [
        ("lat", params.lat.as_deref()),
        ("lng", params.lng.as_deref()),
        ("distance", params.distance.as_deref()),
    ];
    let present: Vec<&str> = fields
        .iter()
        .filter(|(_, v)| v.is_some_and(|v| !v.trim().is_empty()))
        .map(|(name, _)| *name)
        .collect();
    if present.is_empty() {
        return None;
    }

    let mut values = [0.0f64; 3];
    let mut ok = true;
    for (i, (name, raw)) in fields.iter().enumerate() {
        let raw = raw.map(str::trim).filter(|v| !v.is_empty());
        let Some(raw) = raw else {
            let others: Vec<&str> = present.iter().copied().filter(|p| p != name).collect();
            errors.add(*name, field_error("required_with", format!("The {} field is required when {} is present.", name, others.join(" / "))));
            ok = false;
            continue;
        };
        match check_number(*name, raw) {
            Ok(v) => values[i] = v,
            Err(e) => {
                errors.add(*name, e);
                ok = false;
            }
        }
    }
    ok.then(|| GeoFilter { latitude: values[0], longitude: values[1], radius_km: values[2] })
}

fn check_number(field: &'static str, raw: &str) -> Result<f64, ValidationError> {
    let value = Decimal::from_str(raw)
        .ok()
        .and_then(|d| d.to_f64().map(|f| (d, f)))
        .ok_or_else(|| field_error("numeric", format!("The {} must be a number.", field)));
    let (decimal, float) = value?;
    let out_of_range = |min: i64, max: i64| {
        field_error("between", format!("The {} must be between {} and {}.", field, min, max))
    };
    match field {
        "lat" if decimal.abs() > Decimal::from(90) => Err(out_of_range(-90, 90)),
        "lng" if decimal.abs() > Decimal::from(180) => Err(out_of_range(-180, 180)),
        "distance" if decimal.is_sign_negative() && !decimal.is_zero() => {
            Err(field_error("min", format!("The {} must be at least 0.", field)))
        }
        _ => Ok(float),
    }
}

/// Body rule: non-negative decimal with at most two fraction digits.
pub fn validate_price(price: &str) -> Result<(), ValidationError> {
    models::service::normalize_price(price)
        .map(|_| ())
        .map_err(|_| field_error("price", "The price must be a non-negative amount with at most 2 decimal places."))
}

pub fn validate_latitude(lat: &str) -> Result<(), ValidationError> {
    models::location::parse_latitude(lat)
        .map(|_| ())
        .map_err(|_| field_error("latitude", "The latitude must be a number between -90 and 90."))
}

pub fn validate_longitude(lng: &str) -> Result<(), ValidationError> {
    models::location::parse_longitude(lng)
        .map(|_| ())
        .map_err(|_| field_error("longitude", "The longitude must be a number between -180 and 180."))
}
