//! Search/paginate engine over the service directory.
//!
//! Filters are turned into [`filter::Predicate`]s, each of which becomes an
//! independent sub-condition AND-ed onto the base query. Rows are ordered by
//! `created_at DESC, id DESC`, paginated, and only then decorated with their
//! average review score.

pub mod engine;
pub mod filter;
pub mod geo;

pub use engine::{list_user_services, search_services, ScoredService};
pub use filter::{Predicate, ServiceSearch};
pub use geo::GeoFilter;

#[cfg(test)]
mod engine_tests;
