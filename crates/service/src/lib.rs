//! Service layer providing the directory's business operations on top of models.
//! - `search` holds the filtered, paginated listing engine.
//! - `catalog`, `reviews`, `users` and `reference` cover the remaining CRUD and lookups.
//! - Reuses validation and entity definitions in the `models` crate.

pub mod errors;
pub mod pagination;
pub mod search;
pub mod catalog;
pub mod reviews;
pub mod reference;
pub mod users;
#[cfg(test)]
pub mod test_support;
