pub mod errors;
pub mod db;
pub mod state;
pub mod user;
pub mod location;
pub mod category;
pub mod service;
pub mod service_category;
pub mod review;

#[cfg(test)]
mod tests;
