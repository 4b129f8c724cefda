pub mod errors;
pub mod extract;
pub mod handlers;
pub mod metrics;
pub mod openapi;
pub mod routes;
pub mod startup;
pub mod state;
pub mod validation;

pub use startup::run;
