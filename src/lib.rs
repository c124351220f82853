pub mod auth;
pub mod category;
pub mod config;
pub mod database;
pub mod errors;
pub mod extractors;
pub mod openapi;
pub mod period;
pub mod report;
pub mod routes;
pub mod transaction;
