pub mod models;
pub mod query;
mod repository;
mod dashboard_repository;
pub mod service;
pub mod handler;

pub use query::QueryEngine;
