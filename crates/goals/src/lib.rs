pub mod models;
mod repository;
mod debt_repository;
pub mod service;
pub mod debt_service;
pub mod handler;
