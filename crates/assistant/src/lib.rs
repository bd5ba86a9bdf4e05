pub mod models;
pub mod insights;
mod repository;
pub mod service;
pub mod handler;
