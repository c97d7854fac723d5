//! Application service layer - config, quotes, route estimates, batch reports

pub mod app;
pub mod config;
pub mod repository;
