//! Shipping fee and route estimation domain

pub mod model;
pub mod repository;
pub mod service;
