//! Workboard: project, task and employee management over a REST API.
//!
//! Layers, leaves first: [`models`] (entities), [`db`] (SQLite repositories),
//! [`services`] (validation and transactions), [`api`] (axum router).

pub mod api;
pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod services;
