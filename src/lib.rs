pub mod auth;
pub mod cache;
pub mod config;
pub mod csrf;
pub mod db;
pub mod entities;
pub mod errors;
pub mod forms;
pub mod media;
pub mod models;
pub mod pagination;
pub mod services;
pub mod templates;
pub mod urls;
pub mod views;
