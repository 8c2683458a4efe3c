pub mod app;
pub mod auth;
pub mod chat;
pub mod cli;
pub mod config;
pub mod error;
pub mod handlers;
pub mod mail;
pub mod middleware;
pub mod models;
pub mod payments;
pub mod query;
pub mod zerodb;

pub use app::{router, AppState};
