pub mod access;
pub mod auth;
pub mod catalog;
pub mod cli;
pub mod config;
pub mod database;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod routes;
pub mod scope;
pub mod state;
pub mod types;

pub use routes::app;
pub use state::AppState;
