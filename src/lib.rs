#![doc = "The `tasktrack` library crate."]
#![doc = ""]
#![doc = "Domain models, stores, token-based authentication, ownership checks, services"]
#![doc = "and HTTP routes for the task tracking API. The binary (`main.rs`) only loads"]
#![doc = "configuration, picks a store and starts the server."]

pub mod auth;
pub mod config;
pub mod error;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;
pub mod store;

pub use crate::error::AppError;
pub use crate::state::AppState;
