// BPTracker API lib.rs
//
// HTTP surface of the tracker: routes, handlers, public entities and the
// OpenAPI document.

pub mod api;
pub mod config;
pub mod entities;
pub mod openapi;

use axum::Router;

use crate::config::ApiConfig;

/// Create the application router from configuration
pub fn create_application(config: &ApiConfig) -> Router {
    api::create_app(config)
}
