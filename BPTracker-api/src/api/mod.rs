pub mod handlers;
pub mod routes;

pub use routes::{create_app, create_router};
