pub mod errors;
pub mod extract;
pub mod http_client;
pub mod models;
pub mod tracing;
