//! HTTP middleware configuration.

pub mod cors;
pub mod session;

pub use cors::create_cors_layer;
pub use session::create_session_layer;
