//! HTTP server.

mod listener;

pub use listener::{HttpServer, ServerError};
