//! REST API for the Almanac event service.

mod handlers;
mod rest;

pub use handlers::*;
pub use rest::*;
