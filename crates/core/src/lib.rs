//! Core business logic for the awards portal.

pub mod services;

pub use services::*;
