//! Core business logic for pic4pick.

pub mod services;

pub use services::*;
