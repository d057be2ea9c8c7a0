//! Core business logic for flashpoll.

pub mod services;

pub use services::*;
