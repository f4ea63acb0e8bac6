//! Core types and trait definitions for the user resource service.
//!
//! This crate has no HTTP or database dependencies.
//! The store backend and the REST layer both depend on it.

pub mod error;
pub mod schema;
pub mod service;
pub mod store;
pub mod user;

pub use error::{Error, Result};
