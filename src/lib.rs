//! Backend-agnostic filter compilation and paginated document search.
//!
//! Callers describe what they want as a [`models::Filter`] (or free text),
//! the [`search::SearchService`] compiles it into a boolean query, runs it
//! through a [`search::SearchExecutor`] and returns a typed
//! [`search::PagedResponse`].

pub mod config;
pub mod error;
pub mod metrics;
pub mod models;
pub mod search;

pub use error::{AppError, Result};
