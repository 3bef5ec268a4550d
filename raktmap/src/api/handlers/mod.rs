//! Axum route handlers.
//!
//! Handlers stay thin: they validate input, call repositories from
//! [`crate::db::handlers`], and shape wire responses from
//! [`crate::api::models`]. All failures flow through [`crate::errors::Error`]
//! and its `IntoResponse` implementation.

pub mod blood_requests;
