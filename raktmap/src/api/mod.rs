//! API layer for HTTP request handling and data models.
//!
//! - **[`handlers`]**: Axum route handlers for all endpoints
//! - **[`models`]**: Request/response data structures (the wire contract)
//!
//! Endpoints:
//!
//! - `GET  /api/bloodrequest/{id}`: request document or closed view
//! - `POST /api/bloodrequest`: create a request (hospital tooling)
//! - `POST /api/bloodrequest/confirm`, `POST /api/save-location`: donor
//!   confirmation (two historical paths, one handler)

pub mod handlers;
pub mod models;
