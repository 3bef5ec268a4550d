//! Database layer for data persistence and access.
//!
//! This module implements the data access layer using SQLx with PostgreSQL,
//! following the repository pattern: API handlers call repositories
//! ([`handlers`]), repositories run queries and return record structs
//! ([`models`]), and database failures are categorized by [`errors`].
//!
//! All concurrency correctness lives here: the confirmation path relies on a
//! single conditional `UPDATE` (see
//! [`handlers::BloodRequests::try_confirm_unit`]) instead of any
//! application-level locking.
//!
//! Migrations are managed by SQLx and located in the `migrations/`
//! directory; [`crate::migrator`] provides access to the migrator.

pub mod errors;
pub mod handlers;
pub mod models;
