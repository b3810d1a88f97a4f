//! PG Tracker HTTP surface
//!
//! Axum routing over the core registry/roster/ledger/reporting
//! operations. Handlers are thin: extract the verified principal, check
//! the capability table, lock the store, call core, map errors to
//! statuses.
//!
//! # Architecture
//!
//! - **Principal**: every route requires the trusted gateway headers
//!   carrying the already-verified `{subject, role}` pair
//! - **Mutations**: admin-gated through the permission matrix
//! - **Bulk sends**: dispatched as detached background jobs; the request
//!   returns `processing` immediately and the outcome lands in the
//!   activity log

pub mod auth;
pub mod error;
pub mod routes;
pub mod state;

pub use error::{ApiError, ApiResult};
pub use routes::router;
pub use state::AppState;
