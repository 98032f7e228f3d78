//! Request-facing protections.
//!
//! # Data Flow
//! ```text
//! Incoming request:
//!     → cors.rs (origin check, preflight answers)
//!     → limits.rs (body size cap)
//!     → Pass to handlers
//! ```

pub mod cors;
pub mod limits;

pub use cors::cors_layer;
