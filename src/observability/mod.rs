//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! All subsystems produce:
//!     → logging.rs (structured log events via `tracing`)
//!     → metrics.rs (counters, histograms via `metrics`)
//!
//! Consumers:
//!     → stdout (human-readable or JSON lines)
//!     → Prometheus scrape endpoint (optional)
//! ```
//!
//! Request spans carry the `X-Request-ID`, so every log line emitted while
//! handling a request can be correlated.

pub mod logging;
pub mod metrics;
