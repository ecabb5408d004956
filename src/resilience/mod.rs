//! Resilience subsystem.
//!
//! # Data Flow
//! ```text
//! Request to datastore:
//!     → timeouts.rs (enforce the per-call deadline)
//!     → On failure: report immediately, no retry
//! ```
//!
//! # Design Decisions
//! - Timeouts are non-negotiable; every upstream call has a deadline
//! - A failed attempt is surfaced at once; callers own any retry policy

pub mod timeouts;

pub use timeouts::{with_deadline, DeadlineExceeded};
