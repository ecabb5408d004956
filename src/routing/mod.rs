//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming Request (method, path)
//!     → router.rs (ordered table scan)
//!     → matcher.rs (segment-wise pattern match, parameter capture)
//!     → Return: RouteMatch, MethodNotAllowed or NotFound
//! ```
//!
//! # Design Decisions
//! - Routes declared explicitly at startup, immutable at runtime
//! - No regex in hot path
//! - Deterministic: same input always matches same route
//! - First match wins (ordered by declaration)

pub mod matcher;
pub mod router;

pub use matcher::PathPattern;
pub use router::{Endpoint, Route, RouteMatch, RouteResult, RoutingTable};
