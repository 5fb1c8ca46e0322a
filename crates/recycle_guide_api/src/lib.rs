//! Request-facing controller for the recycling guide.
//!
//! # Responsibility
//! - Expose one function per route over `GuideService`.
//! - Map guide results to status codes and response bodies.
//!
//! # Invariants
//! - Controller functions never panic; every outcome becomes a response.
//! - Error bodies always carry the stable error code.

pub mod controller;

pub use controller::{ApiResponse, ErrorBody, GuideController, INVALID_FIELD_CODE};
