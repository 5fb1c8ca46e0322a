//! Domain model for the recycling guide.
//!
//! # Responsibility
//! - Define the request shape callers use to add guides.
//! - Keep guideline validation next to the data it guards.
//!
//! # Invariants
//! - Materials and items are identified by name; there are no numeric IDs.

pub mod guide;
