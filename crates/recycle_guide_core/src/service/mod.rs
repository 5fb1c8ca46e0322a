//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate document store calls into guide use-case APIs.
//! - Keep controller/CLI layers decoupled from storage details.

pub mod guide_service;
