//! Core domain types
//!
//! This module contains the core domain structures used across Shiftwise crates.
//! These types represent the fundamental business entities and are shared between
//! the HTTP client (wire format), the scheduler (job lifecycle) and the CLI (display).

pub mod availability;
pub mod job;
pub mod request;
pub mod schedule;
