//! Data Transfer Objects for the AI-scheduler REST API
//!
//! DTOs mirror the request and response bodies exchanged with the backend.
//! Field names are camelCase on the wire.

pub mod availability;
pub mod job;
pub mod publish;
