//! Shiftwise Core
//!
//! Core types and abstractions for the Shiftwise AI schedule generator client.
//!
//! This crate contains:
//! - Domain types: Core business entities (JobStatus, GenerationRequest, ScheduleResult, etc.)
//! - DTOs: Data transfer objects matching the AI-scheduler REST contracts
//! - Wizard: The four-step form that accumulates a generation request

pub mod domain;
pub mod dto;
pub mod wizard;
