//! Domain model for the to-do collections.
//!
//! # Responsibility
//! - Define the canonical task and project records persisted by core.
//! - Own id issuing and create-time validation rules.
//!
//! # Invariants
//! - Ids are unique within their own collection and never reused.
//! - Records are replaced whole; there is no field-level patching.

pub mod id;
pub mod project;
pub mod task;
pub mod validation;
