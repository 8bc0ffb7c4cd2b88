//! Use-case facade consumed by the presentation layer.
//!
//! # Responsibility
//! - Bundle both stores over one persistence adapter.
//! - Keep UI callers decoupled from storage wiring.

pub mod todo_service;
