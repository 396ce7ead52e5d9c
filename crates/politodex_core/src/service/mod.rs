//! Directory use-case services.
//!
//! # Responsibility
//! - Orchestrate store mutations, photo resolution and re-rendering.
//! - Keep UI/FFI layers decoupled from storage details.

pub mod directory_service;
pub mod photo;
