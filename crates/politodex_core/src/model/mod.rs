//! Directory domain model.
//!
//! # Responsibility
//! - Define the persisted contact record shape.
//! - Define form submissions and the partial-update shape derived from them.
//!
//! # Invariants
//! - Every record carries a stable `ContactId`, even when restored from data
//!   written before ids existed.

pub mod contact;
pub mod form;
