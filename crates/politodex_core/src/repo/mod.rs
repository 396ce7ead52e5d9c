//! Contact persistence.
//!
//! # Responsibility
//! - Own the ordered in-memory contact sequence.
//! - Mirror it to one key-value storage slot after every mutation.
//!
//! # Invariants
//! - Storage failures never escape `load`/`add`/`update`; they are logged.

pub mod contact_store;
