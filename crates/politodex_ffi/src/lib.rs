//! Flutter bridge for the Politodex contact directory.

pub mod api;
