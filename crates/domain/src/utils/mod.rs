//! Domain utilities

pub mod payload;
