//! Contains graph implementations that property paths can be evaluated against.

pub mod memory;
