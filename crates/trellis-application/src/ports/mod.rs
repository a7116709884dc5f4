//! Application ports
//!
//! Registries through which provider crates make their implementations
//! discoverable without a compile-time dependency from this crate.

pub mod registry;
