//! Domain layer for NetSentinel safe search
//!
//! Contains the filtering policy, result classification, moderation rules and
//! the value objects shared by every other crate. Pure logic only: nothing in
//! here performs I/O.

pub mod entities;
pub mod errors;
pub mod value_objects;

pub use entities::*;
pub use errors::DomainError;
pub use value_objects::*;
