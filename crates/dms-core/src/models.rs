//! Domain models for the access-control subsystem.
//!
//! These are the core types shared across all crates. Constructors
//! enforce field invariants; invalid objects cannot be built.

pub mod entity_resource;
pub mod entity_role;
pub mod resource;
pub mod role;
pub mod role_resource;
pub mod scope;
