//! DMS Access — scope resolution and permission orchestration.
//!
//! This crate answers one question: what level of access does an actor
//! have over a protected resource? [`PermissionChecker`] is the pure
//! resolution algorithm over in-memory relation snapshots;
//! [`PermissionService`] bridges it to persisted data through the
//! `dms-core` repository traits; [`AccessGate`] is the surface the HTTP
//! middleware consumes.

mod checker;
mod error;
mod gate;
mod service;

pub use checker::PermissionChecker;
pub use error::AccessError;
pub use gate::{AccessDecision, AccessGate};
pub use service::{
    AssignResourceInput, AssignRoleInput, CheckPermissionInput, PermissionService,
};
