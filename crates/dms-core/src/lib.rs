//! DMS Core — domain models, validation, and repository traits shared
//! across the dealership management backend.

pub mod error;
pub mod models;
pub mod repository;
