//! Campus Core — domain models, error taxonomy, permission catalog,
//! and repository trait definitions.

pub mod error;
pub mod models;
pub mod permissions;
pub mod repository;
pub mod roles;
pub mod tenancy;

pub use error::{CampusError, CampusResult};
