//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&PgPool` as the first argument.

pub mod patient_repo;
pub mod vital_sign_repo;

pub use patient_repo::PatientRepo;
pub use vital_sign_repo::VitalSignRepo;
