use crate::types::DbId;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: DbId },

    #[error("{field} must be between {min} and {max}, got {value}")]
    InvalidRange {
        field: &'static str,
        value: i32,
        min: i32,
        max: i32,
    },

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl CoreError {
    /// Shorthand for the "patient does not exist" case shared by the
    /// reading store, the simulator and the HTTP layer.
    pub fn patient_not_found(id: DbId) -> Self {
        CoreError::NotFound {
            entity: "Patient",
            id,
        }
    }
}
