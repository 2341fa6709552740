//! Patient entity model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;
use vitals_core::types::{DbId, Timestamp};

/// A patient row from the `patients` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Patient {
    pub id: DbId,
    pub name: String,
    pub age: i16,
    pub room_number: String,
    pub deleted_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for admitting a new patient.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreatePatient {
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    #[validate(range(min = 0, max = 120))]
    pub age: i16,
    #[validate(length(min = 1, max = 32))]
    pub room_number: String,
}

/// DTO for updating an existing patient. All fields are optional.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdatePatient {
    #[validate(length(min = 1, max = 100))]
    pub name: Option<String>,
    #[validate(range(min = 0, max = 120))]
    pub age: Option<i16>,
    #[validate(length(min = 1, max = 32))]
    pub room_number: Option<String>,
}
