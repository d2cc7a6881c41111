//! Patient models.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Gender {
    Male,
    Female,
    Other,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum PatientStatus {
    Active,
    Inactive,
}

/// A clinic patient.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Patient {
    /// Full name
    pub name: String,
    /// Age in years
    pub age: u8,
    pub gender: Gender,
    /// Contact phone
    pub phone: String,
    /// Contact email
    pub email: String,
    /// Postal address
    pub address: String,
    /// ABO/Rh blood group (e.g., "O+")
    pub blood_group: String,
    pub status: PatientStatus,
    /// Creation timestamp
    #[serde(default)]
    pub created_at: String,
    /// Seed run that produced this record
    #[serde(default)]
    pub seed_run_id: String,
}
