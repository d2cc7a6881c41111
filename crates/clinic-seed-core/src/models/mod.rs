//! Domain models for the clinic collections.
//!
//! Field names serialize in camelCase, the names the web front-end reads.

mod appointment;
mod invoice;
mod medicine;
mod patient;
mod prescription;
mod staff;

pub use appointment::*;
pub use invoice::*;
pub use medicine::*;
pub use patient::*;
pub use prescription::*;
pub use staff::*;

/// Collection names in the document store.
pub mod collections {
    pub const STAFF: &str = "staffData";
    pub const PATIENTS: &str = "patients";
    pub const MEDICINES: &str = "medicines";
    pub const APPOINTMENTS: &str = "appointments";
    pub const PRESCRIPTIONS: &str = "prescriptions";
    pub const INVOICES: &str = "invoices";

    /// Every collection the inspection utilities know about.
    pub const ALL: [&str; 6] = [STAFF, PATIENTS, MEDICINES, APPOINTMENTS, PRESCRIPTIONS, INVOICES];

    /// Collections a seed run writes to.
    pub const SEEDED: [&str; 5] = [PATIENTS, MEDICINES, APPOINTMENTS, PRESCRIPTIONS, INVOICES];
}

/// A generated record paired with the id the store assigned to it.
#[derive(Debug, Clone, PartialEq)]
pub struct Seeded<T> {
    pub id: String,
    pub record: T,
}

impl<T> Seeded<T> {
    pub fn new(id: String, record: T) -> Self {
        Self { id, record }
    }
}
