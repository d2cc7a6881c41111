//! Prescription models.

use serde::{Deserialize, Serialize};

/// One medicine line on a prescription.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PrescribedMedicine {
    /// Medicine document id
    pub medicine_id: String,
    /// Medicine label (name and strength)
    pub name: String,
    /// Amount per dose (e.g., "1 tablet")
    pub dosage: String,
    /// Dosing schedule (e.g., "Twice daily")
    pub frequency: String,
    /// Course length (e.g., "5 days")
    pub duration: String,
    pub instructions: String,
    /// Units dispensed for the whole course (packs for non-solid forms)
    #[serde(default)]
    pub quantity: u32,
}

/// Vitals recorded at the visit.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Vitals {
    /// Systolic/diastolic in mmHg (e.g., "120/80")
    pub blood_pressure: String,
    /// Beats per minute
    pub pulse: u32,
    /// Degrees Fahrenheit
    pub temperature: f64,
    /// Kilograms
    pub weight: f64,
}

/// A doctor's prescription for one visit.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Prescription {
    /// Patient document id
    pub patient_id: String,
    pub patient_name: String,
    /// Doctor staff id
    pub doctor_id: String,
    pub doctor_name: String,
    /// Appointment the prescription was written at
    pub appointment_id: String,
    /// Visit date (YYYY-MM-DD)
    pub date: String,
    pub diagnosis: String,
    pub medicines: Vec<PrescribedMedicine>,
    pub vitals: Vitals,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    /// Creation timestamp
    #[serde(default)]
    pub created_at: String,
    /// Seed run that produced this record
    #[serde(default)]
    pub seed_run_id: String,
}
