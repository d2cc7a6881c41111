//! Appointment models.

use serde::{Deserialize, Serialize};

/// Appointment lifecycle status.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum AppointmentStatus {
    /// Booked, patient not yet arrived
    #[serde(alias = "scheduled")]
    Scheduled,
    /// Patient checked in at reception
    #[serde(alias = "waiting")]
    Waiting,
    /// With the doctor
    #[serde(rename = "In Progress", alias = "in-progress")]
    InProgress,
    /// Visit finished
    #[serde(alias = "completed")]
    Completed,
    #[serde(alias = "cancelled")]
    Cancelled,
}

impl AppointmentStatus {
    /// Whether the patient has been (or is being) seen by the doctor.
    pub fn implies_visit(&self) -> bool {
        matches!(self, AppointmentStatus::InProgress | AppointmentStatus::Completed)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AppointmentStatus::Scheduled => "Scheduled",
            AppointmentStatus::Waiting => "Waiting",
            AppointmentStatus::InProgress => "In Progress",
            AppointmentStatus::Completed => "Completed",
            AppointmentStatus::Cancelled => "Cancelled",
        }
    }
}

/// A patient's booking with a doctor.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Appointment {
    /// Patient document id
    pub patient_id: String,
    /// Patient name (denormalized for list views)
    pub patient_name: String,
    /// Doctor staff id
    pub doctor_id: String,
    /// Doctor display name
    pub doctor_name: String,
    /// Local calendar date (YYYY-MM-DD)
    pub date: String,
    /// Local wall-clock time (HH:MM)
    pub time: String,
    /// Full timestamp with UTC offset (RFC 3339). Empty on records the
    /// front-end wrote, which only carry `date` and `time`.
    #[serde(default)]
    pub scheduled_at: String,
    pub status: AppointmentStatus,
    /// Reason for visit
    pub reason: String,
    /// Queue token, issued for same-day appointments only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token_number: Option<u32>,
    /// Creation timestamp
    #[serde(default)]
    pub created_at: String,
    /// Seed run that produced this record
    #[serde(default)]
    pub seed_run_id: String,
}
