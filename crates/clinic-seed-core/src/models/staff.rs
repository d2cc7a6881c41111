//! Staff identity models.

use serde::{Deserialize, Serialize};

/// Role recorded on a staff profile.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum StaffRole {
    #[serde(alias = "Doctor")]
    Doctor,
    #[serde(alias = "Receptionist")]
    Receptionist,
}

impl StaffRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            StaffRole::Doctor => "doctor",
            StaffRole::Receptionist => "receptionist",
        }
    }
}

/// A doctor or receptionist profile from `staffData`.
///
/// Created by the sign-up flow, never by the seed run.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct StaffIdentity {
    /// Store-assigned id
    #[serde(skip)]
    pub id: String,
    /// Login email as entered at sign-up (case may vary)
    pub email: String,
    /// Display name
    pub name: String,
    /// Doctor or receptionist
    pub role: StaffRole,
    /// Doctor's specialization
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub specialization: Option<String>,
    /// Contact phone
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

impl StaffIdentity {
    /// Create a profile with required fields (id assigned on insert).
    pub fn new(email: String, name: String, role: StaffRole) -> Self {
        Self {
            id: String::new(),
            email,
            name,
            role,
            specialization: None,
            phone: None,
        }
    }

    pub fn is_doctor(&self) -> bool {
        self.role == StaffRole::Doctor
    }
}
