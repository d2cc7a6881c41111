//! Medicine inventory models.

use serde::{Deserialize, Serialize};

/// A medicine stocked by the clinic pharmacy.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Medicine {
    /// Brand or generic name
    pub name: String,
    /// Therapeutic category (e.g., "Analgesic")
    pub category: String,
    /// Strength (e.g., "500mg")
    pub strength: String,
    /// Dosage form (e.g., "Tablet", "Syrup")
    pub form: String,
    /// Units in stock
    pub stock: u32,
    /// Price per unit, whole currency units
    pub unit_price: u64,
    /// Expiry date (YYYY-MM-DD)
    pub expiry_date: String,
    pub manufacturer: String,
    /// Creation timestamp
    #[serde(default)]
    pub created_at: String,
    /// Seed run that produced this record
    #[serde(default)]
    pub seed_run_id: String,
}

impl Medicine {
    /// Display label used on prescriptions and invoices.
    pub fn label(&self) -> String {
        format!("{} {}", self.name, self.strength)
    }

    /// Tablets and capsules are dispensed per dose; other forms by the pack.
    pub fn dispensed_per_dose(&self) -> bool {
        matches!(
            self.form.to_ascii_lowercase().as_str(),
            "tablet" | "capsule"
        )
    }

    /// Units to dispense for a course of `doses` doses.
    pub fn units_for_course(&self, doses: u32) -> u32 {
        if self.dispensed_per_dose() {
            doses
        } else {
            1
        }
    }
}
