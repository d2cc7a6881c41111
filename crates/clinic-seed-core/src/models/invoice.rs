//! Invoice models.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum InvoiceStatus {
    #[serde(alias = "paid")]
    Paid,
    #[serde(alias = "pending")]
    Pending,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum PaymentMethod {
    Cash,
    Card,
    #[serde(rename = "UPI")]
    Upi,
    Insurance,
}

/// A billed line.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceItem {
    pub description: String,
    pub quantity: u32,
    /// Whole currency units
    pub unit_price: u64,
    /// `quantity * unit_price`
    pub total: u64,
}

impl InvoiceItem {
    /// Create a line with its total computed.
    pub fn new(description: String, quantity: u32, unit_price: u64) -> Self {
        Self {
            description,
            quantity,
            unit_price,
            total: u64::from(quantity) * unit_price,
        }
    }
}

/// A bill for one visit.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Invoice {
    /// Human-facing number (e.g., "INV-20261018-0001")
    pub invoice_number: String,
    /// Patient document id
    pub patient_id: String,
    pub patient_name: String,
    /// Doctor staff id
    pub doctor_id: String,
    /// Receptionist staff id who raised the bill
    pub receptionist_id: String,
    /// Appointment being billed
    pub appointment_id: String,
    /// Visit date (YYYY-MM-DD)
    pub date: String,
    pub items: Vec<InvoiceItem>,
    /// Sum of `items[].total`
    pub total_amount: u64,
    pub status: InvoiceStatus,
    /// Present iff paid (RFC 3339)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_date: Option<String>,
    /// Present iff paid
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_method: Option<PaymentMethod>,
    /// Creation timestamp
    #[serde(default)]
    pub created_at: String,
    /// Seed run that produced this record
    #[serde(default)]
    pub seed_run_id: String,
}

impl Invoice {
    /// Sum of line totals.
    pub fn items_total(items: &[InvoiceItem]) -> u64 {
        items.iter().map(|item| item.total).sum()
    }

    /// Record payment; the only way payment metadata is set.
    pub fn settle(&mut self, payment_date: String, method: PaymentMethod) {
        self.status = InvoiceStatus::Paid;
        self.payment_date = Some(payment_date);
        self.payment_method = Some(method);
    }

    pub fn is_paid(&self) -> bool {
        self.status == InvoiceStatus::Paid
    }

    /// Line or invoice totals that do not add up.
    pub fn total_violations(&self) -> Vec<String> {
        let mut problems = Vec::new();

        for (i, item) in self.items.iter().enumerate() {
            let expected = u64::from(item.quantity) * item.unit_price;
            if item.total != expected {
                problems.push(format!(
                    "item {} total {} != quantity {} x unitPrice {}",
                    i, item.total, item.quantity, item.unit_price
                ));
            }
        }

        let sum = Self::items_total(&self.items);
        if self.total_amount != sum {
            problems.push(format!(
                "totalAmount {} != sum of items {}",
                self.total_amount, sum
            ));
        }

        problems
    }

    /// Payment fields that disagree with the status.
    pub fn payment_violation(&self) -> Option<String> {
        let has_payment = self.payment_date.is_some() && self.payment_method.is_some();
        let has_any_payment = self.payment_date.is_some() || self.payment_method.is_some();
        if self.is_paid() && !has_payment {
            Some("paid invoice missing paymentDate/paymentMethod".to_string())
        } else if !self.is_paid() && has_any_payment {
            Some("unpaid invoice carries payment metadata".to_string())
        } else {
            None
        }
    }

    /// Broken invariants, described for diagnostics. Empty when consistent.
    pub fn violations(&self) -> Vec<String> {
        let mut problems = self.total_violations();
        problems.extend(self.payment_violation());
        problems
    }
}
