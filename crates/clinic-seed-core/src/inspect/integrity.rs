//! Cross-collection consistency checks.

use std::collections::HashSet;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::generator::PLACEHOLDER_RECEPTIONIST_ID;
use crate::models::{collections, Appointment, Invoice, Prescription};
use crate::store::{Document, DocumentStore, StoreResult};

/// Category of an integrity problem.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum IssueKind {
    /// A reference to a document that does not exist
    DanglingReference,
    /// Line totals or invoice total do not add up
    InvoiceTotals,
    /// Payment fields disagree with the invoice status
    PaymentFields,
    /// The document does not match its collection's shape
    Undecodable,
}

/// One problem found in one document.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct IntegrityIssue {
    pub collection: String,
    pub id: String,
    pub kind: IssueKind,
    pub detail: String,
}

/// Result of a full integrity scan.
#[derive(Debug, Clone, Default, Serialize)]
pub struct IntegrityReport {
    /// Dependent documents examined
    pub checked: usize,
    pub issues: Vec<IntegrityIssue>,
}

impl IntegrityReport {
    pub fn is_clean(&self) -> bool {
        self.issues.is_empty()
    }

    /// Issues of one kind.
    pub fn of_kind(&self, kind: IssueKind) -> impl Iterator<Item = &IntegrityIssue> {
        self.issues.iter().filter(move |issue| issue.kind == kind)
    }

    /// Export to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    fn push(&mut self, collection: &str, id: &str, kind: IssueKind, detail: String) {
        self.issues.push(IntegrityIssue {
            collection: collection.to_string(),
            id: id.to_string(),
            kind,
            detail,
        });
    }
}

/// Ids present in each referenced collection.
struct KnownIds {
    staff: HashSet<String>,
    patients: HashSet<String>,
    medicines: HashSet<String>,
    appointments: HashSet<String>,
}

impl KnownIds {
    fn load<S: DocumentStore + ?Sized>(store: &S) -> StoreResult<Self> {
        let ids = |collection: &str| -> StoreResult<HashSet<String>> {
            Ok(store
                .scan(collection)?
                .into_iter()
                .map(|doc| doc.id)
                .collect())
        };
        Ok(Self {
            staff: ids(collections::STAFF)?,
            patients: ids(collections::PATIENTS)?,
            medicines: ids(collections::MEDICINES)?,
            appointments: ids(collections::APPOINTMENTS)?,
        })
    }
}

/// Collects dangling-reference issues for one document.
struct RefCheck<'r> {
    report: &'r mut IntegrityReport,
    collection: &'static str,
    id: String,
}

impl RefCheck<'_> {
    fn expect(&mut self, field: &str, value: &str, known: &HashSet<String>, target: &str) {
        if !known.contains(value) {
            self.report.push(
                self.collection,
                &self.id,
                IssueKind::DanglingReference,
                format!("{} {:?} not found in {}", field, value, target),
            );
        }
    }
}

fn decode_all<T: DeserializeOwned>(
    docs: Vec<Document>,
    collection: &str,
    report: &mut IntegrityReport,
) -> Vec<(String, T)> {
    let mut decoded = Vec::with_capacity(docs.len());
    for doc in docs {
        match doc.decode::<T>() {
            Ok(record) => decoded.push((doc.id, record)),
            Err(err) => report.push(collection, &doc.id, IssueKind::Undecodable, err.to_string()),
        }
    }
    decoded
}

/// Scan the dependent collections for broken references and invoice
/// invariant violations. Read-only.
pub fn check_integrity<S: DocumentStore + ?Sized>(store: &S) -> StoreResult<IntegrityReport> {
    let known = KnownIds::load(store)?;
    let mut report = IntegrityReport::default();

    let appointments = decode_all::<Appointment>(
        store.scan(collections::APPOINTMENTS)?,
        collections::APPOINTMENTS,
        &mut report,
    );
    let prescriptions = decode_all::<Prescription>(
        store.scan(collections::PRESCRIPTIONS)?,
        collections::PRESCRIPTIONS,
        &mut report,
    );
    let invoices = decode_all::<Invoice>(
        store.scan(collections::INVOICES)?,
        collections::INVOICES,
        &mut report,
    );
    report.checked = appointments.len() + prescriptions.len() + invoices.len();

    for (id, appt) in appointments {
        let mut check = RefCheck {
            report: &mut report,
            collection: collections::APPOINTMENTS,
            id,
        };
        check.expect("patientId", &appt.patient_id, &known.patients, collections::PATIENTS);
        check.expect("doctorId", &appt.doctor_id, &known.staff, collections::STAFF);
    }

    for (id, rx) in prescriptions {
        let mut check = RefCheck {
            report: &mut report,
            collection: collections::PRESCRIPTIONS,
            id,
        };
        check.expect("patientId", &rx.patient_id, &known.patients, collections::PATIENTS);
        check.expect("doctorId", &rx.doctor_id, &known.staff, collections::STAFF);
        check.expect(
            "appointmentId",
            &rx.appointment_id,
            &known.appointments,
            collections::APPOINTMENTS,
        );
        for line in &rx.medicines {
            check.expect(
                "medicineId",
                &line.medicine_id,
                &known.medicines,
                collections::MEDICINES,
            );
        }
    }

    for (id, invoice) in invoices {
        let mut check = RefCheck {
            report: &mut report,
            collection: collections::INVOICES,
            id: id.clone(),
        };
        check.expect("patientId", &invoice.patient_id, &known.patients, collections::PATIENTS);
        check.expect("doctorId", &invoice.doctor_id, &known.staff, collections::STAFF);
        check.expect(
            "appointmentId",
            &invoice.appointment_id,
            &known.appointments,
            collections::APPOINTMENTS,
        );
        if invoice.receptionist_id != PLACEHOLDER_RECEPTIONIST_ID {
            check.expect(
                "receptionistId",
                &invoice.receptionist_id,
                &known.staff,
                collections::STAFF,
            );
        }

        for problem in invoice.total_violations() {
            report.push(collections::INVOICES, &id, IssueKind::InvoiceTotals, problem);
        }
        if let Some(problem) = invoice.payment_violation() {
            report.push(collections::INVOICES, &id, IssueKind::PaymentFields, problem);
        }
    }

    if !report.is_clean() {
        tracing::warn!(issues = report.issues.len(), "integrity check found problems");
    }
    Ok(report)
}
