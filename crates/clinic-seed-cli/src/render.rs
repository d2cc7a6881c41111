//! Plain-text output for the binaries.

use std::fmt::Write;

use serde_json::Value;

use clinic_seed_core::inspect::{CollectionCount, DoctorDay, IntegrityReport};
use clinic_seed_core::models::StaffIdentity;
use clinic_seed_core::resolver::UnresolvedReason;
use clinic_seed_core::store::Document;
use clinic_seed_core::SeedReport;

/// Summary printed at the end of a seed run.
pub fn seed_summary(report: &SeedReport) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Seed run {}", report.run_id);
    for (collection, count) in report.counts.rows() {
        let _ = writeln!(out, "  {:<15} {:>6}", collection, count);
    }
    let _ = writeln!(out, "  {:<15} {:>6}", "total", report.counts.total());

    for missing in &report.unresolved {
        let reason = match &missing.reason {
            UnresolvedReason::NotFound => "no profile".to_string(),
            UnresolvedReason::WrongRole(role) => format!("profile has role {}", role.as_str()),
            UnresolvedReason::Malformed(detail) => format!("unreadable profile: {}", detail),
        };
        let _ = writeln!(
            out,
            "Skipped {} {} ({})",
            missing.expected_role.as_str(),
            missing.email,
            reason
        );
    }
    if report.invoices_skipped {
        let _ = writeln!(out, "Invoices skipped: no receptionist resolved");
    }
    for failure in &report.failures {
        let _ = writeln!(out, "FAILED {}: {}", failure.phase, failure.message);
    }
    out
}

pub fn counts_table(counts: &[CollectionCount]) -> String {
    let mut out = String::new();
    for row in counts {
        let _ = writeln!(out, "{:<15} {:>6}", row.collection, row.count);
    }
    out
}

/// One document per line: id, then its fields as compact JSON.
pub fn documents(docs: &[Document]) -> String {
    let mut out = String::new();
    for doc in docs {
        let _ = writeln!(out, "{}  {}", doc.id, Value::Object(doc.fields.clone()));
    }
    out
}

pub fn staff_table(staff: &[StaffIdentity]) -> String {
    if staff.is_empty() {
        return "No staff profiles found.\n".to_string();
    }
    let mut out = String::new();
    for profile in staff {
        let _ = writeln!(
            out,
            "{:<22} {:<13} {:<28} {}",
            profile.id,
            profile.role.as_str(),
            profile.email,
            profile.name
        );
    }
    out
}

pub fn doctor_day(day: &DoctorDay) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{} ({}) on {}: {} appointment(s)",
        day.doctor.name,
        day.doctor.email,
        day.date.format("%Y-%m-%d"),
        day.appointments.len()
    );
    for appt in &day.appointments {
        let record = &appt.record;
        let token = record
            .token_number
            .map(|t| format!("#{}", t))
            .unwrap_or_else(|| "-".to_string());
        let _ = writeln!(
            out,
            "  {} {:>4} {:<12} {:<24} {}",
            record.time,
            token,
            record.status.as_str(),
            record.patient_name,
            record.reason
        );
    }
    out
}

pub fn integrity(report: &IntegrityReport) -> String {
    let mut out = String::new();
    if report.is_clean() {
        let _ = writeln!(out, "OK: {} documents checked, no problems", report.checked);
        return out;
    }
    let _ = writeln!(
        out,
        "{} problem(s) in {} documents checked",
        report.issues.len(),
        report.checked
    );
    for issue in &report.issues {
        let _ = writeln!(
            out,
            "  {}/{} [{:?}] {}",
            issue.collection, issue.id, issue.kind, issue.detail
        );
    }
    out
}
