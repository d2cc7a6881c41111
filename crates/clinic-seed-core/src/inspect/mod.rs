//! Read-only diagnostics over what seed runs produced.

mod integrity;

pub use integrity::*;

use chrono::NaiveDate;
use serde::Serialize;
use serde_json::Value;

use crate::models::{collections, Appointment, Seeded, StaffIdentity};
use crate::resolver::StaffResolver;
use crate::store::{Document, DocumentStore, StoreResult};

/// Upper bound on appointments fetched for one doctor.
const DOCTOR_QUERY_LIMIT: usize = 10_000;

/// Document count for one collection.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct CollectionCount {
    pub collection: String,
    pub count: u64,
}

/// One doctor's appointments on one date, ordered by time.
#[derive(Debug, Clone)]
pub struct DoctorDay {
    pub doctor: StaffIdentity,
    pub date: NaiveDate,
    pub appointments: Vec<Seeded<Appointment>>,
}

/// Read-only queries over the clinic collections.
pub struct Inspector<'a, S: DocumentStore + ?Sized> {
    store: &'a S,
}

impl<'a, S: DocumentStore + ?Sized> Inspector<'a, S> {
    pub fn new(store: &'a S) -> Self {
        Self { store }
    }

    /// Counts for every known collection, staff included.
    pub fn collection_counts(&self) -> StoreResult<Vec<CollectionCount>> {
        collections::ALL
            .iter()
            .map(|&collection| {
                Ok(CollectionCount {
                    collection: collection.to_string(),
                    count: self.store.count(collection)?,
                })
            })
            .collect()
    }

    /// At most `limit` documents from `collection`, in store order.
    pub fn list_documents(&self, collection: &str, limit: usize) -> StoreResult<Vec<Document>> {
        let mut docs = self.store.scan(collection)?;
        docs.truncate(limit);
        Ok(docs)
    }

    /// Staff profiles; documents that are not valid profiles are skipped.
    pub fn list_staff(&self) -> StoreResult<Vec<StaffIdentity>> {
        let mut staff = Vec::new();
        for doc in self.store.scan(collections::STAFF)? {
            match doc.decode::<StaffIdentity>() {
                Ok(mut profile) => {
                    profile.id = doc.id;
                    staff.push(profile);
                }
                Err(err) => tracing::warn!(id = %doc.id, error = %err, "skipping staff document"),
            }
        }
        Ok(staff)
    }

    /// A doctor's appointments on `date`. `Ok(None)` when the email does not
    /// resolve to a staff profile. Documents that do not decode are skipped.
    pub fn appointments_on(&self, doctor_email: &str, date: NaiveDate) -> StoreResult<Option<DoctorDay>> {
        let Some(doctor) = StaffResolver::new(self.store).resolve(doctor_email)? else {
            return Ok(None);
        };

        let day = date.format("%Y-%m-%d").to_string();
        let mut appointments = Vec::new();
        for doc in self.store.find_by_field(
            collections::APPOINTMENTS,
            "doctorId",
            &Value::String(doctor.id.clone()),
            DOCTOR_QUERY_LIMIT,
        )? {
            match doc.decode::<Appointment>() {
                Ok(appointment) if appointment.date == day => {
                    appointments.push(Seeded::new(doc.id, appointment));
                }
                Ok(_) => {}
                Err(err) => {
                    tracing::warn!(id = %doc.id, error = %err, "skipping appointment document")
                }
            }
        }
        appointments.sort_by(|a, b| a.record.time.cmp(&b.record.time));

        Ok(Some(DoctorDay {
            doctor,
            date,
            appointments,
        }))
    }

    /// See [`check_integrity`].
    pub fn check_integrity(&self) -> StoreResult<IntegrityReport> {
        check_integrity(self.store)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::Database;
    use crate::store::to_fields;
    use serde_json::json;

    fn setup_db() -> (Database, String) {
        let db = Database::open_in_memory().unwrap();
        let doctor = json!({"email": "doctor@gmail.com", "name": "Dr. A", "role": "doctor"});
        let doctor_id = db
            .insert(collections::STAFF, to_fields(&doctor).unwrap())
            .unwrap();
        db.insert(collections::STAFF, to_fields(&json!({"email": "x"})).unwrap())
            .unwrap();

        for (date, time) in [
            ("2026-02-06", "10:00"),
            ("2026-02-06", "09:30"),
            ("2026-02-07", "09:00"),
        ] {
            let appt = json!({
                "patientId": "p1",
                "patientName": "Asha",
                "doctorId": doctor_id,
                "doctorName": "Dr. A",
                "date": date,
                "time": time,
                "scheduledAt": format!("{}T{}:00+05:30", date, time),
                "status": "Scheduled",
                "reason": "Check-up",
                "createdAt": "2026-02-01T00:00:00+05:30",
                "seedRunId": "run",
            });
            db.insert(collections::APPOINTMENTS, to_fields(&appt).unwrap())
                .unwrap();
        }
        // Written by the front-end: no scheduledAt, createdAt or seedRunId.
        let app_written = json!({
            "patientId": "p2",
            "patientName": "Ravi",
            "doctorId": doctor_id,
            "doctorName": "Dr. A",
            "date": "2026-02-06",
            "time": "11:15",
            "status": "waiting",
            "reason": "Cough",
        });
        db.insert(collections::APPOINTMENTS, to_fields(&app_written).unwrap())
            .unwrap();
        let broken = json!({"doctorId": doctor_id, "date": "2026-02-06"});
        db.insert(collections::APPOINTMENTS, to_fields(&broken).unwrap())
            .unwrap();
        (db, doctor_id)
    }

    #[test]
    fn test_counts_cover_all_collections() {
        let (db, _) = setup_db();
        let counts = Inspector::new(&db).collection_counts().unwrap();

        assert_eq!(counts.len(), collections::ALL.len());
        let count_of = |name: &str| counts.iter().find(|c| c.collection == name).unwrap().count;
        assert_eq!(count_of(collections::STAFF), 2);
        assert_eq!(count_of(collections::APPOINTMENTS), 5);
        assert_eq!(count_of(collections::INVOICES), 0);
    }

    #[test]
    fn test_list_documents_limit() {
        let (db, _) = setup_db();
        let inspector = Inspector::new(&db);
        assert_eq!(inspector.list_documents(collections::APPOINTMENTS, 2).unwrap().len(), 2);
        assert_eq!(inspector.list_documents(collections::APPOINTMENTS, 50).unwrap().len(), 5);
    }

    #[test]
    fn test_list_staff_skips_malformed() {
        let (db, doctor_id) = setup_db();
        let staff = Inspector::new(&db).list_staff().unwrap();
        assert_eq!(staff.len(), 1);
        assert_eq!(staff[0].id, doctor_id);
    }

    #[test]
    fn test_appointments_on_date_sorted() {
        let (db, _) = setup_db();
        let inspector = Inspector::new(&db);
        let date = NaiveDate::from_ymd_opt(2026, 2, 6).unwrap();

        let day = inspector
            .appointments_on("Doctor@Gmail.com", date)
            .unwrap()
            .unwrap();
        let times: Vec<_> = day.appointments.iter().map(|a| a.record.time.as_str()).collect();
        assert_eq!(times, vec!["09:30", "10:00", "11:15"]);

        assert!(inspector
            .appointments_on("nobody@gmail.com", date)
            .unwrap()
            .is_none());
    }
}
