//! Staff resolver: maps roster emails to staff profiles.
//!
//! Pipeline: roster email → exact lookup → lowercase lookup → role check

mod normalizer;

pub use normalizer::*;

use serde_json::Value;

use crate::config::StaffRoster;
use crate::models::{collections, StaffIdentity, StaffRole};
use crate::store::{Document, DocumentStore, StoreError, StoreResult};

/// Why a roster entry could not be used.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UnresolvedReason {
    /// No profile under the email in either case form
    NotFound,
    /// A profile exists but carries a different role
    WrongRole(StaffRole),
    /// A profile exists but does not decode (unknown role, missing field)
    Malformed(String),
}

/// A roster entry with no usable profile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnresolvedStaff {
    pub email: String,
    pub expected_role: StaffRole,
    pub reason: UnresolvedReason,
}

/// Outcome of resolving the whole roster.
#[derive(Debug, Clone, Default)]
pub struct ResolvedRoster {
    /// Doctors found, in roster order
    pub doctors: Vec<StaffIdentity>,
    /// Receptionist who raises invoices, if found
    pub receptionist: Option<StaffIdentity>,
    /// Entries skipped, with the reason
    pub unresolved: Vec<UnresolvedStaff>,
}

/// Read-only staff lookup against `staffData`.
pub struct StaffResolver<'a, S: DocumentStore + ?Sized> {
    store: &'a S,
}

impl<'a, S: DocumentStore + ?Sized> StaffResolver<'a, S> {
    /// Create a new resolver.
    pub fn new(store: &'a S) -> Self {
        Self { store }
    }

    /// Find the profile for an email: exact match first, then lowercased.
    ///
    /// `Ok(None)` means no usable profile exists (a malformed one is logged
    /// and treated as absent); errors are store failures only.
    pub fn resolve(&self, email: &str) -> StoreResult<Option<StaffIdentity>> {
        match self.lookup(email)? {
            Some(Ok(staff)) => Ok(Some(staff)),
            Some(Err(detail)) => {
                tracing::warn!(email, error = %detail, "staff profile is malformed");
                Ok(None)
            }
            None => Ok(None),
        }
    }

    /// First stored document under either email form, decoded.
    fn lookup(&self, email: &str) -> StoreResult<Option<Result<StaffIdentity, String>>> {
        for candidate in email_candidates(email) {
            let docs = self.store.find_by_field(
                collections::STAFF,
                "email",
                &Value::String(candidate),
                1,
            )?;

            if let Some(doc) = docs.into_iter().next() {
                return decode_profile(doc).map(Some);
            }
        }
        Ok(None)
    }

    /// Resolve a profile and require a role.
    pub fn resolve_with_role(
        &self,
        email: &str,
        role: StaffRole,
    ) -> StoreResult<Result<StaffIdentity, UnresolvedStaff>> {
        let unresolved = |reason| UnresolvedStaff {
            email: email.to_string(),
            expected_role: role,
            reason,
        };

        Ok(match self.lookup(email)? {
            Some(Ok(staff)) if staff.role == role => Ok(staff),
            Some(Ok(staff)) => {
                tracing::warn!(
                    email,
                    expected = role.as_str(),
                    found = staff.role.as_str(),
                    "staff profile has unexpected role"
                );
                Err(unresolved(UnresolvedReason::WrongRole(staff.role)))
            }
            Some(Err(detail)) => {
                tracing::warn!(email, role = role.as_str(), error = %detail, "staff profile is malformed");
                Err(unresolved(UnresolvedReason::Malformed(detail)))
            }
            None => {
                tracing::warn!(email, role = role.as_str(), "staff profile not found");
                Err(unresolved(UnresolvedReason::NotFound))
            }
        })
    }

    /// Resolve every roster entry; unresolved entries are collected, not fatal.
    pub fn resolve_roster(&self, roster: &StaffRoster) -> StoreResult<ResolvedRoster> {
        let mut resolved = ResolvedRoster::default();

        for email in &roster.doctors {
            match self.resolve_with_role(email, StaffRole::Doctor)? {
                Ok(doctor) => {
                    tracing::info!(email = %email, id = %doctor.id, "resolved doctor");
                    resolved.doctors.push(doctor);
                }
                Err(missing) => resolved.unresolved.push(missing),
            }
        }

        if let Some(email) = &roster.receptionist {
            match self.resolve_with_role(email, StaffRole::Receptionist)? {
                Ok(receptionist) => {
                    tracing::info!(email = %email, id = %receptionist.id, "resolved receptionist");
                    resolved.receptionist = Some(receptionist);
                }
                Err(missing) => resolved.unresolved.push(missing),
            }
        }

        Ok(resolved)
    }
}

/// Decode a staff document. Shape errors are returned as the inner `Err`;
/// only non-decode failures propagate.
fn decode_profile(doc: Document) -> StoreResult<Result<StaffIdentity, String>> {
    match doc.decode::<StaffIdentity>() {
        Ok(mut staff) => {
            staff.id = doc.id;
            Ok(Ok(staff))
        }
        Err(StoreError::Decode(detail)) => Ok(Err(detail)),
        Err(err) => Err(err),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::Database;
    use crate::store::to_fields;
    use serde_json::json;

    fn setup_db() -> Database {
        let db = Database::open_in_memory().unwrap();
        let staff = [
            json!({"email": "doctor@gmail.com", "name": "Dr. Kavya Rao", "role": "doctor"}),
            json!({"email": "Reception@Gmail.com", "name": "Neha Singh", "role": "receptionist"}),
            json!({"email": "nurse.doc@gmail.com", "name": "Sam", "role": "receptionist"}),
            json!({"email": "admin@gmail.com", "name": "Ops", "role": "admin"}),
        ];
        for profile in staff {
            db.insert(collections::STAFF, to_fields(&profile).unwrap())
                .unwrap();
        }
        db
    }

    #[test]
    fn test_exact_match() {
        let db = setup_db();
        let resolver = StaffResolver::new(&db);

        let staff = resolver.resolve("doctor@gmail.com").unwrap().unwrap();
        assert_eq!(staff.name, "Dr. Kavya Rao");
        assert_eq!(staff.id.len(), crate::store::AUTO_ID_LEN);
    }

    #[test]
    fn test_lowercase_fallback() {
        let db = setup_db();
        let resolver = StaffResolver::new(&db);

        // Roster typed with capitals, profile stored lowercase.
        let staff = resolver.resolve("Doctor@Gmail.com").unwrap().unwrap();
        assert_eq!(staff.email, "doctor@gmail.com");
    }

    #[test]
    fn test_stored_mixed_case_needs_exact_input() {
        let db = setup_db();
        let resolver = StaffResolver::new(&db);

        assert!(resolver.resolve("Reception@Gmail.com").unwrap().is_some());
        // Lowercase input cannot reach a mixed-case stored email.
        assert!(resolver.resolve("reception@gmail.com").unwrap().is_none());
    }

    #[test]
    fn test_missing_is_none() {
        let db = setup_db();
        let resolver = StaffResolver::new(&db);
        assert!(resolver.resolve("doctor1@gmail.com").unwrap().is_none());
    }

    #[test]
    fn test_malformed_profile_is_absent() {
        let db = setup_db();
        let resolver = StaffResolver::new(&db);
        assert!(resolver.resolve("admin@gmail.com").unwrap().is_none());

        let missing = resolver
            .resolve_with_role("admin@gmail.com", StaffRole::Doctor)
            .unwrap()
            .unwrap_err();
        assert!(matches!(
            missing.reason,
            UnresolvedReason::Malformed(ref detail) if detail.contains("admin")
        ));
    }

    #[test]
    fn test_roster_collects_unresolved() {
        let db = setup_db();
        let resolver = StaffResolver::new(&db);
        let roster = StaffRoster {
            doctors: vec![
                "doctor@gmail.com".into(),
                "doctor1@gmail.com".into(),
                "nurse.doc@gmail.com".into(),
            ],
            receptionist: Some("Reception@Gmail.com".into()),
        };

        let resolved = resolver.resolve_roster(&roster).unwrap();
        assert_eq!(resolved.doctors.len(), 1);
        assert!(resolved.receptionist.is_some());
        assert_eq!(
            resolved.unresolved,
            vec![
                UnresolvedStaff {
                    email: "doctor1@gmail.com".into(),
                    expected_role: StaffRole::Doctor,
                    reason: UnresolvedReason::NotFound,
                },
                UnresolvedStaff {
                    email: "nurse.doc@gmail.com".into(),
                    expected_role: StaffRole::Doctor,
                    reason: UnresolvedReason::WrongRole(StaffRole::Receptionist),
                },
            ]
        );
    }
}
