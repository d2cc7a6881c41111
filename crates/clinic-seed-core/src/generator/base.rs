//! Base entities: patients and medicines.
//!
//! These reference nothing else, so they can be generated and written in
//! any order before the dependent phases.

use chrono::Duration;
use rand::Rng;

use super::pools::{self, pick};
use super::{write_records, SeedClock, SeedResult};
use crate::models::{collections, Gender, Medicine, Patient, PatientStatus, Seeded};
use crate::store::DocumentStore;

const ACTIVE_RATIO: f64 = 0.9;

/// Generate `count` patients with plausible demographics.
pub fn generate_patients<R: Rng + ?Sized>(
    rng: &mut R,
    clock: &SeedClock,
    count: usize,
    run_id: &str,
) -> Vec<Patient> {
    let created_at = clock.timestamp();
    (0..count)
        .map(|_| {
            let first = *pick(rng, pools::FIRST_NAMES);
            let last = *pick(rng, pools::LAST_NAMES);
            let gender = match rng.gen_range(0..20) {
                0 => Gender::Other,
                n if n % 2 == 0 => Gender::Female,
                _ => Gender::Male,
            };
            let status = if rng.gen_bool(ACTIVE_RATIO) {
                PatientStatus::Active
            } else {
                PatientStatus::Inactive
            };

            Patient {
                name: format!("{} {}", first, last),
                age: rng.gen_range(1..=90),
                gender,
                phone: format!(
                    "+91 {}{:09}",
                    rng.gen_range(6..=9),
                    rng.gen_range(0..1_000_000_000u32)
                ),
                email: format!(
                    "{}.{}{}@example.com",
                    first.to_lowercase(),
                    last.to_lowercase(),
                    rng.gen_range(1..1000)
                ),
                address: format!(
                    "{}, {}, {}",
                    rng.gen_range(1..=250),
                    pick(rng, pools::STREETS),
                    pick(rng, pools::CITIES)
                ),
                blood_group: pick(rng, pools::BLOOD_GROUPS).to_string(),
                status,
                created_at: created_at.clone(),
                seed_run_id: run_id.to_string(),
            }
        })
        .collect()
}

/// Generate `count` medicines drawn from the catalog.
pub fn generate_medicines<R: Rng + ?Sized>(
    rng: &mut R,
    clock: &SeedClock,
    count: usize,
    run_id: &str,
) -> Vec<Medicine> {
    let created_at = clock.timestamp();
    (0..count)
        .map(|_| {
            let item = pick(rng, pools::MEDICINE_CATALOG);
            let expiry = clock.today() + Duration::days(rng.gen_range(180..=1080));

            Medicine {
                name: item.name.to_string(),
                category: item.category.to_string(),
                strength: item.strength.to_string(),
                form: item.form.to_string(),
                stock: rng.gen_range(20..=500),
                unit_price: rng.gen_range(item.price.0..=item.price.1),
                expiry_date: expiry.format("%Y-%m-%d").to_string(),
                manufacturer: item.manufacturer.to_string(),
                created_at: created_at.clone(),
                seed_run_id: run_id.to_string(),
            }
        })
        .collect()
}

/// Generate and write patients, returning them with their store ids.
pub fn seed_patients<S, R>(
    store: &S,
    rng: &mut R,
    clock: &SeedClock,
    count: usize,
    run_id: &str,
    batch: bool,
) -> SeedResult<Vec<Seeded<Patient>>>
where
    S: DocumentStore + ?Sized,
    R: Rng + ?Sized,
{
    let patients = generate_patients(rng, clock, count, run_id);
    write_records(store, collections::PATIENTS, patients, batch)
}

/// Generate and write medicines, returning them with their store ids.
pub fn seed_medicines<S, R>(
    store: &S,
    rng: &mut R,
    clock: &SeedClock,
    count: usize,
    run_id: &str,
    batch: bool,
) -> SeedResult<Vec<Seeded<Medicine>>>
where
    S: DocumentStore + ?Sized,
    R: Rng + ?Sized,
{
    let medicines = generate_medicines(rng, clock, count, run_id);
    write_records(store, collections::MEDICINES, medicines, batch)
}
