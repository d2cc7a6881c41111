//! One complete seed run.
//!
//! Order: validate config → resolve roster → patients → medicines →
//! per doctor (appointments → prescriptions → invoices).

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use uuid::Uuid;

use super::{
    seed_medicines, seed_patients, write_records, DoctorGenerator, InvoiceNumbers, Phase,
    SeedClock, SeedResult,
};
use crate::config::SeedConfig;
use crate::models::{collections, Medicine, Patient, Seeded, StaffIdentity};
use crate::resolver::{StaffResolver, UnresolvedStaff};
use crate::store::DocumentStore;

/// Receptionist id written on invoices when no receptionist resolved and
/// placeholders are enabled.
pub const PLACEHOLDER_RECEPTIONIST_ID: &str = "placeholder:receptionist";

/// Documents written per collection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PhaseCounts {
    pub patients: usize,
    pub medicines: usize,
    pub appointments: usize,
    pub prescriptions: usize,
    pub invoices: usize,
}

impl PhaseCounts {
    /// `(collection, count)` rows in write order.
    pub fn rows(&self) -> [(&'static str, usize); 5] {
        [
            (collections::PATIENTS, self.patients),
            (collections::MEDICINES, self.medicines),
            (collections::APPOINTMENTS, self.appointments),
            (collections::PRESCRIPTIONS, self.prescriptions),
            (collections::INVOICES, self.invoices),
        ]
    }

    pub fn total(&self) -> usize {
        self.rows().iter().map(|(_, n)| n).sum()
    }
}

/// A doctor's phase that aborted; earlier phases for that doctor stay written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhaseFailure {
    pub phase: Phase,
    pub staff: String,
    pub message: String,
}

/// Outcome of a seed run.
#[derive(Debug, Clone)]
pub struct SeedReport {
    /// Value of `seedRunId` on every document written
    pub run_id: String,
    pub counts: PhaseCounts,
    /// Roster entries that were skipped
    pub unresolved: Vec<UnresolvedStaff>,
    /// Doctors whose dependent generation stopped early
    pub failures: Vec<PhaseFailure>,
    /// Invoices were not generated for lack of a receptionist
    pub invoices_skipped: bool,
}

impl SeedReport {
    fn new(run_id: String) -> Self {
        Self {
            run_id,
            counts: PhaseCounts::default(),
            unresolved: Vec::new(),
            failures: Vec::new(),
            invoices_skipped: false,
        }
    }

    /// Whether any phase aborted.
    pub fn has_failures(&self) -> bool {
        !self.failures.is_empty()
    }
}

/// A configured seed run against one store.
pub struct SeedRun<'a, S: DocumentStore + ?Sized> {
    store: &'a S,
    config: &'a SeedConfig,
    clock: SeedClock,
    run_id: String,
}

impl<'a, S: DocumentStore + ?Sized> SeedRun<'a, S> {
    /// Create a run with a fresh run id.
    pub fn new(store: &'a S, config: &'a SeedConfig, clock: SeedClock) -> Self {
        Self::with_run_id(store, config, clock, Uuid::new_v4().to_string())
    }

    pub fn with_run_id(
        store: &'a S,
        config: &'a SeedConfig,
        clock: SeedClock,
        run_id: String,
    ) -> Self {
        Self {
            store,
            config,
            clock,
            run_id,
        }
    }

    pub fn run_id(&self) -> &str {
        &self.run_id
    }

    /// Run with an RNG seeded from `rng_seed`, or from entropy when unset.
    pub fn execute(&self) -> SeedResult<SeedReport> {
        let mut rng = match self.config.rng_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        self.execute_with(&mut rng)
    }

    /// Run every phase.
    ///
    /// Store and configuration errors abort the run. An empty pool or a
    /// dangling reference aborts only the affected doctor's remaining phases
    /// and is reported in [`SeedReport::failures`].
    pub fn execute_with<R: Rng + ?Sized>(&self, rng: &mut R) -> SeedResult<SeedReport> {
        self.config.validate()?;

        let mut report = SeedReport::new(self.run_id.clone());
        tracing::info!(run_id = %self.run_id, "starting seed run");

        let roster = StaffResolver::new(self.store).resolve_roster(&self.config.roster)?;
        for missing in &roster.unresolved {
            tracing::warn!(
                email = %missing.email,
                role = missing.expected_role.as_str(),
                "skipping roster entry"
            );
        }
        report.unresolved = roster.unresolved;

        let receptionist_id = match (&roster.receptionist, self.config.placeholder_receptionist) {
            (Some(receptionist), _) => Some(receptionist.id.clone()),
            (None, true) => {
                tracing::warn!(
                    id = PLACEHOLDER_RECEPTIONIST_ID,
                    "no receptionist resolved; billing with placeholder"
                );
                Some(PLACEHOLDER_RECEPTIONIST_ID.to_string())
            }
            (None, false) => {
                tracing::warn!("no receptionist resolved; invoices will be skipped");
                report.invoices_skipped = true;
                None
            }
        };

        let batch = self.config.batch_writes;
        let patients = seed_patients(
            self.store,
            rng,
            &self.clock,
            self.config.patient_count,
            &self.run_id,
            batch,
        )?;
        report.counts.patients = patients.len();
        tracing::info!(count = patients.len(), "seeded patients");

        let medicines = seed_medicines(
            self.store,
            rng,
            &self.clock,
            self.config.medicine_count,
            &self.run_id,
            batch,
        )?;
        report.counts.medicines = medicines.len();
        tracing::info!(count = medicines.len(), "seeded medicines");

        let mut numbers = InvoiceNumbers::new(&self.clock, &self.run_id);
        for doctor in &roster.doctors {
            let result = self.seed_doctor(
                rng,
                doctor,
                &patients,
                &medicines,
                receptionist_id.as_deref(),
                &mut numbers,
                &mut report,
            );
            if let Err(err) = result {
                let Some(phase) = err.phase() else {
                    return Err(err);
                };
                tracing::error!(doctor = %doctor.email, %phase, error = %err, "doctor phase aborted");
                report.failures.push(PhaseFailure {
                    phase,
                    staff: doctor.email.clone(),
                    message: err.to_string(),
                });
            }
        }

        tracing::info!(
            run_id = %self.run_id,
            total = report.counts.total(),
            failures = report.failures.len(),
            "seed run finished"
        );
        Ok(report)
    }

    #[allow(clippy::too_many_arguments)]
    fn seed_doctor<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        doctor: &StaffIdentity,
        patients: &[Seeded<Patient>],
        medicines: &[Seeded<Medicine>],
        receptionist_id: Option<&str>,
        numbers: &mut InvoiceNumbers,
        report: &mut SeedReport,
    ) -> SeedResult<()> {
        let generator = DoctorGenerator::new(doctor, &self.clock, self.config, &self.run_id);
        let batch = self.config.batch_writes;

        let appointments = write_records(
            self.store,
            collections::APPOINTMENTS,
            generator.appointments(rng, patients)?,
            batch,
        )?;
        report.counts.appointments += appointments.len();

        let prescriptions = write_records(
            self.store,
            collections::PRESCRIPTIONS,
            generator.prescriptions(rng, &appointments, medicines)?,
            batch,
        )?;
        report.counts.prescriptions += prescriptions.len();

        let mut invoice_count = 0;
        if let Some(receptionist_id) = receptionist_id {
            let invoices = write_records(
                self.store,
                collections::INVOICES,
                generator.invoices(
                    rng,
                    receptionist_id,
                    &appointments,
                    &prescriptions,
                    medicines,
                    numbers,
                )?,
                batch,
            )?;
            invoice_count = invoices.len();
            report.counts.invoices += invoice_count;
        }

        tracing::info!(
            doctor = %doctor.email,
            appointments = appointments.len(),
            prescriptions = prescriptions.len(),
            invoices = invoice_count,
            "seeded doctor"
        );
        Ok(())
    }
}

/// Run a seed against `store` with the system clock.
pub fn run_seed<S: DocumentStore + ?Sized>(store: &S, config: &SeedConfig) -> SeedResult<SeedReport> {
    SeedRun::new(store, config, SeedClock::system()).execute()
}
