//! Dependent entities for one doctor: appointments, prescriptions, invoices.
//!
//! Every reference is a store-assigned id taken from an already-written
//! record, so nothing here can point at a document that does not exist.

use std::collections::HashMap;

use chrono::{DateTime, Duration};
use rand::seq::SliceRandom;
use rand::Rng;

use super::pools::{self, pick};
use super::{other_slot, today_slots, Phase, SeedClock, SeedError, SeedResult};
use crate::config::SeedConfig;
use crate::models::{
    Appointment, AppointmentStatus, Invoice, InvoiceItem, InvoiceStatus, Medicine, Patient,
    PrescribedMedicine, Prescription, Seeded, StaffIdentity, Vitals,
};

const MAX_LINES_PER_PRESCRIPTION: usize = 3;
const NOTES_RATIO: f64 = 0.5;

/// Sequential invoice numbers for one seed run: `INV-YYYYMMDD-RUNID8-NNNN`.
#[derive(Debug, Clone)]
pub struct InvoiceNumbers {
    prefix: String,
    next: u32,
}

impl InvoiceNumbers {
    pub fn new(clock: &SeedClock, run_id: &str) -> Self {
        let run: String = run_id
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .take(8)
            .collect();
        Self {
            prefix: format!(
                "INV-{}-{}",
                clock.today().format("%Y%m%d"),
                run.to_uppercase()
            ),
            next: 1,
        }
    }

    pub fn next_number(&mut self) -> String {
        let number = format!("{}-{:04}", self.prefix, self.next);
        self.next += 1;
        number
    }
}

/// Generates one doctor's dependent records.
pub struct DoctorGenerator<'a> {
    doctor: &'a StaffIdentity,
    clock: &'a SeedClock,
    config: &'a SeedConfig,
    run_id: &'a str,
}

impl<'a> DoctorGenerator<'a> {
    pub fn new(
        doctor: &'a StaffIdentity,
        clock: &'a SeedClock,
        config: &'a SeedConfig,
        run_id: &'a str,
    ) -> Self {
        Self {
            doctor,
            clock,
            config,
            run_id,
        }
    }

    fn empty_pool(&self, phase: Phase, pool: &'static str) -> SeedError {
        SeedError::EmptyPool {
            phase,
            staff: self.doctor.email.clone(),
            pool,
        }
    }

    fn dangling(&self, kind: &'static str, id: &str) -> SeedError {
        SeedError::DanglingReference {
            phase: Phase::Invoices,
            staff: self.doctor.email.clone(),
            kind,
            id: id.to_string(),
        }
    }

    /// Same-day appointments on fixed slots, then past/future ones.
    pub fn appointments<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        patients: &[Seeded<Patient>],
    ) -> SeedResult<Vec<Appointment>> {
        if patients.is_empty() {
            return Err(self.empty_pool(Phase::Appointments, "patients"));
        }

        let mut slots = today_slots(self.clock, self.config, self.config.today_per_doctor);
        for _ in 0..self.config.other_per_doctor {
            slots.push(other_slot(rng, self.clock, self.config));
        }

        let created_at = self.clock.timestamp();
        Ok(slots
            .into_iter()
            .map(|slot| {
                let patient = pick(rng, patients);
                Appointment {
                    patient_id: patient.id.clone(),
                    patient_name: patient.record.name.clone(),
                    doctor_id: self.doctor.id.clone(),
                    doctor_name: self.doctor.name.clone(),
                    date: slot.date_string(),
                    time: slot.time_string(),
                    scheduled_at: slot.at.to_rfc3339(),
                    status: slot.status(rng),
                    reason: pick(rng, pools::VISIT_REASONS).to_string(),
                    token_number: slot.token,
                    created_at: created_at.clone(),
                    seed_run_id: self.run_id.to_string(),
                }
            })
            .collect())
    }

    /// One prescription per eligible appointment.
    ///
    /// Eligible means the visit happened (or is happening) unless
    /// `prescriptions_require_visit` is off; cancelled visits never qualify.
    pub fn prescriptions<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        appointments: &[Seeded<Appointment>],
        medicines: &[Seeded<Medicine>],
    ) -> SeedResult<Vec<Prescription>> {
        if medicines.is_empty() {
            return Err(self.empty_pool(Phase::Prescriptions, "medicines"));
        }

        let created_at = self.clock.timestamp();
        let eligible = appointments.iter().filter(|appt| {
            let status = appt.record.status;
            status != AppointmentStatus::Cancelled
                && (status.implies_visit() || !self.config.prescriptions_require_visit)
        });

        let mut prescriptions = Vec::new();
        for appt in eligible {
            let lines = rng.gen_range(1..=MAX_LINES_PER_PRESCRIPTION.min(medicines.len()));
            let chosen: Vec<&Seeded<Medicine>> = medicines.choose_multiple(rng, lines).collect();
            let prescribed = chosen
                .into_iter()
                .map(|medicine| {
                    let (dosage, frequency, per_day) = *pick(rng, pools::DOSAGE_PLANS);
                    let days = *pick(rng, pools::COURSE_DAYS);
                    PrescribedMedicine {
                        medicine_id: medicine.id.clone(),
                        name: medicine.record.label(),
                        dosage: dosage.to_string(),
                        frequency: frequency.to_string(),
                        duration: format!("{} days", days),
                        instructions: pick(rng, pools::INSTRUCTIONS).to_string(),
                        quantity: medicine.record.units_for_course(per_day * days),
                    }
                })
                .collect();

            let notes = if rng.gen_bool(NOTES_RATIO) {
                Some(format!("Review after {} days", pick(rng, pools::COURSE_DAYS)))
            } else {
                None
            };

            prescriptions.push(Prescription {
                patient_id: appt.record.patient_id.clone(),
                patient_name: appt.record.patient_name.clone(),
                doctor_id: self.doctor.id.clone(),
                doctor_name: self.doctor.name.clone(),
                appointment_id: appt.id.clone(),
                date: appt.record.date.clone(),
                diagnosis: pick(rng, pools::DIAGNOSES).to_string(),
                medicines: prescribed,
                vitals: random_vitals(rng),
                notes,
                created_at: created_at.clone(),
                seed_run_id: self.run_id.to_string(),
            });
        }
        Ok(prescriptions)
    }

    /// One invoice per prescription-bearing appointment.
    ///
    /// Completed visits are paid with probability `paid_ratio`; everything
    /// else stays pending without payment fields.
    pub fn invoices<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        receptionist_id: &str,
        appointments: &[Seeded<Appointment>],
        prescriptions: &[Seeded<Prescription>],
        medicines: &[Seeded<Medicine>],
        numbers: &mut InvoiceNumbers,
    ) -> SeedResult<Vec<Invoice>> {
        let appointment_by_id: HashMap<&str, &Appointment> = appointments
            .iter()
            .map(|a| (a.id.as_str(), &a.record))
            .collect();
        let medicine_by_id: HashMap<&str, &Medicine> = medicines
            .iter()
            .map(|m| (m.id.as_str(), &m.record))
            .collect();

        let created_at = self.clock.timestamp();
        let mut invoices = Vec::with_capacity(prescriptions.len());

        for prescription in prescriptions {
            let rx = &prescription.record;
            let appointment = appointment_by_id
                .get(rx.appointment_id.as_str())
                .ok_or_else(|| self.dangling("appointment", &rx.appointment_id))?;

            let mut items = vec![InvoiceItem::new(
                "Consultation".to_string(),
                1,
                pools::CONSULTATION_FEE,
            )];
            for line in &rx.medicines {
                let medicine = medicine_by_id
                    .get(line.medicine_id.as_str())
                    .ok_or_else(|| self.dangling("medicine", &line.medicine_id))?;
                items.push(InvoiceItem::new(
                    line.name.clone(),
                    line.quantity,
                    medicine.unit_price,
                ));
            }

            let mut invoice = Invoice {
                invoice_number: numbers.next_number(),
                patient_id: rx.patient_id.clone(),
                patient_name: rx.patient_name.clone(),
                doctor_id: self.doctor.id.clone(),
                receptionist_id: receptionist_id.to_string(),
                appointment_id: rx.appointment_id.clone(),
                date: appointment.date.clone(),
                total_amount: Invoice::items_total(&items),
                items,
                status: InvoiceStatus::Pending,
                payment_date: None,
                payment_method: None,
                created_at: created_at.clone(),
                seed_run_id: self.run_id.to_string(),
            };

            if appointment.status == AppointmentStatus::Completed
                && rng.gen_bool(self.config.paid_ratio)
            {
                // Settled after the visit, never later than now.
                let minutes = rng.gen_range(15..=90);
                let paid_at = DateTime::parse_from_rfc3339(&appointment.scheduled_at)
                    .map(|at| (at + Duration::minutes(minutes)).min(self.clock.now()).to_rfc3339())
                    .unwrap_or_else(|_| self.clock.timestamp());
                invoice.settle(paid_at, *pick(rng, pools::PAYMENT_METHODS));
            }

            invoices.push(invoice);
        }
        Ok(invoices)
    }
}

fn random_vitals<R: Rng + ?Sized>(rng: &mut R) -> Vitals {
    let systolic: u32 = rng.gen_range(100..=150);
    let diastolic: u32 = rng.gen_range(60..=95);
    Vitals {
        blood_pressure: format!("{}/{}", systolic, diastolic),
        pulse: rng.gen_range(60..=100),
        temperature: f64::from(rng.gen_range(970..=1020u32)) / 10.0,
        weight: f64::from(rng.gen_range(300..=1000u32)) / 10.0,
    }
}
