//! Seed data generation.
//!
//! Base entities (patients, medicines) are written first; appointments,
//! prescriptions and invoices reference their store-assigned ids, so each
//! dependent phase runs only after its prerequisites are persisted.

mod base;
mod dependent;
mod pipeline;
mod pools;
mod schedule;

pub use base::*;
pub use dependent::*;
pub use pipeline::*;
pub use schedule::*;

use std::fmt;

use serde::Serialize;
use thiserror::Error;

use crate::config::ConfigError;
use crate::models::Seeded;
use crate::store::{insert_chunked, to_fields, DocumentStore, StoreError};

/// Generation phases, in write order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Patients,
    Medicines,
    Appointments,
    Prescriptions,
    Invoices,
}

impl Phase {
    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::Patients => "patients",
            Phase::Medicines => "medicines",
            Phase::Appointments => "appointments",
            Phase::Prescriptions => "prescriptions",
            Phase::Invoices => "invoices",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Seed run errors.
#[derive(Error, Debug)]
pub enum SeedError {
    #[error("{phase} for {staff}: no {pool} to draw from")]
    EmptyPool {
        phase: Phase,
        staff: String,
        pool: &'static str,
    },

    #[error("{phase} for {staff}: unknown {kind} id {id}")]
    DanglingReference {
        phase: Phase,
        staff: String,
        kind: &'static str,
        id: String,
    },

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),
}

impl SeedError {
    /// The doctor phase an error is confined to, if any.
    pub fn phase(&self) -> Option<Phase> {
        match self {
            SeedError::EmptyPool { phase, .. } | SeedError::DanglingReference { phase, .. } => {
                Some(*phase)
            }
            SeedError::Config(_) | SeedError::Store(_) => None,
        }
    }

    /// Errors confined to one doctor's phase; the run carries on past them.
    pub fn is_phase_local(&self) -> bool {
        self.phase().is_some()
    }
}

pub type SeedResult<T> = Result<T, SeedError>;

/// Persist generated records and pair each with its assigned id.
///
/// With `batch` set, records go out in atomic chunks of at most
/// [`crate::store::MAX_BATCH_WRITES`]; otherwise one insert per record.
pub fn write_records<S, T>(
    store: &S,
    collection: &str,
    records: Vec<T>,
    batch: bool,
) -> SeedResult<Vec<Seeded<T>>>
where
    S: DocumentStore + ?Sized,
    T: Serialize,
{
    let fields = records
        .iter()
        .map(to_fields)
        .collect::<Result<Vec<_>, _>>()?;

    let ids = if batch {
        insert_chunked(store, collection, fields)?
    } else {
        let mut ids = Vec::with_capacity(fields.len());
        for doc in fields {
            ids.push(store.insert(collection, doc)?);
        }
        ids
    };

    tracing::debug!(collection, count = ids.len(), batch, "wrote records");

    Ok(ids
        .into_iter()
        .zip(records)
        .map(|(id, record)| Seeded::new(id, record))
        .collect())
}
