//! Clinic Seed Core Library
//!
//! Generates realistic, referentially consistent demo data for the clinic
//! management front-end and inspects what previous runs produced.
//!
//! # Architecture
//!
//! ```text
//!   staffData (sign-up profiles)
//!          │
//!          ▼
//!   Staff Resolver ── unresolved ──► warn + skip
//!          │
//!          ▼
//!   patients, medicines            (base entities)
//!          │
//!          ▼
//!   per doctor:
//!     appointments ──► prescriptions ──► invoices
//!          │
//!          ▼
//!   DocumentStore (Firestore REST │ SQLite)
//! ```
//!
//! # Core Principle
//!
//! **Every reference is a real id.** Dependent records only point at ids
//! the store assigned earlier in the same run, or at resolved staff ids.
//!
//! # Modules
//!
//! - [`store`]: Document store trait, Firestore REST backend, value codec
//! - [`db`]: SQLite document store
//! - [`models`]: Collection record types
//! - [`resolver`]: Staff email → profile lookup
//! - [`generator`]: Base and dependent generators, seed pipeline
//! - [`inspect`]: Read-only counts, listings and integrity checks
//! - [`config`]: Environment-driven store and seed configuration

pub mod config;
pub mod db;
pub mod generator;
pub mod inspect;
pub mod models;
pub mod resolver;
pub mod store;

// Re-export commonly used types
pub use config::{SeedConfig, StaffRoster, StoreConfig};
pub use db::Database;
pub use generator::{run_seed, SeedClock, SeedError, SeedReport, SeedRun};
pub use inspect::{check_integrity, Inspector, IntegrityReport};
pub use resolver::StaffResolver;
pub use store::{DocumentStore, FirestoreClient, StoreError};
