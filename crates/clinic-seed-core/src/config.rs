//! Runtime configuration.
//!
//! Environment variables are read once at process startup into [`EnvValues`];
//! everything else here is pure parsing so it can be tested without touching
//! the process environment. Seed volumes, the staff roster and date windows
//! default to the constants below.

use std::fmt;
use std::path::PathBuf;

use serde_json::Value;
use thiserror::Error;

use crate::db::Database;
use crate::store::{DocumentStore, FirestoreClient, FirestoreMode, StoreResult};

/// Project identity used when no credentials name one.
pub const DEFAULT_PROJECT_ID: &str = "demo-clinic";
/// Local store file used when no hosted backend is configured.
pub const DEFAULT_DB_PATH: &str = "clinic-seed.db";

/// Doctors appointments are generated for.
pub const DOCTOR_EMAILS: [&str; 2] = ["doctor@gmail.com", "doctor1@gmail.com"];
/// Receptionist who raises invoices.
pub const RECEPTIONIST_EMAIL: &str = "receptionist@gmail.com";

pub const PATIENT_COUNT: usize = 20;
pub const MEDICINE_COUNT: usize = 15;
pub const TODAY_APPOINTMENTS_PER_DOCTOR: usize = 10;
pub const OTHER_APPOINTMENTS_PER_DOCTOR: usize = 15;
pub const PAST_WINDOW_DAYS: u32 = 30;
pub const FUTURE_WINDOW_DAYS: u32 = 14;
pub const CLINIC_OPEN_HOUR: u32 = 9;
pub const SLOT_MINUTES: u32 = 30;
/// Share of completed visits whose invoice is already paid.
pub const PAID_RATIO: f64 = 0.8;

pub const ENV_PROJECT_ID: &str = "FIREBASE_PROJECT_ID";
pub const ENV_CREDENTIALS: &str = "FIREBASE_CREDENTIALS";
pub const ENV_EMULATOR_HOST: &str = "FIRESTORE_EMULATOR_HOST";
pub const ENV_SQLITE_PATH: &str = "CLINIC_SEED_DB";
pub const ENV_PATIENT_COUNT: &str = "CLINIC_SEED_PATIENTS";
pub const ENV_RNG_SEED: &str = "CLINIC_SEED_RNG_SEED";
pub const ENV_BATCH_WRITES: &str = "CLINIC_SEED_BATCH";

const MINUTES_PER_DAY: u32 = 24 * 60;

/// Configuration errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("invalid {name}={value:?}: {reason}")]
    InvalidValue {
        name: &'static str,
        value: String,
        reason: String,
    },

    #[error("service-account keys are not exchanged here; supply an OAuth access token in FIREBASE_CREDENTIALS")]
    ServiceAccountUnsupported,

    #[error("invalid seed configuration: {0}")]
    InvalidSeed(String),
}

/// Raw environment values, captured once.
#[derive(Debug, Clone, Default)]
pub struct EnvValues {
    pub project_id: Option<String>,
    pub credentials: Option<String>,
    pub emulator_host: Option<String>,
    pub sqlite_path: Option<String>,
    pub patient_count: Option<String>,
    pub rng_seed: Option<String>,
    pub batch_writes: Option<String>,
}

impl EnvValues {
    /// Read the process environment. Empty values count as unset.
    pub fn from_process_env() -> Self {
        let var = |name: &str| {
            std::env::var(name)
                .ok()
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };
        Self {
            project_id: var(ENV_PROJECT_ID),
            credentials: var(ENV_CREDENTIALS),
            emulator_host: var(ENV_EMULATOR_HOST),
            sqlite_path: var(ENV_SQLITE_PATH),
            patient_count: var(ENV_PATIENT_COUNT),
            rng_seed: var(ENV_RNG_SEED),
            batch_writes: var(ENV_BATCH_WRITES),
        }
    }
}

/// Where documents are read from and written to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreBackend {
    /// Local SQLite document store
    Sqlite { path: PathBuf },
    /// Hosted store (emulator or production)
    Firestore { mode: FirestoreMode },
}

/// Resolved store configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    pub project_id: String,
    pub backend: StoreBackend,
}

impl StoreConfig {
    /// Pick the backend: explicit SQLite path, then emulator, then production
    /// credentials, else the local default file under the demo identity.
    pub fn from_env(env: &EnvValues) -> Result<Self, ConfigError> {
        let credentials = env
            .credentials
            .as_deref()
            .map(parse_credentials)
            .transpose()?;

        let project_id = env
            .project_id
            .clone()
            .or_else(|| credentials.as_ref().and_then(|c| c.project_id.clone()))
            .unwrap_or_else(|| DEFAULT_PROJECT_ID.to_string());

        let backend = if let Some(path) = &env.sqlite_path {
            StoreBackend::Sqlite {
                path: PathBuf::from(path),
            }
        } else if let Some(host) = &env.emulator_host {
            StoreBackend::Firestore {
                mode: FirestoreMode::Emulator { host: host.clone() },
            }
        } else if let Some(credentials) = credentials {
            StoreBackend::Firestore {
                mode: FirestoreMode::Production {
                    access_token: credentials.access_token,
                },
            }
        } else {
            StoreBackend::Sqlite {
                path: PathBuf::from(DEFAULT_DB_PATH),
            }
        };

        Ok(Self {
            project_id,
            backend,
        })
    }

    /// Connect to the configured backend.
    pub fn open(&self) -> StoreResult<Box<dyn DocumentStore>> {
        let store: Box<dyn DocumentStore> = match &self.backend {
            StoreBackend::Sqlite { path } => Box::new(Database::open(path)?),
            StoreBackend::Firestore { mode } => {
                Box::new(FirestoreClient::new(&self.project_id, mode)?)
            }
        };
        Ok(store)
    }
}

impl fmt::Display for StoreConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.backend {
            StoreBackend::Sqlite { path } => {
                write!(f, "sqlite:{} (project {})", path.display(), self.project_id)
            }
            StoreBackend::Firestore {
                mode: FirestoreMode::Emulator { host },
            } => write!(f, "emulator:{} (project {})", host, self.project_id),
            // Never print the token.
            StoreBackend::Firestore {
                mode: FirestoreMode::Production { .. },
            } => write!(f, "production (project {})", self.project_id),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Credentials {
    access_token: String,
    project_id: Option<String>,
}

/// Accept a bare access token or a JSON payload carrying `access_token`.
fn parse_credentials(raw: &str) -> Result<Credentials, ConfigError> {
    let raw = raw.trim();
    if !raw.starts_with('{') {
        return Ok(Credentials {
            access_token: raw.to_string(),
            project_id: None,
        });
    }

    let invalid = |reason: String| ConfigError::InvalidValue {
        name: ENV_CREDENTIALS,
        value: "<redacted>".into(),
        reason,
    };

    let payload: Value =
        serde_json::from_str(raw).map_err(|e| invalid(format!("not valid JSON: {}", e)))?;
    if payload.get("private_key").is_some() {
        return Err(ConfigError::ServiceAccountUnsupported);
    }

    let access_token = payload
        .get("access_token")
        .or_else(|| payload.get("token"))
        .and_then(Value::as_str)
        .filter(|token| !token.is_empty())
        .ok_or_else(|| invalid("missing access_token".into()))?
        .to_string();

    Ok(Credentials {
        access_token,
        project_id: payload
            .get("project_id")
            .and_then(Value::as_str)
            .map(str::to_string),
    })
}

/// Emails of the staff a seed run works for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StaffRoster {
    pub doctors: Vec<String>,
    pub receptionist: Option<String>,
}

impl Default for StaffRoster {
    fn default() -> Self {
        Self {
            doctors: DOCTOR_EMAILS.iter().map(|e| e.to_string()).collect(),
            receptionist: Some(RECEPTIONIST_EMAIL.to_string()),
        }
    }
}

/// Seed run volumes and policies.
#[derive(Debug, Clone, PartialEq)]
pub struct SeedConfig {
    pub roster: StaffRoster,
    pub patient_count: usize,
    pub medicine_count: usize,
    /// Same-day appointments per doctor
    pub today_per_doctor: usize,
    /// Past/future appointments per doctor
    pub other_per_doctor: usize,
    /// Past appointments fall 1..=this many days back
    pub past_window_days: u32,
    /// Future appointments fall 1..=this many days ahead
    pub future_window_days: u32,
    /// First slot of the day (local hour)
    pub open_hour: u32,
    /// Spacing between same-day slots
    pub slot_minutes: u32,
    /// Probability a completed visit's invoice is paid
    pub paid_ratio: f64,
    /// Only write prescriptions for visits that happened
    pub prescriptions_require_visit: bool,
    /// Bill with a sentinel receptionist id when the receptionist is unresolved
    pub placeholder_receptionist: bool,
    /// Write each phase as atomic batches instead of single inserts
    pub batch_writes: bool,
    /// Fixed RNG seed for reproducible runs
    pub rng_seed: Option<u64>,
}

impl Default for SeedConfig {
    fn default() -> Self {
        Self {
            roster: StaffRoster::default(),
            patient_count: PATIENT_COUNT,
            medicine_count: MEDICINE_COUNT,
            today_per_doctor: TODAY_APPOINTMENTS_PER_DOCTOR,
            other_per_doctor: OTHER_APPOINTMENTS_PER_DOCTOR,
            past_window_days: PAST_WINDOW_DAYS,
            future_window_days: FUTURE_WINDOW_DAYS,
            open_hour: CLINIC_OPEN_HOUR,
            slot_minutes: SLOT_MINUTES,
            paid_ratio: PAID_RATIO,
            prescriptions_require_visit: true,
            placeholder_receptionist: false,
            batch_writes: true,
            rng_seed: None,
        }
    }
}

impl SeedConfig {
    /// Apply `CLINIC_SEED_*` overrides.
    pub fn with_env_overrides(mut self, env: &EnvValues) -> Result<Self, ConfigError> {
        if let Some(value) = &env.patient_count {
            self.patient_count = value.parse().map_err(|e| ConfigError::InvalidValue {
                name: ENV_PATIENT_COUNT,
                value: value.clone(),
                reason: format!("{}", e),
            })?;
        }
        if let Some(value) = &env.rng_seed {
            self.rng_seed = Some(value.parse().map_err(|e| ConfigError::InvalidValue {
                name: ENV_RNG_SEED,
                value: value.clone(),
                reason: format!("{}", e),
            })?);
        }
        if let Some(value) = &env.batch_writes {
            self.batch_writes = parse_bool(value).ok_or_else(|| ConfigError::InvalidValue {
                name: ENV_BATCH_WRITES,
                value: value.clone(),
                reason: "expected true/false".into(),
            })?;
        }
        Ok(self)
    }

    /// Reject settings the generators cannot honour.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.slot_minutes == 0 {
            return Err(ConfigError::InvalidSeed("slot_minutes must be positive".into()));
        }
        if self.open_hour >= 24 {
            return Err(ConfigError::InvalidSeed(format!(
                "open_hour {} is not an hour of the day",
                self.open_hour
            )));
        }
        let day_end = u64::from(self.open_hour) * 60
            + self.today_per_doctor as u64 * u64::from(self.slot_minutes);
        if day_end > u64::from(MINUTES_PER_DAY) {
            return Err(ConfigError::InvalidSeed(format!(
                "{} slots of {} minutes from {:02}:00 run past midnight",
                self.today_per_doctor, self.slot_minutes, self.open_hour
            )));
        }
        if self.past_window_days == 0 || self.future_window_days == 0 {
            return Err(ConfigError::InvalidSeed(
                "past and future windows must span at least one day".into(),
            ));
        }
        if !(0.0..=1.0).contains(&self.paid_ratio) {
            return Err(ConfigError::InvalidSeed(format!(
                "paid_ratio {} outside 0..=1",
                self.paid_ratio
            )));
        }
        Ok(())
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_local_demo() {
        let config = StoreConfig::from_env(&EnvValues::default()).unwrap();
        assert_eq!(config.project_id, DEFAULT_PROJECT_ID);
        assert_eq!(
            config.backend,
            StoreBackend::Sqlite {
                path: PathBuf::from(DEFAULT_DB_PATH)
            }
        );
    }

    #[test]
    fn test_emulator_wins_over_credentials() {
        let env = EnvValues {
            emulator_host: Some("localhost:8080".into()),
            credentials: Some("ya29.token".into()),
            project_id: Some("clinic-dev".into()),
            ..Default::default()
        };
        let config = StoreConfig::from_env(&env).unwrap();
        assert_eq!(config.project_id, "clinic-dev");
        assert_eq!(
            config.backend,
            StoreBackend::Firestore {
                mode: FirestoreMode::Emulator {
                    host: "localhost:8080".into()
                }
            }
        );
    }

    #[test]
    fn test_sqlite_path_wins_over_everything() {
        let env = EnvValues {
            sqlite_path: Some("/tmp/seed.db".into()),
            emulator_host: Some("localhost:8080".into()),
            ..Default::default()
        };
        let config = StoreConfig::from_env(&env).unwrap();
        assert!(matches!(config.backend, StoreBackend::Sqlite { .. }));
    }

    #[test]
    fn test_json_credentials_supply_project() {
        let env = EnvValues {
            credentials: Some(r#"{"access_token": "ya29.abc", "project_id": "clinic-prod"}"#.into()),
            ..Default::default()
        };
        let config = StoreConfig::from_env(&env).unwrap();
        assert_eq!(config.project_id, "clinic-prod");
        assert_eq!(
            config.backend,
            StoreBackend::Firestore {
                mode: FirestoreMode::Production {
                    access_token: "ya29.abc".into()
                }
            }
        );
        // The token never shows up in logs.
        assert_eq!(config.to_string(), "production (project clinic-prod)");
    }

    #[test]
    fn test_service_account_rejected() {
        let env = EnvValues {
            credentials: Some(r#"{"type": "service_account", "private_key": "-----BEGIN"}"#.into()),
            ..Default::default()
        };
        assert!(matches!(
            StoreConfig::from_env(&env),
            Err(ConfigError::ServiceAccountUnsupported)
        ));
    }

    #[test]
    fn test_credentials_without_token_rejected() {
        let env = EnvValues {
            credentials: Some(r#"{"project_id": "p"}"#.into()),
            ..Default::default()
        };
        assert!(matches!(
            StoreConfig::from_env(&env),
            Err(ConfigError::InvalidValue { .. })
        ));
    }

    #[test]
    fn test_seed_overrides() {
        let env = EnvValues {
            patient_count: Some("5".into()),
            rng_seed: Some("42".into()),
            batch_writes: Some("false".into()),
            ..Default::default()
        };
        let config = SeedConfig::default().with_env_overrides(&env).unwrap();
        assert_eq!(config.patient_count, 5);
        assert_eq!(config.rng_seed, Some(42));
        assert!(!config.batch_writes);

        let bad = EnvValues {
            patient_count: Some("many".into()),
            ..Default::default()
        };
        assert!(SeedConfig::default().with_env_overrides(&bad).is_err());
    }

    #[test]
    fn test_default_seed_config_valid() {
        assert!(SeedConfig::default().validate().is_ok());
    }

    #[test]
    fn test_slots_past_midnight_rejected() {
        let config = SeedConfig {
            today_per_doctor: 40,
            open_hour: 9,
            slot_minutes: 30,
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::InvalidSeed(_))));

        // Exactly filling the day is allowed.
        let config = SeedConfig {
            today_per_doctor: 30,
            open_hour: 9,
            slot_minutes: 30,
            ..Default::default()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_paid_ratio_bounds() {
        let config = SeedConfig {
            paid_ratio: 1.5,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }
}
