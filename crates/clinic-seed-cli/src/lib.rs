//! Shared start-up for the `clinic-seed` and `clinic-inspect` binaries.
//!
//! Both binaries load `.env`, install the same `tracing` subscriber and pick
//! the document store backend the same way, in that order: `.env` first so a
//! `RUST_LOG` set there reaches the subscriber.

pub mod render;

use anyhow::Context;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use clinic_seed_core::config::EnvValues;
use clinic_seed_core::{DocumentStore, SeedConfig, StoreConfig};

/// Directive applied on top of `RUST_LOG`.
pub const DEFAULT_LOG_DIRECTIVE: &str = "clinic_seed=info";

/// Configuration captured once at start-up.
#[derive(Debug, Clone)]
pub struct Environment {
    pub store: StoreConfig,
    pub seed: SeedConfig,
}

impl Environment {
    /// Build from already-captured values.
    pub fn from_values(env: &EnvValues) -> anyhow::Result<Self> {
        let store = StoreConfig::from_env(env).context("invalid document store configuration")?;
        let seed = SeedConfig::default()
            .with_env_overrides(env)
            .context("invalid seed configuration")?;
        Ok(Self { store, seed })
    }

    /// Read the process environment. Call after `.env` has been loaded.
    pub fn load() -> anyhow::Result<Self> {
        Self::from_values(&EnvValues::from_process_env())
    }

    /// Connect to the configured backend.
    pub fn open_store(&self) -> anyhow::Result<Box<dyn DocumentStore>> {
        tracing::info!(store = %self.store, "opening document store");
        self.store
            .open()
            .with_context(|| format!("failed to open document store {}", self.store))
    }
}

/// Load `.env`, install logging, then read configuration.
pub fn startup() -> anyhow::Result<Environment> {
    dotenvy::dotenv().ok();
    init_logging()?;
    Environment::load()
}

/// Filter built from a `RUST_LOG` value plus [`DEFAULT_LOG_DIRECTIVE`].
pub fn log_filter(rust_log: Option<&str>) -> anyhow::Result<EnvFilter> {
    let filter = match rust_log {
        Some(directives) => EnvFilter::try_new(directives)?,
        None => EnvFilter::default(),
    };
    Ok(filter.add_directive(DEFAULT_LOG_DIRECTIVE.parse()?))
}

/// Install the stderr `fmt` subscriber filtered by `RUST_LOG` plus
/// [`DEFAULT_LOG_DIRECTIVE`].
pub fn init_logging() -> anyhow::Result<()> {
    let rust_log = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    tracing_subscriber::registry()
        .with(log_filter(rust_log.as_deref())?)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .try_init()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clinic_seed_core::config::StoreBackend;

    #[test]
    fn test_environment_opens_sqlite_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("seed.db");
        let values = EnvValues {
            sqlite_path: Some(path.display().to_string()),
            patient_count: Some("3".into()),
            ..EnvValues::default()
        };

        let env = Environment::from_values(&values).unwrap();
        assert!(matches!(env.store.backend, StoreBackend::Sqlite { .. }));
        assert_eq!(env.seed.patient_count, 3);

        let store = env.open_store().unwrap();
        assert_eq!(store.count("patients").unwrap(), 0);
        assert!(path.exists());
    }

    #[test]
    fn test_log_filter_keeps_rust_log_directives() {
        let filter = log_filter(Some("clinic_seed_core=trace")).unwrap().to_string();
        assert!(filter.contains("clinic_seed_core=trace"));
        assert!(filter.contains(DEFAULT_LOG_DIRECTIVE));

        let filter = log_filter(None).unwrap().to_string();
        assert!(filter.contains(DEFAULT_LOG_DIRECTIVE));
    }

    #[test]
    fn test_bad_override_is_reported() {
        let values = EnvValues {
            rng_seed: Some("not-a-number".into()),
            ..EnvValues::default()
        };
        let err = Environment::from_values(&values).unwrap_err();
        assert!(format!("{:#}", err).contains("CLINIC_SEED_RNG_SEED"));
    }
}
