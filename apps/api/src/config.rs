use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use anyhow::{bail, Context, Result};

use crate::care::schedule::Cadence;
use crate::catalog::search::DEFAULT_SEARCH_LIMIT;
use crate::session::idle::IdleConfig;

const DEFAULT_IMAGE_ROOT: &str = "plants_local_examples";

/// Application configuration loaded from environment variables.
/// Startup fails if a variable is present but malformed.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub rust_log: String,
    /// `None` serves the dataset compiled into the binary.
    pub dataset_path: Option<PathBuf>,
    pub image_root: String,
    pub search_limit: usize,
    pub default_cadence: Cadence,
    /// Let a resolved guide's `cadenceDays` override the defaults.
    pub species_cadence: bool,
    pub idle: IdleConfig,
    pub auth_sign_out_url: Option<String>,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let default_cadence = Cadence {
            water_days: parse_or(&var, "WATER_CADENCE_DAYS", Cadence::default().water_days)?,
            fertilizer_days: parse_or(
                &var,
                "FERTILIZER_CADENCE_DAYS",
                Cadence::default().fertilizer_days,
            )?,
        };
        if default_cadence.water_days == 0 || default_cadence.fertilizer_days == 0 {
            bail!("Cadence days must be at least 1");
        }

        let idle = IdleConfig {
            warn_after: Duration::from_millis(parse_or(
                &var,
                "IDLE_WARN_AFTER_MS",
                millis(IdleConfig::default().warn_after),
            )?),
            sign_out_after: Duration::from_millis(parse_or(
                &var,
                "IDLE_SIGN_OUT_AFTER_MS",
                millis(IdleConfig::default().sign_out_after),
            )?),
        };
        if idle.warn_after.is_zero() {
            bail!("IDLE_WARN_AFTER_MS must be greater than zero");
        }
        if idle.warn_after >= idle.sign_out_after {
            bail!("IDLE_WARN_AFTER_MS must be less than IDLE_SIGN_OUT_AFTER_MS");
        }

        Ok(Config {
            port: parse_or(&var, "PORT", 8080)?,
            rust_log: var("RUST_LOG").unwrap_or_else(|| "info".to_string()),
            dataset_path: var("PLANT_DATASET_PATH").map(PathBuf::from),
            image_root: var("PLANT_IMAGE_ROOT").unwrap_or_else(|| DEFAULT_IMAGE_ROOT.to_string()),
            search_limit: parse_or(&var, "SEARCH_LIMIT", DEFAULT_SEARCH_LIMIT)?,
            default_cadence,
            species_cadence: parse_flag(&var, "SPECIES_CADENCE", true)?,
            idle,
            auth_sign_out_url: var("AUTH_SIGN_OUT_URL"),
        })
    }
}

fn parse_or<T, F>(var: &F, key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
    F: Fn(&str) -> Option<String>,
{
    match var(key) {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("{key} must be a valid number, got '{raw}'")),
        None => Ok(default),
    }
}

fn parse_flag<F>(var: &F, key: &str, default: bool) -> Result<bool>
where
    F: Fn(&str) -> Option<String>,
{
    match var(key).map(|v| v.trim().to_ascii_lowercase()) {
        None => Ok(default),
        Some(v) => match v.as_str() {
            "1" | "true" | "yes" | "on" => Ok(true),
            "0" | "false" | "no" | "off" => Ok(false),
            _ => bail!("{key} must be true or false, got '{v}'"),
        },
    }
}

fn millis(d: Duration) -> u64 {
    u64::try_from(d.as_millis()).unwrap_or(u64::MAX)
}
