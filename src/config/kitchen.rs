//! Runtime configuration of a kitchen.

use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::core::KitchenError;

/// Prefix of environment variables that override file values.
pub const ENV_PREFIX: &str = "KITCHEN_";

const fn default_time_unit_ms() -> u64 {
    250
}
const fn default_nr_of_tables() -> u32 {
    10
}
const fn default_max_order_items_count() -> usize {
    10
}
const fn default_ctx_switch_factor() -> u32 {
    3
}
const fn default_nr_of_concurrent_orders() -> usize {
    2
}
const fn default_dispatch_retry_ms() -> u64 {
    10
}
fn default_dining_hall_url() -> String {
    "http://dining-hall:8080".into()
}
fn default_kitchen_port() -> String {
    "8081".into()
}
fn default_reference_dir() -> PathBuf {
    PathBuf::from("config")
}
const fn default_max_attempts() -> u32 {
    5
}
const fn default_initial_backoff_ms() -> u64 {
    100
}
const fn default_max_backoff_ms() -> u64 {
    5_000
}

/// How completed distributions are delivered to the dining hall.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeliveryConfig {
    /// Attempts before a distribution is dead-lettered.
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
    /// Wait after the first failure; doubles on each retry.
    #[serde(default = "default_initial_backoff_ms")]
    pub initial_backoff_ms: u64,
    /// Upper bound on the wait between attempts.
    #[serde(default = "default_max_backoff_ms")]
    pub max_backoff_ms: u64,
    /// JSONL file receiving undeliverable distributions.
    #[serde(default)]
    pub dead_letter_path: Option<PathBuf>,
}

impl Default for DeliveryConfig {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            initial_backoff_ms: default_initial_backoff_ms(),
            max_backoff_ms: default_max_backoff_ms(),
            dead_letter_path: None,
        }
    }
}

impl DeliveryConfig {
    /// Validate delivery settings.
    pub fn validate(&self) -> Result<(), String> {
        if self.max_attempts == 0 {
            return Err("max_attempts must be greater than 0".into());
        }
        if self.initial_backoff_ms > self.max_backoff_ms {
            return Err("initial_backoff_ms must not exceed max_backoff_ms".into());
        }
        Ok(())
    }
}

/// Root kitchen configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KitchenConfig {
    /// Wall-clock length of one simulation time unit.
    #[serde(default = "default_time_unit_ms", alias = "time_unit")]
    pub time_unit_ms: u64,
    /// Tables in the dining hall.
    #[serde(default = "default_nr_of_tables")]
    pub nr_of_tables: u32,
    /// Largest accepted order.
    #[serde(default = "default_max_order_items_count")]
    pub max_order_items_count: usize,
    /// Number of slices a task's preparation time is cut into.
    #[serde(default = "default_ctx_switch_factor")]
    pub ctx_switch_factor: u32,
    /// Orders cooked at the same time.
    #[serde(default = "default_nr_of_concurrent_orders")]
    pub nr_of_concurrent_orders: usize,
    /// Longest wait before the dispatcher rescans the cooks.
    #[serde(default = "default_dispatch_retry_ms")]
    pub dispatch_retry_ms: u64,
    /// Longest wait before a cook retries a busy apparatus; one time unit
    /// when absent.
    #[serde(default)]
    pub apparatus_retry_ms: Option<u64>,
    /// Drop queued orders that waited longer than their `max_wait`.
    #[serde(default)]
    pub enforce_max_wait: bool,
    /// Base URL of the dining hall.
    #[serde(default = "default_dining_hall_url")]
    pub dining_hall_url: String,
    /// Port the kitchen listens on.
    #[serde(default = "default_kitchen_port")]
    pub kitchen_port: String,
    /// Directory holding `menu.json`, `cooks.json` and `apparatuses.json`.
    #[serde(default = "default_reference_dir")]
    pub reference_dir: PathBuf,
    /// Delivery policy.
    #[serde(default)]
    pub delivery: DeliveryConfig,
}

impl Default for KitchenConfig {
    fn default() -> Self {
        Self {
            time_unit_ms: default_time_unit_ms(),
            nr_of_tables: default_nr_of_tables(),
            max_order_items_count: default_max_order_items_count(),
            ctx_switch_factor: default_ctx_switch_factor(),
            nr_of_concurrent_orders: default_nr_of_concurrent_orders(),
            dispatch_retry_ms: default_dispatch_retry_ms(),
            apparatus_retry_ms: None,
            enforce_max_wait: false,
            dining_hall_url: default_dining_hall_url(),
            kitchen_port: default_kitchen_port(),
            reference_dir: default_reference_dir(),
            delivery: DeliveryConfig::default(),
        }
    }
}

impl KitchenConfig {
    /// Validate every value.
    pub fn validate(&self) -> Result<(), String> {
        if self.time_unit_ms == 0 {
            return Err("time_unit_ms must be greater than 0".into());
        }
        if self.nr_of_tables == 0 {
            return Err("nr_of_tables must be greater than 0".into());
        }
        if self.max_order_items_count == 0 {
            return Err("max_order_items_count must be greater than 0".into());
        }
        if self.ctx_switch_factor == 0 {
            return Err("ctx_switch_factor must be greater than 0".into());
        }
        if self.nr_of_concurrent_orders == 0 {
            return Err("nr_of_concurrent_orders must be greater than 0".into());
        }
        if self.dispatch_retry_ms == 0 {
            return Err("dispatch_retry_ms must be greater than 0".into());
        }
        if self.apparatus_retry_ms == Some(0) {
            return Err("apparatus_retry_ms must be greater than 0".into());
        }
        if self.kitchen_port.parse::<u16>().is_err() {
            return Err(format!("kitchen_port `{}` is not a port number", self.kitchen_port));
        }
        self.delivery
            .validate()
            .map_err(|e| format!("delivery invalid: {e}"))
    }

    /// Parse configuration from a JSON string and validate.
    pub fn from_json_str(input: &str) -> Result<Self, String> {
        let cfg: Self = serde_json::from_str(input).map_err(|e| format!("parse error: {e}"))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Read a JSON file, apply `KITCHEN_*` overrides, and validate.
    ///
    /// # Errors
    ///
    /// `Io` if the file cannot be read, `Config` if it does not parse or
    /// the result is invalid.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, KitchenError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)?;
        let mut cfg: Self = serde_json::from_str(&raw)
            .map_err(|e| KitchenError::Config(format!("{}: {e}", path.display())))?;
        cfg.apply_env().map_err(KitchenError::Config)?;
        cfg.validate().map_err(KitchenError::Config)?;
        Ok(cfg)
    }

    /// Override values from the process environment (`.env` included).
    pub fn apply_env(&mut self) -> Result<(), String> {
        self.apply_overrides(|key| dotenvy::var(key).ok())
    }

    /// Override values from `lookup`, keyed by `KITCHEN_<FIELD>`.
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<(), String>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(&format!("{ENV_PREFIX}{name}"));
        override_parsed(&var, "TIME_UNIT_MS", &mut self.time_unit_ms)?;
        override_parsed(&var, "NR_OF_TABLES", &mut self.nr_of_tables)?;
        override_parsed(&var, "MAX_ORDER_ITEMS_COUNT", &mut self.max_order_items_count)?;
        override_parsed(&var, "CTX_SWITCH_FACTOR", &mut self.ctx_switch_factor)?;
        override_parsed(&var, "NR_OF_CONCURRENT_ORDERS", &mut self.nr_of_concurrent_orders)?;
        override_parsed(&var, "DISPATCH_RETRY_MS", &mut self.dispatch_retry_ms)?;
        override_parsed(&var, "ENFORCE_MAX_WAIT", &mut self.enforce_max_wait)?;
        if let Some(ms) = var("APPARATUS_RETRY_MS") {
            self.apparatus_retry_ms = Some(parse_value("APPARATUS_RETRY_MS", &ms)?);
        }
        if let Some(url) = var("DINING_HALL_URL") {
            self.dining_hall_url = url;
        }
        if let Some(port) = var("PORT") {
            self.kitchen_port = port;
        }
        if let Some(dir) = var("REFERENCE_DIR") {
            self.reference_dir = PathBuf::from(dir);
        }
        if let Some(path) = var("DEAD_LETTER_PATH") {
            self.delivery.dead_letter_path = Some(PathBuf::from(path));
        }
        Ok(())
    }

    /// Length of one time unit.
    #[must_use]
    pub const fn time_unit(&self) -> Duration {
        Duration::from_millis(self.time_unit_ms)
    }

    /// Dispatcher rescan interval.
    #[must_use]
    pub const fn dispatch_retry(&self) -> Duration {
        Duration::from_millis(self.dispatch_retry_ms)
    }

    /// Apparatus retry interval.
    #[must_use]
    pub fn apparatus_retry(&self) -> Duration {
        Duration::from_millis(self.apparatus_retry_ms.unwrap_or(self.time_unit_ms))
    }
}

fn parse_value<T: FromStr>(name: &str, raw: &str) -> Result<T, String>
where
    T::Err: std::fmt::Display,
{
    raw.trim()
        .parse()
        .map_err(|e| format!("{ENV_PREFIX}{name}=`{raw}`: {e}"))
}

fn override_parsed<T: FromStr>(
    var: &impl Fn(&str) -> Option<String>,
    name: &str,
    target: &mut T,
) -> Result<(), String>
where
    T::Err: std::fmt::Display,
{
    if let Some(raw) = var(name) {
        *target = parse_value(name, &raw)?;
    }
    Ok(())
}
