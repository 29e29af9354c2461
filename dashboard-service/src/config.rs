use serde::Deserialize;
use std::fs;
use time::Date;

use crate::transform::FallbackRange;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum UpstreamKind {
    #[default]
    Http,
    Fixtures,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpstreamConfig {
    #[serde(default)]
    pub kind: UpstreamKind,
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
    /// Root of the fixture tree when `kind = "fixtures"`.
    #[serde(default = "default_fixtures_dir")]
    pub fixtures_dir: String,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            kind: UpstreamKind::default(),
            base_url: default_base_url(),
            timeout_ms: default_timeout_ms(),
            fixtures_dir: default_fixtures_dir(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_api_bind_addr")]
    pub bind_addr: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            bind_addr: default_api_bind_addr(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CalendarConfig {
    /// Pinned "today" (`YYYY-MM-DD`); the current UTC date when absent.
    #[serde(default, with = "iso_date_opt")]
    pub today: Option<Date>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FallbackConfig {
    #[serde(default = "default_meter_baseline")]
    pub meter_baseline: f64,
    #[serde(default = "default_spread")]
    pub meter_spread: f64,
    #[serde(default = "default_city_baseline")]
    pub city_baseline: f64,
    #[serde(default = "default_spread")]
    pub city_spread: f64,
    /// Fixed RNG seed for reproducible fallback series.
    #[serde(default)]
    pub seed: Option<u64>,
}

impl FallbackConfig {
    pub fn meter_range(&self) -> FallbackRange {
        FallbackRange {
            baseline: self.meter_baseline,
            spread: self.meter_spread,
        }
    }

    pub fn city_range(&self) -> FallbackRange {
        FallbackRange {
            baseline: self.city_baseline,
            spread: self.city_spread,
        }
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        for (name, range) in [("meter", self.meter_range()), ("city", self.city_range())] {
            if !range.is_valid() {
                anyhow::bail!(
                    "fallback.{name}_baseline/{name}_spread must be finite with a non-negative spread, got {} + {}",
                    range.baseline,
                    range.spread
                );
            }
        }
        Ok(())
    }
}

impl Default for FallbackConfig {
    fn default() -> Self {
        Self {
            meter_baseline: default_meter_baseline(),
            meter_spread: default_spread(),
            city_baseline: default_city_baseline(),
            city_spread: default_spread(),
            seed: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct TariffConfig {
    #[serde(default = "default_previous_cost")]
    pub previous_cost: u32,
}

impl Default for TariffConfig {
    fn default() -> Self {
        Self {
            previous_cost: default_previous_cost(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct MetricsConfig {
    pub bind_addr: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub upstream: UpstreamConfig,
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub calendar: CalendarConfig,
    #[serde(default)]
    pub fallback: FallbackConfig,
    #[serde(default)]
    pub tariff: TariffConfig,
    pub metrics: Option<MetricsConfig>,
}

impl AppConfig {
    pub fn load() -> anyhow::Result<Self> {
        use std::env;

        let path = env::var("DASHBOARD_CONFIG").unwrap_or_else(|_| "dashboard-config.toml".to_string());
        let contents = fs::read_to_string(&path)?;
        Self::from_toml(&contents)
    }

    pub fn from_toml(contents: &str) -> anyhow::Result<Self> {
        let cfg: AppConfig = toml::from_str(contents)?;
        cfg.fallback.validate()?;
        Ok(cfg)
    }
}

fn default_base_url() -> String {
    "http://127.0.0.1:5000".to_string()
}

fn default_timeout_ms() -> u64 {
    10_000
}

fn default_fixtures_dir() -> String {
    "fixtures".to_string()
}

fn default_api_bind_addr() -> String {
    "0.0.0.0:8080".to_string()
}

fn default_meter_baseline() -> f64 {
    20.0
}

fn default_city_baseline() -> f64 {
    200.0
}

fn default_spread() -> f64 {
    50.0
}

fn default_previous_cost() -> u32 {
    1200
}

mod iso_date_opt {
    use serde::{Deserialize, Deserializer};
    use time::{macros::format_description, Date};

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<Date>, D::Error> {
        let raw: Option<String> = Option::deserialize(deserializer)?;
        raw.map(|s| {
            Date::parse(s.trim(), format_description!("[year]-[month]-[day]"))
                .map_err(|e| serde::de::Error::custom(format!("invalid date '{s}': {e}")))
        })
        .transpose()
    }
}
