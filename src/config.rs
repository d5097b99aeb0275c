use anyhow::{Context, Result};
use chrono::{Duration, NaiveTime};
use chrono_tz::Tz;
use serde::Deserialize;
use std::path::{Path, PathBuf};

use agenda_core::adapters::AdapterKind;
use agenda_core::resolve::ResolveOptions;

#[derive(Debug, Deserialize)]
pub struct Config {
    /// Target timezone for every resolved instant
    #[serde(default = "default_timezone")]
    pub timezone: String,

    /// Retention horizon: keep events up to this many days ahead
    #[serde(default = "default_horizon_days")]
    pub horizon_days: i64,

    /// Event duration when a source publishes no end time
    #[serde(default = "default_duration_hours")]
    pub default_duration_hours: i64,

    /// Time of day assumed when a source publishes only a date (HH:MM)
    #[serde(default = "default_time")]
    pub default_time: String,

    /// Calendar display name (X-WR-CALNAME)
    #[serde(default = "default_calendar_name")]
    pub calendar_name: String,

    /// Output .ics path
    #[serde(default = "default_output")]
    pub output: PathBuf,

    /// Venues to aggregate
    #[serde(default = "default_sources")]
    pub sources: Vec<SourceConfig>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SourceConfig {
    pub name: String,
    pub url: String,
    pub adapter: AdapterKind,
    pub location: String,
}

fn default_timezone() -> String {
    "Europe/Madrid".to_string()
}

fn default_horizon_days() -> i64 {
    14
}

fn default_duration_hours() -> i64 {
    2
}

fn default_time() -> String {
    "20:00".to_string()
}

fn default_calendar_name() -> String {
    "Agenda Cultural BCN".to_string()
}

fn default_output() -> PathBuf {
    PathBuf::from("AgendaCulturalBCN.ics")
}

fn default_sources() -> Vec<SourceConfig> {
    let source = |name: &str, url: &str, adapter, location: &str| SourceConfig {
        name: name.to_string(),
        url: url.to_string(),
        adapter,
        location: location.to_string(),
    };

    vec![
        source(
            "Zumzeig",
            "https://zumzeigcine.coop/es/cine/calendari/",
            AdapterKind::Zumzeig,
            "Cine Zumzeig",
        ),
        source(
            "Sala Beckett",
            "https://www.salabeckett.cat/espectacles/",
            AdapterKind::Beckett,
            "Sala Beckett",
        ),
        source(
            "Renoir Floridablanca",
            "https://www.cinesrenoir.com/cine/renoir-floridablanca/cartelera/",
            AdapterKind::Renoir,
            "Cine Renoir Floridablanca",
        ),
        source(
            "CCCB",
            "https://www.cccb.org/ca/programa",
            AdapterKind::Cccb,
            "CCCB",
        ),
    ]
}

impl Default for Config {
    fn default() -> Self {
        Config {
            timezone: default_timezone(),
            horizon_days: default_horizon_days(),
            default_duration_hours: default_duration_hours(),
            default_time: default_time(),
            calendar_name: default_calendar_name(),
            output: default_output(),
            sources: default_sources(),
        }
    }
}

impl Config {
    pub fn timezone(&self) -> Result<Tz> {
        self.timezone
            .parse()
            .map_err(|_| anyhow::anyhow!("Unknown timezone '{}' in config", self.timezone))
    }

    pub fn default_time(&self) -> Result<NaiveTime> {
        NaiveTime::parse_from_str(&self.default_time, "%H:%M").with_context(|| {
            format!(
                "Invalid default_time '{}' in config. Expected HH:MM",
                self.default_time
            )
        })
    }

    pub fn default_duration(&self) -> Result<Duration> {
        if self.default_duration_hours <= 0 {
            anyhow::bail!(
                "default_duration_hours must be positive, got {}",
                self.default_duration_hours
            );
        }
        Ok(Duration::hours(self.default_duration_hours))
    }

    pub fn resolve_options(&self) -> Result<ResolveOptions> {
        Ok(ResolveOptions {
            timezone: self.timezone()?,
            default_time: self.default_time()?,
        })
    }
}

/// Fallback config file path (~/.config/agenda/agenda.toml)
fn user_config_path() -> Option<PathBuf> {
    Some(dirs::config_dir()?.join("agenda").join("agenda.toml"))
}

/// Load configuration.
///
/// An explicit `--config` path must exist. Otherwise `agenda.toml` in
/// the working directory is tried, then the user config directory, and
/// finally the built-in defaults (the four Barcelona venues).
pub fn load_config(path: Option<&Path>) -> Result<Config> {
    let path = match path {
        Some(explicit) => {
            if !explicit.exists() {
                anyhow::bail!("Config file not found at {}", explicit.display());
            }
            explicit.to_path_buf()
        }
        None => {
            let local = PathBuf::from("agenda.toml");
            if local.exists() {
                local
            } else if let Some(user) = user_config_path().filter(|p| p.exists()) {
                user
            } else {
                return Ok(Config::default());
            }
        }
    };

    let contents = std::fs::read_to_string(&path)
        .with_context(|| format!("Failed to read config file at {}", path.display()))?;

    let config: Config = toml::from_str(&contents)
        .with_context(|| format!("Failed to parse config file at {}", path.display()))?;

    Ok(config)
}
