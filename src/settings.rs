use std::time::Duration;

use config::{Config, ConfigError, Environment, File, FileFormat};
use robus_navigation::{FollowParams, TrackerConfig};
use serde::Deserialize;
use tracing::{error, info};

pub const DEFAULT_CONFIG_PATH: &str = "config/default.toml";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub control: ControlSettings,
    pub follow: FollowParams,
    pub mission: MissionSettings,
    pub sim: SimSettings,
    pub telemetry: TelemetrySettings,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ControlSettings {
    /// Control loop rate (Hz)
    pub tick_hz: f64,
    /// Integration slices per tick
    pub substeps: u32,
}

impl Default for ControlSettings {
    fn default() -> Self {
        ControlSettings { tick_hz: 100.0, substeps: 1 }
    }
}

impl ControlSettings {
    /// Control loop period. Fails when `tick_hz` is not positive, or so small
    /// that the period does not fit a `Duration`.
    pub fn period(&self) -> anyhow::Result<Duration> {
        anyhow::ensure!(
            self.tick_hz.is_finite() && self.tick_hz > 0.0,
            "control.tick_hz must be positive, got {}",
            self.tick_hz
        );
        Ok(Duration::try_from_secs_f64(1.0 / self.tick_hz)?)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MissionSettings {
    /// Points visited in order, as `[x, y]`
    pub waypoints: Vec<[f64; 2]>,
    /// Distance at which a waypoint counts as visited
    pub arrival_radius: f64,
    /// Give up on a waypoint after this many seconds
    pub waypoint_timeout_s: f64,
}

impl Default for MissionSettings {
    fn default() -> Self {
        MissionSettings {
            waypoints: Vec::new(),
            arrival_radius: 0.05,
            waypoint_timeout_s: 30.0,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SimSettings {
    /// Linear acceleration limit of the simulated drivetrain
    pub max_accel: f64,
    /// Angular acceleration limit (rad/s²)
    pub max_angular_accel: f64,
    /// Heading at start-up (rad)
    pub initial_orientation: f64,
}

impl Default for SimSettings {
    fn default() -> Self {
        SimSettings {
            max_accel: 2.0,
            max_angular_accel: 4.0,
            initial_orientation: 0.0,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TelemetrySettings {
    /// Publish a snapshot every `log_every` ticks
    pub log_every: u32,
}

impl Default for TelemetrySettings {
    fn default() -> Self {
        TelemetrySettings { log_every: 50 }
    }
}

impl Settings {
    pub fn tracker_config(&self) -> TrackerConfig {
        TrackerConfig {
            substeps: self.control.substeps,
            follow: self.follow,
        }
    }

    /// Checks the values the host itself depends on. Follow tuning is left alone.
    pub fn validate(&self) -> anyhow::Result<()> {
        self.control.period()?;
        anyhow::ensure!(
            self.mission.waypoint_timeout_s.is_finite() && self.mission.waypoint_timeout_s >= 0.0,
            "mission.waypoint_timeout_s must be non-negative, got {}",
            self.mission.waypoint_timeout_s
        );
        self.tracker_config().substeps()?;
        Ok(())
    }
}

pub fn load_config(path: &str) -> Result<Config, ConfigError> {
    info!("Attempting to load configuration from {}", path);

    let settings = Config::builder()
        .add_source(File::new(path, FileFormat::Toml).required(true))
        .add_source(Environment::with_prefix("ROBUS").prefix_separator("_").separator("__"))
        .build();

    match settings {
        Ok(config) => {
            info!("Successfully loaded configuration: {:?}", config);
            Ok(config)
        }
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            Err(e)
        }
    }
}

pub fn load_settings(path: &str) -> anyhow::Result<Settings> {
    let settings: Settings = load_config(path)?.try_deserialize()?;
    settings.validate()?;
    Ok(settings)
}
