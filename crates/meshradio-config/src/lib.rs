//! Station configuration for MeshRadio consoles.
//!
//! TOML profiles layered with environment overrides, and translation to
//! `meshradio_core::StationConfig`. The core never reads files; this crate
//! does, and hands it a finished runtime config.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

use meshradio_core::config::DEFAULT_STATION_URL;
use meshradio_core::{ReconnectPolicy, StationConfig};

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("no profile named '{name}'")]
    UnknownProfile { name: String },

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level TOML configuration.
#[derive(Debug, Deserialize, Serialize)]
pub struct Config {
    /// Profile used when none is named explicitly.
    pub default_profile: Option<String>,

    /// Global defaults.
    #[serde(default)]
    pub defaults: Defaults,

    /// Named station profiles.
    #[serde(default)]
    pub profiles: HashMap<String, Profile>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_profile: Some("default".into()),
            defaults: Defaults::default(),
            profiles: HashMap::new(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize)]
pub struct Defaults {
    #[serde(default)]
    pub insecure: bool,

    /// Command request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout: u64,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            insecure: false,
            timeout: default_timeout(),
        }
    }
}

fn default_timeout() -> u64 {
    10
}

/// A named station profile.
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct Profile {
    /// Station GUI server origin (e.g., "http://[200:1234::1]:8080").
    pub station: String,

    /// Status stream URL, when it is not `ws(s)://<station>/ws`.
    pub stream_url: Option<String>,

    /// Override insecure TLS setting.
    pub insecure: Option<bool>,

    /// Override timeout.
    pub timeout: Option<u64>,

    /// Port shown next to the broadcast address.
    pub broadcast_port: Option<u16>,

    /// Reconnection delay unit in milliseconds.
    pub reconnect_base_ms: Option<u64>,

    /// Reconnection attempts before giving up.
    pub reconnect_max_attempts: Option<u32>,
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("org", "meshradio", "meshradio").map_or_else(
        || {
            let mut p = dirs_fallback();
            p.push("config.toml");
            p
        },
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

fn dirs_fallback() -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(".config");
    p.push("meshradio");
    p
}

// ── Config loading ──────────────────────────────────────────────────

/// Load the full Config from the canonical file + environment.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

/// Load the full Config from `path` + environment. A missing file is not
/// an error; defaults apply.
///
/// Environment variables use the `MESHRADIO_` prefix with `__` between
/// nesting levels, e.g. `MESHRADIO_DEFAULTS__TIMEOUT=5` or
/// `MESHRADIO_PROFILES__HOME__STATION=http://[200::1]:8080`.
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed("MESHRADIO_").split("__"));

    let config: Config = figment.extract()?;
    Ok(config)
}

// ── Translation to runtime config ───────────────────────────────────

fn parse_url(field: &str, raw: &str) -> Result<Url, ConfigError> {
    raw.parse().map_err(|_| ConfigError::Validation {
        field: field.into(),
        reason: format!("invalid URL: {raw}"),
    })
}

fn positive<T: Default + PartialEq>(field: &str, value: T) -> Result<T, ConfigError> {
    if value == T::default() {
        return Err(ConfigError::Validation {
            field: field.into(),
            reason: "must be greater than zero".into(),
        });
    }
    Ok(value)
}

/// Build a `StationConfig` from a profile, falling back to `defaults` for
/// anything the profile leaves unset.
pub fn profile_to_station_config(
    profile: &Profile,
    defaults: &Defaults,
) -> Result<StationConfig, ConfigError> {
    let url = parse_url("station", &profile.station)?;
    let stream_url = profile
        .stream_url
        .as_deref()
        .map(|raw| parse_url("stream_url", raw))
        .transpose()?;

    let timeout = positive("timeout", profile.timeout.unwrap_or(defaults.timeout))?;

    let mut reconnect = ReconnectPolicy::default();
    if let Some(ms) = profile.reconnect_base_ms {
        reconnect.base_delay = Duration::from_millis(positive("reconnect_base_ms", ms)?);
    }
    if let Some(max) = profile.reconnect_max_attempts {
        reconnect.max_attempts = max;
    }

    let mut config = StationConfig::new(url);
    config.stream_url = stream_url;
    config.timeout = Duration::from_secs(timeout);
    config.accept_invalid_certs = profile.insecure.unwrap_or(defaults.insecure);
    config.reconnect = reconnect;
    if let Some(port) = profile.broadcast_port {
        config.broadcast_port = positive("broadcast_port", port)?;
    }
    Ok(config)
}

/// Pick the runtime config for a console launch.
///
/// Priority: `url_override` > the named (or default) profile > built-in
/// default station. Naming a profile that does not exist is an error; a
/// missing *default* profile is not. A URL override replaces the station
/// origin and drops any profile stream URL, which belongs to the old
/// station.
pub fn resolve_station_config(
    config: &Config,
    profile_name: Option<&str>,
    url_override: Option<&str>,
) -> Result<StationConfig, ConfigError> {
    let profile = match profile_name {
        Some(name) => Some(
            config
                .profiles
                .get(name)
                .ok_or_else(|| ConfigError::UnknownProfile { name: name.into() })?,
        ),
        None => config
            .default_profile
            .as_deref()
            .and_then(|name| config.profiles.get(name)),
    };

    let mut station = match profile {
        Some(profile) => profile_to_station_config(profile, &config.defaults)?,
        None => {
            let mut station = StationConfig::new(parse_url("station", DEFAULT_STATION_URL)?);
            station.timeout =
                Duration::from_secs(positive("timeout", config.defaults.timeout)?);
            station.accept_invalid_certs = config.defaults.insecure;
            station
        }
    };

    if let Some(raw) = url_override {
        station.url = parse_url("url", raw)?;
        station.stream_url = None;
    }

    Ok(station)
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    fn write_config(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = load_config_from(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(config.default_profile.as_deref(), Some("default"));
        assert_eq!(config.defaults.timeout, 10);
        assert!(config.profiles.is_empty());
    }

    #[test]
    fn loads_profiles_from_toml() {
        let file = write_config(
            r#"
            default_profile = "home"

            [defaults]
            timeout = 5

            [profiles.home]
            station = "http://[200:1234::1]:8080"
            broadcast_port = 9100
            reconnect_base_ms = 500
            reconnect_max_attempts = 3

            [profiles.proxy]
            station = "https://radio.example"
            stream_url = "wss://radio.example/live/ws"
            insecure = true
            "#,
        );

        let config = load_config_from(file.path()).unwrap();
        assert_eq!(config.default_profile.as_deref(), Some("home"));
        assert_eq!(config.profiles.len(), 2);

        let home = resolve_station_config(&config, None, None).unwrap();
        assert_eq!(home.url.as_str(), "http://[200:1234::1]:8080/");
        assert_eq!(home.timeout, Duration::from_secs(5));
        assert_eq!(home.broadcast_port, 9100);
        assert_eq!(home.reconnect.base_delay, Duration::from_millis(500));
        assert_eq!(home.reconnect.max_attempts, 3);
        assert!(!home.accept_invalid_certs);

        let proxy = resolve_station_config(&config, Some("proxy"), None).unwrap();
        assert!(proxy.accept_invalid_certs);
        assert_eq!(
            proxy.stream_endpoint().unwrap().as_str(),
            "wss://radio.example/live/ws"
        );
    }

    #[test]
    fn no_profile_uses_builtin_station() {
        let station = resolve_station_config(&Config::default(), None, None).unwrap();
        assert_eq!(station.url.as_str(), "http://localhost:8080/");
        assert_eq!(station.reconnect, ReconnectPolicy::default());
        assert_eq!(station.broadcast_port, 9001);
    }

    #[test]
    fn url_override_wins() {
        let mut config = Config::default();
        config.profiles.insert(
            "default".into(),
            Profile {
                station: "http://a.example:8080".into(),
                stream_url: Some("ws://a.example/ws".into()),
                reconnect_max_attempts: Some(9),
                ..Profile::default()
            },
        );

        let station =
            resolve_station_config(&config, None, Some("http://b.example:8080")).unwrap();
        assert_eq!(station.url.as_str(), "http://b.example:8080/");
        assert_eq!(station.stream_url, None);
        // Tuning from the profile still applies.
        assert_eq!(station.reconnect.max_attempts, 9);
    }

    #[test]
    fn unknown_profile_is_error() {
        let err = resolve_station_config(&Config::default(), Some("nope"), None).unwrap_err();
        assert!(matches!(err, ConfigError::UnknownProfile { ref name } if name == "nope"));
    }

    #[test]
    fn invalid_values_are_rejected() {
        let defaults = Defaults::default();

        let bad_url = Profile {
            station: "not a url".into(),
            ..Profile::default()
        };
        assert!(matches!(
            profile_to_station_config(&bad_url, &defaults),
            Err(ConfigError::Validation { ref field, .. }) if field == "station"
        ));

        let zero_delay = Profile {
            station: "http://localhost:8080".into(),
            reconnect_base_ms: Some(0),
            ..Profile::default()
        };
        assert!(matches!(
            profile_to_station_config(&zero_delay, &defaults),
            Err(ConfigError::Validation { ref field, .. }) if field == "reconnect_base_ms"
        ));
    }

    #[test]
    fn malformed_toml_is_figment_error() {
        let file = write_config("default_profile = [");
        assert!(matches!(load_config_from(file.path()), Err(ConfigError::Figment(_))));
    }

    #[test]
    fn config_path_ends_with_file_name() {
        assert!(config_path().ends_with("config.toml"));
    }
}
