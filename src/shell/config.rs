// Runtime configuration read from the environment.
//
// Variables
// - TIMESHEETS_HOST          bind address, default 0.0.0.0
// - TIMESHEETS_PORT          bind port, default 8080
// - TIMESHEETS_REFRESH_SECS  background refresh period, default 30, must be > 0
// - TIMESHEETS_SEED_STAFF    comma separated staff ids known at startup

use std::net::{IpAddr, SocketAddr};
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{name} has an invalid value: {value}")]
    Invalid { name: &'static str, value: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub host: IpAddr,
    pub port: u16,
    pub refresh_period: Duration,
    pub seed_staff: Vec<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            host: IpAddr::from([0, 0, 0, 0]),
            port: 8080,
            refresh_period: Duration::from_secs(30),
            seed_staff: Vec::new(),
        }
    }
}

fn parse<T: std::str::FromStr>(name: &'static str, value: String) -> Result<T, ConfigError> {
    value
        .trim()
        .parse()
        .map_err(|_| ConfigError::Invalid { name, value })
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let host = match lookup("TIMESHEETS_HOST") {
            Some(v) => parse("TIMESHEETS_HOST", v)?,
            None => defaults.host,
        };
        let port = match lookup("TIMESHEETS_PORT") {
            Some(v) => parse("TIMESHEETS_PORT", v)?,
            None => defaults.port,
        };
        let refresh_period = match lookup("TIMESHEETS_REFRESH_SECS") {
            Some(v) => match parse::<u64>("TIMESHEETS_REFRESH_SECS", v.clone())? {
                0 => {
                    return Err(ConfigError::Invalid {
                        name: "TIMESHEETS_REFRESH_SECS",
                        value: v,
                    });
                }
                secs => Duration::from_secs(secs),
            },
            None => defaults.refresh_period,
        };
        let seed_staff = lookup("TIMESHEETS_SEED_STAFF")
            .map(|v| {
                v.split(',')
                    .map(str::trim)
                    .filter(|id| !id.is_empty())
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or(defaults.seed_staff);

        Ok(Self {
            host,
            port,
            refresh_period,
            seed_staff,
        })
    }

    pub fn addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}
