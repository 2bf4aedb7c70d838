//! HTTP server configuration read from the environment.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;
use std::time::Duration;

use mockable::Env;
use tracing::debug;

use user_directory::outbound::persistence::DEFAULT_MAX_SIZE;

const PORT_ENV: &str = "PORT";
const BIND_HOST_ENV: &str = "BIND_HOST";
const DATABASE_URL_ENV: &str = "DATABASE_URL";
const POOL_MAX_SIZE_ENV: &str = "DATABASE_POOL_MAX_SIZE";
const CONNECT_TIMEOUT_ENV: &str = "DATABASE_CONNECT_TIMEOUT_SECS";
const PUBLIC_DIR_ENV: &str = "PUBLIC_DIR";

const DEFAULT_PORT: u16 = 5000;
const DEFAULT_BIND_HOST: IpAddr = IpAddr::V4(Ipv4Addr::UNSPECIFIED);
const DEFAULT_DATABASE_URL: &str = "postgres://localhost:5432/user_directory";
const DEFAULT_PUBLIC_DIR: &str = "public";
const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 30;

/// Errors raised while reading server configuration.
#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid value for {name}='{value}'; expected {expected}")]
    InvalidEnv {
        name: &'static str,
        value: String,
        expected: &'static str,
    },
}

/// Settings the server binary needs before it can start listening.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub(crate) bind_addr: SocketAddr,
    pub(crate) database_url: String,
    pub(crate) pool_max_size: u32,
    pub(crate) connect_timeout: Duration,
    pub(crate) public_dir: PathBuf,
}

impl ServerConfig {
    /// Read every setting, falling back to defaults for unset variables.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidEnv`] naming the first variable whose
    /// value cannot be parsed.
    pub fn from_env<E: Env>(env: &E) -> Result<Self, ConfigError> {
        let port = parse_or(env, PORT_ENV, DEFAULT_PORT, "a port number 0-65535")?;
        let host = parse_or(env, BIND_HOST_ENV, DEFAULT_BIND_HOST, "an IP address")?;
        let pool_max_size = parse_or(env, POOL_MAX_SIZE_ENV, DEFAULT_MAX_SIZE, "an integer >= 1")?;
        if pool_max_size == 0 {
            return Err(ConfigError::InvalidEnv {
                name: POOL_MAX_SIZE_ENV,
                value: pool_max_size.to_string(),
                expected: "an integer >= 1",
            });
        }
        let connect_timeout_secs = parse_or(
            env,
            CONNECT_TIMEOUT_ENV,
            DEFAULT_CONNECT_TIMEOUT_SECS,
            "a number of seconds >= 1",
        )?;
        if connect_timeout_secs == 0 {
            return Err(ConfigError::InvalidEnv {
                name: CONNECT_TIMEOUT_ENV,
                value: connect_timeout_secs.to_string(),
                expected: "a number of seconds >= 1",
            });
        }
        let database_url = env
            .string(DATABASE_URL_ENV)
            .unwrap_or_else(|| DEFAULT_DATABASE_URL.to_owned());
        let public_dir = env
            .string(PUBLIC_DIR_ENV)
            .map_or_else(|| PathBuf::from(DEFAULT_PUBLIC_DIR), PathBuf::from);

        Ok(Self {
            bind_addr: SocketAddr::new(host, port),
            database_url,
            pool_max_size,
            connect_timeout: Duration::from_secs(connect_timeout_secs),
            public_dir,
        })
    }

    #[must_use]
    pub fn bind_addr(&self) -> SocketAddr {
        self.bind_addr
    }
}

fn parse_or<E, T>(
    env: &E,
    name: &'static str,
    default: T,
    expected: &'static str,
) -> Result<T, ConfigError>
where
    E: Env,
    T: std::str::FromStr,
{
    match env.string(name) {
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidEnv {
                name,
                value,
                expected,
            }),
        None => {
            debug!(name, "not set; using default");
            Ok(default)
        }
    }
}
