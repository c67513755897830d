//! Server configuration
//!
//! The configuration is assembled once at startup from CLI arguments,
//! environment variables and an optional YAML file, then shared read-only
//! (as `Arc<Config>`) with every component.

use std::path::{Path, PathBuf};

use clap::Parser;
use serde::Deserialize;
use thiserror::Error;

use crate::http::parser::HostRule;

const DEFAULT_HOST: &str = "localhost";
const DEFAULT_PORT: u16 = 8080;
const DEFAULT_ROOT: &str = "webroot";
const DEFAULT_READ_BUFFER: usize = 1024;

/// Fatal startup errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("invalid bind host {0:?}: expected an IPv4 address, `localhost`, or `all`")]
    InvalidHost(String),

    #[error("invalid bind port {0:?}: expected 0-65535")]
    InvalidPort(String),

    #[error("invalid refresh flag {0:?}: expected `true` or `false`")]
    InvalidRefreshFlag(String),

    #[error("read buffer size must be greater than zero")]
    InvalidReadBuffer,

    #[error("failed to read config file {}: {source}", .path.display())]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file {}: {source}", .path.display())]
    ParseFile {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
}

/// Address the listener binds to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BindHost {
    /// Every IPv4 interface (`all` on the command line)
    All,
    /// `localhost` or a dotted IPv4 address
    Named(String),
}

impl BindHost {
    /// Parses the user-facing host token.
    ///
    /// ```
    /// # use rootserve::config::BindHost;
    /// assert_eq!(BindHost::parse("all").unwrap(), BindHost::All);
    /// assert!(BindHost::parse("example.com").is_err());
    /// ```
    pub fn parse(s: &str) -> Result<Self, ConfigError> {
        if s == "all" {
            return Ok(BindHost::All);
        }

        match url::Host::parse(s) {
            // The WHATWG parser also accepts shorthand like `127.1`; only the
            // canonical form is allowed since it ends up in the Host check.
            Ok(url::Host::Ipv4(ip)) if ip.to_string() == s => Ok(BindHost::Named(s.to_string())),
            Ok(url::Host::Domain(d)) if d == "localhost" => Ok(BindHost::Named(d)),
            _ => Err(ConfigError::InvalidHost(s.to_string())),
        }
    }

    /// Host part used for the listening socket.
    pub fn socket_host(&self) -> &str {
        match self {
            BindHost::All => "0.0.0.0",
            BindHost::Named(h) => h,
        }
    }

    /// `localhost` and the 127.0.0.0/8 block.
    pub fn is_loopback(&self) -> bool {
        match self {
            BindHost::All => false,
            BindHost::Named(h) if h == "localhost" => true,
            BindHost::Named(h) => h
                .parse::<std::net::Ipv4Addr>()
                .map(|ip| ip.is_loopback())
                .unwrap_or(false),
        }
    }
}

/// Command line interface.
///
/// The positional form mirrors `rootserve <host> <port> <refresh>`; each
/// positional can also be given as a flag or environment variable. A
/// positional wins over the matching flag or variable.
#[derive(Debug, Clone, Parser)]
#[command(name = "rootserve")]
#[command(about = "Minimal one-shot static file server")]
#[command(version)]
pub struct Cli {
    /// Bind address: an IPv4 address, `localhost`, or `all`
    #[arg(value_name = "HOST")]
    pub host_arg: Option<String>,

    /// Bind port
    #[arg(value_name = "PORT")]
    pub port_arg: Option<String>,

    /// Regenerate the root index.html at startup (`true`/`false`)
    #[arg(value_name = "REFRESH")]
    pub refresh_arg: Option<String>,

    #[arg(long, env = "ROOTSERVE_HOST")]
    pub host: Option<String>,

    #[arg(long, env = "ROOTSERVE_PORT")]
    pub port: Option<String>,

    #[arg(long, env = "ROOTSERVE_REFRESH_INDEX")]
    pub refresh_index: Option<bool>,

    /// Web root directory
    #[arg(long, env = "ROOTSERVE_ROOT")]
    pub root: Option<PathBuf>,

    /// Size of the single read performed per connection
    #[arg(long = "read-buffer", env = "ROOTSERVE_READ_BUFFER")]
    pub read_buffer_size: Option<usize>,

    /// Optional YAML file with the same settings
    #[arg(long, env = "ROOTSERVE_CONFIG")]
    pub config: Option<PathBuf>,
}

/// Settings accepted in the YAML config file.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    pub host: Option<String>,
    pub port: Option<u32>,
    pub root: Option<PathBuf>,
    pub refresh_index: Option<bool>,
    pub read_buffer_size: Option<usize>,
}

impl FileConfig {
    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::ReadFile {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml(&text).map_err(|source| ConfigError::ParseFile {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn from_yaml(text: &str) -> Result<Self, serde_yaml::Error> {
        // An empty document deserializes to unit, not to a map.
        if text.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(text)
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub host: BindHost,
    pub port: u16,
    pub root: PathBuf,
    pub refresh_index: bool,
    pub read_buffer_size: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: BindHost::Named(DEFAULT_HOST.to_string()),
            port: DEFAULT_PORT,
            root: PathBuf::from(DEFAULT_ROOT),
            refresh_index: false,
            read_buffer_size: DEFAULT_READ_BUFFER,
        }
    }
}

impl Config {
    /// Loads configuration from the process arguments and environment.
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_cli(Cli::parse())
    }

    /// Resolves CLI values over the optional YAML file over defaults.
    pub fn from_cli(cli: Cli) -> Result<Self, ConfigError> {
        let file = match &cli.config {
            Some(path) => FileConfig::from_path(path)?,
            None => FileConfig::default(),
        };

        let host = match cli.host_arg.or(cli.host).or(file.host) {
            Some(h) => BindHost::parse(&h)?,
            None => BindHost::Named(DEFAULT_HOST.to_string()),
        };

        let port = match cli.port_arg.or(cli.port) {
            Some(p) => parse_port(&p)?,
            None => match file.port {
                Some(p) => u16::try_from(p).map_err(|_| ConfigError::InvalidPort(p.to_string()))?,
                None => DEFAULT_PORT,
            },
        };

        let refresh_index = match cli.refresh_arg {
            Some(flag) => parse_refresh_flag(&flag)?,
            None => cli.refresh_index.or(file.refresh_index).unwrap_or(false),
        };

        let read_buffer_size = cli
            .read_buffer_size
            .or(file.read_buffer_size)
            .unwrap_or(DEFAULT_READ_BUFFER);
        if read_buffer_size == 0 {
            return Err(ConfigError::InvalidReadBuffer);
        }

        Ok(Self {
            host,
            port,
            root: cli.root.or(file.root).unwrap_or_else(|| PathBuf::from(DEFAULT_ROOT)),
            refresh_index,
            read_buffer_size,
        })
    }

    /// `host:port` for the listening socket.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host.socket_host(), self.port)
    }

    /// Host header a request must carry to be accepted.
    pub fn host_rule(&self) -> HostRule {
        match &self.host {
            BindHost::All => HostRule::AnyHost { port: self.port },
            BindHost::Named(h) => HostRule::Exact(format!("{}:{}", h, self.port)),
        }
    }
}

fn parse_port(s: &str) -> Result<u16, ConfigError> {
    s.parse::<u16>().map_err(|_| ConfigError::InvalidPort(s.to_string()))
}

fn parse_refresh_flag(s: &str) -> Result<bool, ConfigError> {
    match s.to_ascii_lowercase().as_str() {
        "true" => Ok(true),
        "false" => Ok(false),
        _ => Err(ConfigError::InvalidRefreshFlag(s.to_string())),
    }
}
