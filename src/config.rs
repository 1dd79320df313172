use anyhow::{Context, Result};
use serde::Deserialize;
use std::{
    env::{VarError, var},
    fmt::{Debug, Display, Formatter, Result as FmtResult},
    fs::read_to_string,
    io::ErrorKind,
    net::SocketAddr,
    path::Path,
};
use toml::from_str;
use tracing::info;

pub const DEFAULT_CONFIG_PATH: &str = "config.toml";

const ATLAS_URI_VAR: &str = "ATLAS_URI";
const DATABASE_VAR: &str = "SITE_STASH_DATABASE";
const LISTEN_ADDRESS_VAR: &str = "SITE_STASH_LISTEN_ADDRESS";

#[derive(Debug)]
pub struct Config {
    pub mongodb_uri: SensitiveString,
    pub database: String,
    pub listen_address: SocketAddr,
}

#[derive(Deserialize)]
struct ConfigFile {
    mongodb_uri: Option<SensitiveString>,

    #[serde(default = "ConfigFile::default_database")]
    database: String,

    #[serde(default = "ConfigFile::default_listen_address")]
    listen_address: SocketAddr,
}

impl ConfigFile {
    fn default_database() -> String {
        "site-stash".into()
    }

    fn default_listen_address() -> SocketAddr {
        SocketAddr::from(([0, 0, 0, 0], 3000))
    }
}

impl Config {
    /// Reads `path` (a missing file counts as empty) and applies environment overrides.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let config = Self::load_with_env(path, |key| var(key))?;
        info!("Successfully loaded config: {config:#?}");
        Ok(config)
    }

    fn load_with_env<P: AsRef<Path>, F: Fn(&str) -> Result<String, VarError>>(path: P, env: F) -> Result<Self> {
        let path = path.as_ref();

        let config_string = match read_to_string(path) {
            Ok(config_string) => config_string,
            Err(error) if error.kind() == ErrorKind::NotFound => String::new(),
            Err(error) => return Err(error).with_context(|| format!("Could not read config file {}", path.display())),
        };

        let file: ConfigFile = from_str(&config_string).with_context(|| format!("Could not parse config file {}", path.display()))?;

        let mongodb_uri = match env(ATLAS_URI_VAR).ok().filter(|uri| !uri.trim().is_empty()) {
            Some(uri) => SensitiveString(uri),
            None => file.mongodb_uri.with_context(|| {
                format!("No MongoDB connection string: set mongodb_uri in {} or the {ATLAS_URI_VAR} environment variable", path.display())
            })?,
        };

        let database = env(DATABASE_VAR).ok().filter(|database| !database.trim().is_empty()).unwrap_or(file.database);

        let listen_address = match env(LISTEN_ADDRESS_VAR) {
            Ok(address) => address.parse().with_context(|| format!("{LISTEN_ADDRESS_VAR} is not a socket address: {address}"))?,
            Err(_) => file.listen_address,
        };

        Ok(Self { mongodb_uri, database, listen_address })
    }
}

#[derive(Deserialize, Clone)]
pub struct SensitiveString(String);

impl Display for SensitiveString {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
impl From<&str> for SensitiveString {
    fn from(value: &str) -> Self {
        Self(value.into())
    }
}

impl Debug for SensitiveString {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "<redacted>")
    }
}
