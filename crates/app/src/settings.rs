//! Settings of the messbook service, read from `settings.toml` (or the file
//! given with `--config` / `MESSBOOK_CONFIG`) and overridden by
//! `MESSBOOK__*` variables, e.g. `MESSBOOK__SERVER__PORT=8080`.
use clap::Parser;
use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

const DEFAULT_CONFIG_PATH: &str = "settings";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Database {
    Memory,
    Sqlite(String),
}

#[derive(Debug, Deserialize)]
pub struct Server {
    pub database: Database,
    pub bind: Option<String>,
    pub port: u16,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct App {
    pub level: String,
    /// Granularity of meal cost shares, in minor units.
    pub allocation_unit_minor: i64,
}

impl Default for App {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            allocation_unit_minor: engine::DEFAULT_ALLOCATION_UNIT,
        }
    }
}

#[derive(Debug, Parser)]
#[command(name = "messbook", about = "Messbook accounting server")]
struct Args {
    /// Settings file (TOML), without or with extension.
    #[arg(long, env = "MESSBOOK_CONFIG", default_value = DEFAULT_CONFIG_PATH)]
    config: String,
}

#[derive(Debug, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub app: App,
    pub server: Option<Server>,
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        let args = Args::parse();

        Config::builder()
            .add_source(File::with_name(&args.config).required(false))
            .add_source(
                Environment::with_prefix("MESSBOOK")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()
    }
}
