use anyhow::{bail, Context, Result};
use clap::{Parser, ValueEnum};
use log::LevelFilter;
use serde::Deserialize;
use std::fs;
use std::path::Path;

use crate::render::{AxisOptions, ChartOptions};
use crate::Settings;

#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct AppConfig {
    /// Snapshot endpoint, fetched once before live updates.
    pub url: Option<String>,
    /// Points kept per series.
    #[serde(default = "default_max_ticks_x", alias = "maxTicksX")]
    pub max_ticks_x: usize,
    #[serde(default)]
    pub yaxes: Vec<AxisOptions>,
    #[serde(default)]
    pub websocket: Websocket,
    #[serde(default)]
    pub output: OutputFormat,
    #[serde(
        default = "default_log_level",
        deserialize_with = "level_deserialize"
    )]
    pub log_level: LevelFilter,
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct Websocket {
    #[serde(default = "default_websocket_enabled")]
    pub enabled: bool,
    pub uri: Option<String>,
}

#[derive(Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// One JSON dataset per redraw on stdout
    #[default]
    Json,
    /// Summary log line per series
    Log,
}

fn default_max_ticks_x() -> usize {
    Settings::DEFAULT_MAX_TICKS_X
}
fn default_websocket_enabled() -> bool {
    true
}
fn default_log_level() -> LevelFilter {
    LevelFilter::Info
}

fn level_deserialize<'de, D>(deserializer: D) -> Result<LevelFilter, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    s.parse::<LevelFilter>()
        .map_err(|_| serde::de::Error::custom("Invalid log level"))
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            url: None,
            max_ticks_x: default_max_ticks_x(),
            yaxes: Vec::new(),
            websocket: Websocket::default(),
            output: OutputFormat::default(),
            log_level: default_log_level(),
        }
    }
}

impl Default for Websocket {
    fn default() -> Self {
        Websocket {
            enabled: default_websocket_enabled(),
            uri: None,
        }
    }
}

impl AppConfig {
    pub fn validate(&self) -> Result<()> {
        if self.max_ticks_x == 0 {
            bail!("max_ticks_x must be a positive integer");
        }
        Ok(())
    }

    pub fn chart_options(&self) -> ChartOptions {
        ChartOptions::new(self.yaxes.clone())
    }
}

#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
pub struct CliArgs {
    #[arg(short, long, default_value = "config.toml")]
    pub config: String,

    /// Snapshot url
    #[arg(long)]
    pub url: Option<String>,

    /// Websocket uri of the live feed
    #[arg(long)]
    pub uri: Option<String>,

    #[arg(long)]
    pub max_ticks: Option<usize>,

    /// Static snapshot mode
    #[arg(long)]
    pub no_websocket: bool,

    #[arg(long, value_enum)]
    pub output: Option<OutputFormat>,

    #[arg(long)]
    pub log_level: Option<LevelFilter>,
}

pub fn load_config() -> Result<AppConfig> {
    load_config_from(CliArgs::parse())
}

/// Reads the config file if it exists, then applies command line overrides.
pub fn load_config_from(cli_args: CliArgs) -> Result<AppConfig> {
    let mut config = AppConfig::default();

    if Path::new(&cli_args.config).exists() {
        let contents = fs::read_to_string(&cli_args.config)
            .with_context(|| format!("Failed to read config file {}", cli_args.config))?;
        config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file {}", cli_args.config))?;
    }

    if let Some(url) = cli_args.url {
        config.url = Some(url);
    }
    if let Some(uri) = cli_args.uri {
        config.websocket.uri = Some(uri);
    }
    if let Some(max_ticks) = cli_args.max_ticks {
        config.max_ticks_x = max_ticks;
    }
    if cli_args.no_websocket {
        config.websocket.enabled = false;
    }
    if let Some(output) = cli_args.output {
        config.output = output;
    }
    if let Some(level) = cli_args.log_level {
        config.log_level = level;
    }

    config.validate()?;
    Ok(config)
}
