//! Command-line interface definitions.
//!
//! Uses clap derive API for argument parsing.

use clap::{Parser, Subcommand};

use crate::models::Station;
use crate::output::Format;
use crate::settings::ColorMode;

/// Air-quality monitoring and PM2.5 prediction from your terminal.
#[derive(Parser, Debug)]
#[command(name = "aqicast")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Command to run
    #[command(subcommand)]
    pub command: Command,

    /// Backend base URL (overrides the configured one)
    #[arg(long, global = true)]
    pub api_url: Option<String>,

    /// Color output: auto, always, never (overrides the configured mode)
    #[arg(long, global = true, value_parser = parse_color_mode)]
    pub color: Option<ColorMode>,

    /// Enable verbose debug logging
    #[arg(long, global = true)]
    pub verbose: bool,

    /// Suppress all output except errors
    #[arg(long, global = true)]
    pub quiet: bool,
}

/// Available commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Show the latest sensor snapshot for a station
    Status(StatusArgs),

    /// Predict PM2.5 from a sensor-feature payload
    Predict(PredictArgs),

    /// Compare current air quality across all stations
    Compare(CompareArgs),

    /// Poll the latest snapshot and stream updates
    Watch(WatchArgs),

    /// Chat with the air-quality assistant
    Chat(ChatArgs),

    /// Show or modify persisted settings
    Config(ConfigArgs),
}

/// Arguments for the `status` command.
#[derive(Parser, Debug)]
pub struct StatusArgs {
    /// Station to query (falls back to the configured default)
    #[arg(long, short = 's', value_parser = parse_station)]
    pub station: Option<Station>,

    /// Output format
    #[arg(long, short = 'f', default_value = "human", value_parser = parse_format)]
    pub format: Format,
}

/// Arguments for the `predict` command.
#[derive(Parser, Debug)]
pub struct PredictArgs {
    /// Seed features from the station's latest snapshot instead of flags
    #[arg(long)]
    pub from_latest: bool,

    /// Station for --from-latest (falls back to the configured default)
    #[arg(long, short = 's', value_parser = parse_station)]
    pub station: Option<Station>,

    /// PM10 concentration (ug/m3)
    #[arg(long, default_value = "0")]
    pub pm10: f64,

    /// NO2 concentration (ppb)
    #[arg(long, default_value = "0")]
    pub no2: f64,

    /// NO concentration (ppb)
    #[arg(long, default_value = "0")]
    pub no: f64,

    /// NOx concentration (ppb)
    #[arg(long, default_value = "0")]
    pub nox: f64,

    /// CO concentration (mg/m3)
    #[arg(long, default_value = "0")]
    pub co: f64,

    /// Ozone concentration (ppb)
    #[arg(long, default_value = "0")]
    pub ozone: f64,

    /// Relative humidity (%)
    #[arg(long, default_value = "0")]
    pub rh: f64,

    /// PM2.5 one hour ago (ug/m3)
    #[arg(long, default_value = "0")]
    pub pm25_lag_1: f64,

    /// PM2.5 twenty-four hours ago (ug/m3)
    #[arg(long, default_value = "0")]
    pub pm25_lag_24: f64,

    /// Fall back to the labeled demo prediction when the backend is down
    #[arg(long)]
    pub demo_fallback: bool,

    /// Output format
    #[arg(long, short = 'f', default_value = "human", value_parser = parse_format)]
    pub format: Format,
}

/// Arguments for the `compare` command.
#[derive(Parser, Debug)]
pub struct CompareArgs {
    /// Output format
    #[arg(long, short = 'f', default_value = "human", value_parser = parse_format)]
    pub format: Format,
}

/// Arguments for the `watch` command.
#[derive(Parser, Debug)]
pub struct WatchArgs {
    /// Station to poll (falls back to the configured default)
    #[arg(long, short = 's', value_parser = parse_station)]
    pub station: Option<Station>,

    /// Poll interval in seconds (minimum 60; default from settings)
    #[arg(long)]
    pub interval: Option<u64>,

    /// Output format
    #[arg(long, short = 'f', default_value = "human", value_parser = parse_format)]
    pub format: Format,
}

/// Arguments for the `chat` command.
#[derive(Parser, Debug)]
pub struct ChatArgs {
    /// Station context for live answers (falls back to the configured default)
    #[arg(long, short = 's', value_parser = parse_station)]
    pub station: Option<Station>,
}

/// Arguments for the `config` command.
#[derive(Parser, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub action: ConfigAction,
}

/// Settings operations; mutations persist immediately.
#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Print the current settings and their file path
    Show,

    /// Set the default station
    SetStation {
        #[arg(value_parser = parse_station)]
        station: Station,
    },

    /// Set the backend base URL
    SetUrl { url: String },

    /// Set the watch poll interval in seconds
    SetInterval { seconds: u64 },

    /// Cycle the color mode (auto -> always -> never)
    ToggleColor,
}

/// Parse a station from string.
fn parse_station(s: &str) -> Result<Station, String> {
    s.parse()
}

/// Parse an output format from string.
fn parse_format(s: &str) -> Result<Format, String> {
    s.parse()
}

/// Parse a color mode from string.
fn parse_color_mode(s: &str) -> Result<ColorMode, String> {
    s.parse()
}
