//! aqicast - air-quality monitoring and PM2.5 prediction from your terminal.
//!
//! A terminal-first, pipe-friendly client for the PM2.5 ensemble prediction
//! backend: station status, predictions with SHAP explanations, cross-station
//! comparison, live polling, and the air-quality chatbot.

use std::io::{self, Write};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::error;

mod aqi;
mod chat;
mod cli;
mod client;
mod errors;
mod freshness;
mod mock;
mod models;
mod output;
mod settings;

use cli::{Cli, Command, ConfigAction};
use client::ApiClient;
use freshness::{Observation, SequenceGuard};
use models::{PredictionRequest, SensorSnapshot, Station};
use settings::Settings;

/// Minimum watch interval in seconds.
const MIN_POLL_INTERVAL_SECS: u64 = 60;

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e:#}");
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing based on verbosity
    init_tracing(cli.verbose, cli.quiet);

    // Load persisted settings, then apply per-invocation overrides
    let mut settings = Settings::load();
    if let Some(url) = &cli.api_url {
        settings.api_url = url.clone();
    }
    if let Some(color) = cli.color {
        settings.color = color;
    }

    match cli.command {
        Command::Status(args) => cmd_status(&settings, &args),
        Command::Predict(args) => cmd_predict(&settings, &args),
        Command::Compare(args) => cmd_compare(&settings, &args),
        Command::Watch(args) => cmd_watch(&settings, &args),
        Command::Chat(args) => cmd_chat(&settings, &args),
        Command::Config(args) => cmd_config(settings, &args),
    }
}

/// Initialize tracing subscriber.
fn init_tracing(verbose: bool, quiet: bool) {
    use tracing_subscriber::EnvFilter;

    let filter = if quiet {
        EnvFilter::new("error")
    } else if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .init();
}

/// Resolve the station from args or the configured default.
fn resolve_station(settings: &Settings, requested: Option<Station>) -> Result<Station> {
    requested.or(settings.default_station).context(
        "no station given: pass --station or set one with `aqicast config set-station`",
    )
}

/// Execute the `status` command - one-shot snapshot fetch.
fn cmd_status(settings: &Settings, args: &cli::StatusArgs) -> Result<()> {
    let station = resolve_station(settings, args.station)?;
    let client = ApiClient::with_base_url(&settings.api_url)
        .context("failed to create API client")?;

    let snapshot = client
        .fetch_latest(station)
        .with_context(|| format!("failed to fetch latest data for {station}"))?;

    let stdout = io::stdout();
    let mut handle = stdout.lock();
    output::write_snapshot(&mut handle, &snapshot, "", args.format, settings.color.enabled())?;

    Ok(())
}

/// Execute the `predict` command.
fn cmd_predict(settings: &Settings, args: &cli::PredictArgs) -> Result<()> {
    let client = ApiClient::with_base_url(&settings.api_url)
        .context("failed to create API client")?;

    let request = if args.from_latest {
        let station = resolve_station(settings, args.station)?;
        let snapshot = client
            .fetch_latest(station)
            .with_context(|| format!("failed to fetch latest data for {station}"))?;
        PredictionRequest::from(&snapshot)
    } else {
        PredictionRequest {
            pm10: args.pm10,
            no2: args.no2,
            no: args.no,
            nox: args.nox,
            co: args.co,
            ozone: args.ozone,
            rh: args.rh,
            pm25_lag_1: args.pm25_lag_1,
            pm25_lag_24: args.pm25_lag_24,
        }
    };

    let stdout = io::stdout();
    let mut handle = stdout.lock();

    match client.predict(&request) {
        Ok(prediction) => {
            output::write_prediction(
                &mut handle,
                &prediction,
                "",
                args.format,
                settings.color.enabled(),
            )?;
        }
        Err(e) if args.demo_fallback => {
            tracing::warn!("prediction backend unreachable, showing demo data: {e}");
            output::write_prediction(
                &mut handle,
                &mock::demo_prediction(),
                "[demo]",
                args.format,
                settings.color.enabled(),
            )?;
        }
        Err(e) => return Err(e).context("prediction request failed"),
    }

    Ok(())
}

/// Execute the `compare` command.
fn cmd_compare(settings: &Settings, args: &cli::CompareArgs) -> Result<()> {
    let client = ApiClient::with_base_url(&settings.api_url)
        .context("failed to create API client")?;

    let readings = client
        .fetch_comparison()
        .context("failed to fetch comparison data")?;

    let stdout = io::stdout();
    let mut handle = stdout.lock();
    output::write_comparison(&mut handle, &readings, args.format, settings.color.enabled())?;

    Ok(())
}

/// Execute the `watch` command - fixed-interval polling.
fn cmd_watch(settings: &Settings, args: &cli::WatchArgs) -> Result<()> {
    let station = resolve_station(settings, args.station)?;

    let requested = args.interval.unwrap_or(settings.poll_interval_secs);
    let poll_interval = requested.max(MIN_POLL_INTERVAL_SECS);
    if poll_interval != requested {
        tracing::warn!("poll interval clamped to minimum of {MIN_POLL_INTERVAL_SECS} seconds");
    }

    let client = ApiClient::with_base_url(&settings.api_url)
        .context("failed to create API client")?;
    let color = settings.color.enabled();

    tracing::info!(
        "watching {} (poll every {}s, Ctrl+C to stop)",
        station.display_name(),
        poll_interval
    );

    let mut guard = SequenceGuard::new();
    let mut last_applied: Option<SensorSnapshot> = None;

    loop {
        let tag = guard.begin();

        let observation = match client.fetch_latest(station) {
            Ok(snapshot) => {
                if guard.try_apply(tag) {
                    Observation::Live(snapshot)
                } else {
                    // Response for a superseded request; drop it.
                    tracing::debug!("discarding out-of-order response (tag {tag})");
                    std::thread::sleep(std::time::Duration::from_secs(poll_interval));
                    continue;
                }
            }
            Err(e) => match last_applied.clone() {
                Some(previous) => {
                    tracing::warn!("fetch failed, carrying forward last snapshot: {e}");
                    Observation::Stale(previous)
                }
                None => Observation::Unavailable(e.to_string()),
            },
        };

        let stdout = io::stdout();
        let mut handle = stdout.lock();

        match &observation {
            Observation::Live(snapshot) => {
                // Suppress unchanged readings: the backend repeats the same
                // row until the next hourly update lands.
                let advanced = last_applied
                    .as_ref()
                    .is_none_or(|prev| prev.datetime != snapshot.datetime);
                if advanced {
                    output::write_snapshot(&mut handle, snapshot, "", args.format, color)?;
                    last_applied = Some(snapshot.clone());
                } else {
                    tracing::debug!("snapshot unchanged ({})", snapshot.datetime);
                }
            }
            Observation::Stale(snapshot) => {
                // Pipe formats carry no provenance marker, so a stale row
                // would read as live there; only human mode re-renders it.
                if args.format == output::Format::Human {
                    output::write_snapshot(
                        &mut handle,
                        snapshot,
                        observation.marker(),
                        args.format,
                        color,
                    )?;
                }
            }
            Observation::Unavailable(reason) => {
                if args.format == output::Format::Human {
                    writeln!(handle, "{} {reason}", observation.marker())?;
                } else {
                    tracing::warn!("no data available: {reason}");
                }
            }
        }
        let _ = handle.flush();
        drop(handle);

        std::thread::sleep(std::time::Duration::from_secs(poll_interval));
    }
}

/// Execute the `chat` command - interactive REPL.
fn cmd_chat(settings: &Settings, args: &cli::ChatArgs) -> Result<()> {
    let client = ApiClient::with_base_url(&settings.api_url)
        .context("failed to create API client")?;

    let station = args.station.or(settings.default_station);

    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut handle = stdout.lock();
    chat::run(&client, station, stdin.lock(), &mut handle).context("chat session failed")?;

    Ok(())
}

/// Execute the `config` command - settings are persisted on every change.
fn cmd_config(mut settings: Settings, args: &cli::ConfigArgs) -> Result<()> {
    match &args.action {
        ConfigAction::Show => {
            let path = settings::config_path()
                .map_or_else(|| "<unknown>".to_string(), |p| p.display().to_string());
            println!("config file: {path}");
            println!("color: {}", settings.color.as_str());
            println!(
                "default station: {}",
                settings
                    .default_station
                    .map_or("<unset>", Station::as_str)
            );
            println!("api url: {}", settings.api_url);
            println!("poll interval: {}s", settings.poll_interval_secs);
            return Ok(());
        }
        ConfigAction::SetStation { station } => {
            settings.default_station = Some(*station);
            println!("default station set to {}", station.display_name());
        }
        ConfigAction::SetUrl { url } => {
            settings.api_url = url.trim_end_matches('/').to_string();
            println!("api url set to {}", settings.api_url);
        }
        ConfigAction::SetInterval { seconds } => {
            settings.poll_interval_secs = (*seconds).max(MIN_POLL_INTERVAL_SECS);
            println!("poll interval set to {}s", settings.poll_interval_secs);
        }
        ConfigAction::ToggleColor => {
            let mode = settings.toggle_color();
            println!("color mode set to {}", mode.as_str());
        }
    }

    settings.store().context("failed to persist settings")?;
    Ok(())
}
