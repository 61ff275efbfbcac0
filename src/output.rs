//! Output formatters.
//!
//! Supports human-readable (ANSI-colored by AQI tier), JSON, and NDJSON
//! formats. Every human rendering carries the provenance marker so stale
//! or demo data is always visibly labeled.

use std::io::{self, Write};

use crate::aqi::AqiCategory;
use crate::models::{Prediction, SensorSnapshot, StationReading};

// ANSI color codes
const RESET: &str = "\x1b[0m";
const BOLD: &str = "\x1b[1m";
const DIM: &str = "\x1b[2m";

// Tier colors, terminal approximations of the dashboard palette
const GREEN: &str = "\x1b[92m"; // Good
const LIME: &str = "\x1b[32m"; // Satisfactory
const YELLOW: &str = "\x1b[93m"; // Moderate
const ORANGE: &str = "\x1b[38;5;208m"; // Poor
const RED: &str = "\x1b[91m"; // Very Poor
const DARK_RED: &str = "\x1b[31m"; // Severe
const GRAY: &str = "\x1b[90m"; // unknown category

/// Output format selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Format {
    /// Human-readable terminal output (default)
    #[default]
    Human,
    /// Pretty-printed JSON
    Json,
    /// Newline-delimited JSON (one object per line)
    Ndjson,
}

impl std::str::FromStr for Format {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "human" => Ok(Self::Human),
            "json" => Ok(Self::Json),
            "ndjson" => Ok(Self::Ndjson),
            _ => Err(format!("unknown format: {s} (expected: human, json, ndjson)")),
        }
    }
}

/// ANSI color for an AQI tier.
const fn tier_color(category: AqiCategory) -> &'static str {
    match category {
        AqiCategory::Good => GREEN,
        AqiCategory::Satisfactory => LIME,
        AqiCategory::Moderate => YELLOW,
        AqiCategory::Poor => ORANGE,
        AqiCategory::VeryPoor => RED,
        AqiCategory::Severe => DARK_RED,
    }
}

/// ANSI color for a backend category label; gray when unrecognized.
fn label_color(label: &str) -> &'static str {
    AqiCategory::from_label(label).map_or(GRAY, tier_color)
}

fn paint(text: &str, code: &str, color: bool) -> String {
    if color {
        format!("{code}{text}{RESET}")
    } else {
        text.to_string()
    }
}

/// Write a sensor snapshot.
///
/// `marker` is the provenance label from `Observation::marker` (empty for
/// live data).
///
/// # Errors
///
/// Returns an error if serialization or writing fails.
pub fn write_snapshot<W: Write>(
    writer: &mut W,
    snapshot: &SensorSnapshot,
    marker: &str,
    format: Format,
    color: bool,
) -> io::Result<()> {
    match format {
        Format::Human => {
            let header = format!("{} @ {}", snapshot.station_id, snapshot.datetime);
            write!(writer, "{}", paint(&header, BOLD, color))?;
            if !marker.is_empty() {
                write!(writer, " {}", paint(marker, DIM, color))?;
            }
            writeln!(writer)?;
            writeln!(
                writer,
                "  PM10 {:6.1}  NO2 {:6.1}  NOx {:6.1}  CO {:5.2}  O3 {:6.1}  RH {:5.1}%",
                snapshot.pm10, snapshot.no2, snapshot.nox, snapshot.co, snapshot.ozone, snapshot.rh
            )?;
            writeln!(
                writer,
                "  PM2.5 lag-1h {:6.1}  lag-24h {:6.1}",
                snapshot.pm25_lag_1, snapshot.pm25_lag_24
            )
        }
        Format::Json => write_json(writer, snapshot),
        Format::Ndjson => write_ndjson_line(writer, snapshot),
    }
}

/// Write a prediction result with category, advisory, and explanations.
///
/// # Errors
///
/// Returns an error if serialization or writing fails.
pub fn write_prediction<W: Write>(
    writer: &mut W,
    prediction: &Prediction,
    marker: &str,
    format: Format,
    color: bool,
) -> io::Result<()> {
    match format {
        Format::Human => {
            let code = label_color(&prediction.aqi_category);
            let headline = format!(
                "PM2.5 {:.2} ug/m3  AQI {} ({})",
                prediction.pm25_prediction, prediction.aqi, prediction.aqi_category
            );
            write!(writer, "{}", paint(&headline, code, color))?;
            if !marker.is_empty() {
                write!(writer, " {}", paint(marker, DIM, color))?;
            }
            writeln!(writer)?;

            if let Some(category) = AqiCategory::from_label(&prediction.aqi_category) {
                writeln!(
                    writer,
                    "  {} {}",
                    paint(&format!("[{}]", category.range_label()), DIM, color),
                    category.advisory()
                )?;
            }

            if !prediction.explanation.is_empty() {
                writeln!(writer, "  {}", paint("Why:", BOLD, color))?;
                for sentence in &prediction.explanation {
                    writeln!(writer, "   - {sentence}")?;
                }
            }
            Ok(())
        }
        Format::Json => write_json(writer, prediction),
        Format::Ndjson => write_ndjson_line(writer, prediction),
    }
}

/// Write the cross-station comparison, sorted ascending by AQI.
///
/// # Errors
///
/// Returns an error if serialization or writing fails.
pub fn write_comparison<W: Write>(
    writer: &mut W,
    readings: &[StationReading],
    format: Format,
    color: bool,
) -> io::Result<()> {
    let mut sorted: Vec<&StationReading> = readings.iter().collect();
    sorted.sort_by_key(|r| r.aqi);

    match format {
        Format::Human => {
            for reading in &sorted {
                let category = AqiCategory::from_aqi(f64::from(reading.aqi));
                let code = tier_color(category);
                writeln!(
                    writer,
                    "{} {:18} AQI {:>3} ({:12}) PM2.5 {:6.1}  PM10 {:6.1}  NO2 {:5.1}  CO {:4.2}",
                    paint("●", code, color),
                    reading.name,
                    reading.aqi,
                    category.as_str(),
                    reading.pm25,
                    reading.pm10,
                    reading.no2,
                    reading.co,
                )?;
            }

            if let (Some(best), Some(worst)) = (sorted.first(), sorted.last()) {
                if sorted.len() > 1 {
                    writeln!(
                        writer,
                        "{}",
                        paint(
                            &format!(
                                "Best: {} (AQI {}) | Worst: {} (AQI {})",
                                best.name, best.aqi, worst.name, worst.aqi
                            ),
                            DIM,
                            color,
                        )
                    )?;
                }
            }
            Ok(())
        }
        Format::Json => write_json(writer, &sorted),
        Format::Ndjson => {
            for reading in &sorted {
                write_ndjson_line(writer, reading)?;
            }
            Ok(())
        }
    }
}

fn write_json<W: Write, T: serde::Serialize>(writer: &mut W, value: &T) -> io::Result<()> {
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
    writeln!(writer, "{json}")
}

fn write_ndjson_line<W: Write, T: serde::Serialize>(writer: &mut W, value: &T) -> io::Result<()> {
    let json = serde_json::to_string(value)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
    writeln!(writer, "{json}")
}
