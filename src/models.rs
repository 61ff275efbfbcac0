//! Data models for the PM2.5 prediction backend.
//!
//! Field names mirror the backend's JSON contract exactly; serde renames
//! keep the Rust side idiomatic.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// The fixed set of monitoring stations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Station {
    #[serde(rename = "Peenya")]
    Peenya,
    #[serde(rename = "RVCE_Mailsandra")]
    RvceMailsandra,
    #[serde(rename = "Silkboard")]
    Silkboard,
}

impl Station {
    /// All stations.
    pub const ALL: [Self; 3] = [Self::Peenya, Self::RvceMailsandra, Self::Silkboard];

    /// Backend station identifier.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Peenya => "Peenya",
            Self::RvceMailsandra => "RVCE_Mailsandra",
            Self::Silkboard => "Silkboard",
        }
    }

    /// Display name (underscores replaced).
    #[must_use]
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::Peenya => "Peenya",
            Self::RvceMailsandra => "RVCE Mailsandra",
            Self::Silkboard => "Silkboard",
        }
    }

    /// Station coordinates as (latitude, longitude).
    #[must_use]
    pub const fn coordinates(self) -> (f64, f64) {
        match self {
            Self::Peenya => (13.0205, 77.5360),
            Self::RvceMailsandra => (12.9338, 77.5263),
            Self::Silkboard => (12.9279, 77.6240),
        }
    }
}

impl std::str::FromStr for Station {
    type Err = String;

    /// Accepts backend identifiers and the common short aliases.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "peenya" => Ok(Self::Peenya),
            "rvce_mailsandra" | "rvce" | "mailsandra" => Ok(Self::RvceMailsandra),
            "silkboard" | "silboard" | "silk" => Ok(Self::Silkboard),
            _ => Err(format!(
                "unknown station: {s} (expected: Peenya, RVCE_Mailsandra, Silkboard)"
            )),
        }
    }
}

impl std::fmt::Display for Station {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.display_name())
    }
}

/// Latest sensor snapshot for a station, from `GET /latest`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SensorSnapshot {
    /// Measurement timestamp, backend formatted ("YYYY-MM-DD HH:MM:SS")
    pub datetime: String,

    #[serde(rename = "PM10")]
    pub pm10: f64,

    #[serde(rename = "NO2")]
    pub no2: f64,

    #[serde(rename = "NOx", default)]
    pub nox: f64,

    #[serde(rename = "CO")]
    pub co: f64,

    #[serde(rename = "Ozone", default)]
    pub ozone: f64,

    /// Relative humidity (%)
    #[serde(rename = "RH", default)]
    pub rh: f64,

    /// Backend station identifier
    pub station_id: String,

    /// PM2.5 one hour ago
    #[serde(rename = "PM25_lag_1", default)]
    pub pm25_lag_1: f64,

    /// PM2.5 twenty-four hours ago
    #[serde(rename = "PM25_lag_24", default)]
    pub pm25_lag_24: f64,
}

impl SensorSnapshot {
    /// Parse the backend timestamp, if well formed.
    #[must_use]
    pub fn timestamp(&self) -> Option<NaiveDateTime> {
        NaiveDateTime::parse_from_str(&self.datetime, "%Y-%m-%d %H:%M:%S")
            .or_else(|_| NaiveDateTime::parse_from_str(&self.datetime, "%Y-%m-%dT%H:%M:%S"))
            .ok()
    }
}

/// Feature payload for `POST /predict`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredictionRequest {
    #[serde(rename = "PM10")]
    pub pm10: f64,

    #[serde(rename = "NO2")]
    pub no2: f64,

    #[serde(rename = "NO", default)]
    pub no: f64,

    #[serde(rename = "NOx", default)]
    pub nox: f64,

    #[serde(rename = "CO")]
    pub co: f64,

    #[serde(rename = "Ozone", default)]
    pub ozone: f64,

    #[serde(rename = "RH", default)]
    pub rh: f64,

    #[serde(rename = "PM25_lag_1", default)]
    pub pm25_lag_1: f64,

    #[serde(rename = "PM25_lag_24", default)]
    pub pm25_lag_24: f64,
}

impl From<&SensorSnapshot> for PredictionRequest {
    /// Seed a prediction from the live snapshot, the way the dashboard
    /// pre-fills its form.
    fn from(snapshot: &SensorSnapshot) -> Self {
        Self {
            pm10: snapshot.pm10,
            no2: snapshot.no2,
            no: 0.0,
            nox: snapshot.nox,
            co: snapshot.co,
            ozone: snapshot.ozone,
            rh: snapshot.rh,
            pm25_lag_1: snapshot.pm25_lag_1,
            pm25_lag_24: snapshot.pm25_lag_24,
        }
    }
}

/// Ensemble prediction from `POST /predict`.
///
/// Passed through unchanged; `aqi_category` stays a string because it is
/// backend presentation data (see `aqi::color_for_label` for the fallback).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Prediction {
    pub pm25_prediction: f64,

    pub aqi: u32,

    pub aqi_category: String,

    /// SHAP attribution sentences, most influential first
    pub explanation: Vec<String>,
}

/// Per-station row from `GET /comparison`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StationReading {
    pub name: String,

    #[serde(rename = "PM10")]
    pub pm10: f64,

    #[serde(rename = "PM25")]
    pub pm25: f64,

    #[serde(rename = "NO2")]
    pub no2: f64,

    #[serde(rename = "CO")]
    pub co: f64,

    #[serde(rename = "AQI")]
    pub aqi: u32,
}

/// Chatbot answer from `POST /chatbot/query`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatReply {
    pub response: String,

    pub intent: String,

    /// Absent on some error-path replies
    #[serde(default)]
    pub confidence: Option<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_station_parse_aliases() {
        assert_eq!("peenya".parse::<Station>(), Ok(Station::Peenya));
        assert_eq!("rvce".parse::<Station>(), Ok(Station::RvceMailsandra));
        assert_eq!("mailsandra".parse::<Station>(), Ok(Station::RvceMailsandra));
        assert_eq!("silk".parse::<Station>(), Ok(Station::Silkboard));
        assert_eq!("Silkboard".parse::<Station>(), Ok(Station::Silkboard));
        assert!("whitefield".parse::<Station>().is_err());
    }

    #[test]
    fn test_station_round_trip() {
        for station in Station::ALL {
            let parsed: Station = station.as_str().parse().unwrap();
            assert_eq!(parsed, station);
        }
    }

    #[test]
    fn test_parse_sample_latest() {
        let json = include_str!("../tools/sample_latest.json");
        let snapshot: SensorSnapshot = serde_json::from_str(json).unwrap();

        assert_eq!(snapshot.station_id, "Peenya");
        assert!((snapshot.pm10 - 80.0).abs() < f64::EPSILON);
        assert!(snapshot.timestamp().is_some());
    }

    #[test]
    fn test_parse_sample_prediction_passthrough() {
        let json = include_str!("../tools/sample_prediction.json");
        let prediction: Prediction = serde_json::from_str(json).unwrap();

        assert!((prediction.pm25_prediction - 42.5).abs() < f64::EPSILON);
        assert_eq!(prediction.aqi, 128);
        assert_eq!(prediction.aqi_category, "Moderate");
        assert_eq!(prediction.explanation.len(), 5);
    }

    #[test]
    fn test_parse_sample_comparison() {
        let json = include_str!("../tools/sample_comparison.json");
        let rows: Vec<StationReading> = serde_json::from_str(json).unwrap();

        assert_eq!(rows.len(), 3);
        assert!(rows.iter().any(|r| r.name == "Silkboard"));
    }

    #[test]
    fn test_prediction_request_wire_names() {
        let request = PredictionRequest {
            pm10: 80.0,
            no2: 28.5,
            no: 0.0,
            nox: 45.2,
            co: 1.1,
            ozone: 32.0,
            rh: 65.0,
            pm25_lag_1: 48.2,
            pm25_lag_24: 52.7,
        };

        let value = serde_json::to_value(&request).unwrap();
        assert!((value["PM10"].as_f64().unwrap() - 80.0).abs() < f64::EPSILON);
        assert!(value.get("PM25_lag_24").is_some());
        // Rust-side names must not leak onto the wire
        assert!(value.get("pm10").is_none());
    }

    #[test]
    fn test_request_from_snapshot() {
        let json = include_str!("../tools/sample_latest.json");
        let snapshot: SensorSnapshot = serde_json::from_str(json).unwrap();
        let request = PredictionRequest::from(&snapshot);

        assert!((request.pm10 - snapshot.pm10).abs() < f64::EPSILON);
        assert!((request.pm25_lag_1 - snapshot.pm25_lag_1).abs() < f64::EPSILON);
        assert!((request.no - 0.0).abs() < f64::EPSILON);
    }
}
