//! Static demo data for when the backend is unreachable.
//!
//! Callers substitute this explicitly and must label it as demo output
//! (see `Observation`); the HTTP client itself never synthesizes data.

use crate::models::Prediction;

/// Illustrative prediction record, not derived from any model.
#[must_use]
pub fn demo_prediction() -> Prediction {
    Prediction {
        pm25_prediction: 42.5,
        aqi: 128,
        aqi_category: "Moderate".to_string(),
        explanation: vec![
            "PM10 increased PM2.5 by +1.23".to_string(),
            "Humidity reduced PM2.5 by -0.85".to_string(),
            "CO increased PM2.5 by +0.42".to_string(),
            "NOx increased PM2.5 by +0.38".to_string(),
            "Ozone reduced PM2.5 by -0.22".to_string(),
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_demo_prediction_values() {
        let demo = demo_prediction();
        assert!((demo.pm25_prediction - 42.5).abs() < f64::EPSILON);
        assert_eq!(demo.aqi, 128);
        assert_eq!(demo.aqi_category, "Moderate");
        assert_eq!(demo.explanation.len(), 5);
    }
}
