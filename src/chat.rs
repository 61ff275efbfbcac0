//! Chatbot REPL and offline fallback responder.
//!
//! Each line goes to the backend's intent classifier; when the backend is
//! unreachable the deterministic keyword responder answers instead, always
//! prefixed with an offline marker so canned text is never mistaken for a
//! live answer.

use std::io::{self, BufRead, Write};

use tracing::warn;

use crate::client::ApiClient;
use crate::models::Station;

/// Marker prefixed to every offline fallback answer.
pub const OFFLINE_MARKER: &str = "[offline]";

/// Infer a station from free text using the backend's alias rules.
#[must_use]
pub fn infer_station(text: &str) -> Option<Station> {
    let lower = text.to_lowercase();

    if lower.contains("peenya") {
        Some(Station::Peenya)
    } else if lower.contains("rvce") || lower.contains("mailsandra") {
        Some(Station::RvceMailsandra)
    } else if lower.contains("silk") || lower.contains("silboard") {
        Some(Station::Silkboard)
    } else {
        None
    }
}

fn contains_any(query: &str, keywords: &[&str]) -> bool {
    keywords.iter().any(|k| query.contains(k))
}

/// Keyword-matched answer for when the chatbot endpoint is unreachable.
///
/// Deterministic, no fabricated readings: live numbers come from `status`
/// and `compare`, not from here.
#[must_use]
pub fn offline_response(query: &str) -> String {
    let query = query.to_lowercase();

    if contains_any(&query, &["aqi", "air quality"]) {
        "AQI is reported per station (Peenya, RVCE Mailsandra, Silkboard). \
         Run `aqicast status --station <name>` for the live reading."
            .to_string()
    } else if contains_any(&query, &["safe", "outside", "outdoor", "jog", "run", "walk", "exercise"]) {
        "Outdoor safety depends on the current AQI tier: up to 100 is fine for \
         most people, 101-200 means sensitive groups should limit exertion, and \
         above 200 everyone should cut back. Check `aqicast status` for the live tier."
            .to_string()
    } else if contains_any(&query, &["pm2.5", "pm 2.5", "pm25"]) {
        "PM2.5 is particulate matter under 2.5 micrometers. It penetrates deep \
         into the lungs and bloodstream; the safe band is roughly 0-30 ug/m3."
            .to_string()
    } else if contains_any(&query, &["pm10", "pm 10"]) {
        "PM10 is particulate matter under 10 micrometers - dust, pollen, smoke. \
         Coarser than PM2.5 but still a respiratory irritant."
            .to_string()
    } else if contains_any(&query, &["compare", "comparison", "best", "worst", "cleanest", "rank"]) {
        "Run `aqicast compare` for a live side-by-side of all three stations, \
         sorted by AQI."
            .to_string()
    } else if contains_any(&query, &["hi", "hello", "hey"]) {
        "Hello! Ask me about current AQI, outdoor safety, pollutants, or \
         station comparisons."
            .to_string()
    } else if query.contains("help") {
        "I can answer questions about AQI levels, outdoor safety, pollutants \
         (PM2.5, PM10), and station comparisons. Just ask naturally."
            .to_string()
    } else if query.contains("thank") {
        "You're welcome! Stay safe and breathe easy.".to_string()
    } else {
        "I'm not sure how to answer that. Try asking about current AQI, air \
         quality, or whether it's safe to go outside."
            .to_string()
    }
}

/// Run the chat REPL over the given reader/writer.
///
/// Prompts for a station when none is configured, then forwards each line
/// to the chatbot endpoint. `exit` or `quit` (or EOF) ends the session.
///
/// # Errors
///
/// Returns an error if reading input or writing output fails.
pub fn run<R: BufRead, W: Write>(
    client: &ApiClient,
    mut station: Option<Station>,
    input: R,
    writer: &mut W,
) -> io::Result<()> {
    match station {
        Some(station) => writeln!(
            writer,
            "bot> Hi! Using {} for live AQI and safety checks. Ask away (exit to quit).",
            station.display_name()
        )?,
        None => writeln!(
            writer,
            "bot> Hi! What is your location? Choose Peenya, Silkboard, or RVCE."
        )?,
    }

    for line in input.lines() {
        let line = line?;
        let text = line.trim();
        if text.is_empty() {
            continue;
        }
        if text.eq_ignore_ascii_case("exit") || text.eq_ignore_ascii_case("quit") {
            break;
        }

        // Station selection phase: lock in a location before querying.
        if station.is_none() {
            if let Some(inferred) = infer_station(text) {
                station = Some(inferred);
                writeln!(
                    writer,
                    "bot> Got it - using {} for live checks. What would you like to know?",
                    inferred.display_name()
                )?;
            } else {
                writeln!(
                    writer,
                    "bot> Please pick a location first: Peenya, Silkboard, or RVCE."
                )?;
            }
            continue;
        }

        match client.chatbot_query(text, station) {
            Ok(reply) => {
                writeln!(writer, "bot> {}", reply.response)?;
                if let Some(confidence) = reply.confidence {
                    writeln!(writer, "     (intent: {}, confidence: {confidence:.2})", reply.intent)?;
                }
            }
            Err(error) => {
                warn!("chatbot unreachable, answering offline: {error}");
                writeln!(writer, "bot> {OFFLINE_MARKER} {}", offline_response(text))?;
            }
        }
        writer.flush()?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_infer_station_aliases() {
        assert_eq!(infer_station("air in Peenya today"), Some(Station::Peenya));
        assert_eq!(infer_station("near rvce campus"), Some(Station::RvceMailsandra));
        assert_eq!(infer_station("Mailsandra please"), Some(Station::RvceMailsandra));
        assert_eq!(infer_station("silkboard junction"), Some(Station::Silkboard));
        assert_eq!(infer_station("silk board"), Some(Station::Silkboard));
        assert_eq!(infer_station("somewhere else"), None);
    }

    #[test]
    fn test_offline_buckets() {
        assert!(offline_response("what is the current AQI?").contains("status"));
        assert!(offline_response("is it safe to go for a run?").contains("safety"));
        assert!(offline_response("what is PM2.5?").contains("2.5 micrometers"));
        assert!(offline_response("what is PM10?").contains("10 micrometers"));
        assert!(offline_response("compare the stations").contains("compare"));
        assert!(offline_response("hello there").contains("Hello"));
        assert!(offline_response("help").contains("I can answer"));
        assert!(offline_response("thanks!").contains("welcome"));
        assert!(offline_response("weather tomorrow?").contains("not sure"));
    }

    #[test]
    fn test_offline_response_never_empty() {
        for query in ["", "aqi", "zzz", "PM 2.5", "best station"] {
            assert!(!offline_response(query).is_empty());
        }
    }

    #[test]
    fn test_repl_station_selection_then_offline_answer() {
        // Unroutable backend: every query takes the offline path.
        let client = ApiClient::with_base_url("http://127.0.0.1:9").unwrap();
        let input = io::Cursor::new("nowhere\nsilkboard\nwhat is the aqi?\nexit\n");
        let mut output = Vec::new();

        run(&client, None, input, &mut output).unwrap();
        let text = String::from_utf8(output).unwrap();

        assert!(text.contains("pick a location"));
        assert!(text.contains("Silkboard"));
        assert!(text.contains(OFFLINE_MARKER));
    }
}
