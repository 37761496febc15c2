//! Keyword-based weather detection and location extraction.
//!
//! This is a heuristic. A weather question without a marker phrase falls back
//! to "last word is the location", so "what's the weather" yields "weather".
//! The weather provider rejects locations it cannot resolve.

/// Words that mark a prompt as a weather query.
const TRIGGER_WORDS: &[&str] = &["weather", "temperature", "forecast"];

/// Phrases that precede a location, tried in order.
const LOCATION_MARKERS: &[&str] = &[
    "weather in",
    "temperature in",
    "forecast in",
    "forecast for",
    "what's the weather in",
    "how's the weather in",
];

/// Trailing characters stripped from an extracted location.
const TRAILING_PUNCTUATION: &[char] = &['?', '!', '.', ','];

/// True if the lowercased text contains any trigger word as a substring.
pub fn is_weather_query(text: &str) -> bool {
    let lower = text.to_lowercase();
    TRIGGER_WORDS.iter().any(|w| lower.contains(w))
}

/// Best-guess location for a weather query. Never fails; may return `""`.
///
/// Besides surrounding whitespace, trailing `? ! . ,` are stripped on purpose so
/// "What's the weather in Paris?" yields `paris` rather than `paris?`.
pub fn extract_location(text: &str) -> String {
    let lower = text.to_lowercase();

    for marker in LOCATION_MARKERS {
        if let Some(idx) = lower.find(marker) {
            return clean(&lower[idx + marker.len()..]);
        }
    }

    lower
        .split_whitespace()
        .last()
        .map(clean)
        .unwrap_or_default()
}

fn clean(raw: &str) -> String {
    raw.trim()
        .trim_end_matches(TRAILING_PUNCTUATION)
        .trim_end()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_weather_queries() {
        assert!(is_weather_query("What's the weather in Paris?"));
        assert!(is_weather_query("TEMPERATURE in Oslo"));
        assert!(is_weather_query("give me the forecast"));
    }

    #[test]
    fn ignores_other_prompts() {
        assert!(!is_weather_query("Explain quicksort"));
        assert!(!is_weather_query(""));
    }

    #[test]
    fn substring_match_has_no_word_boundaries() {
        // accepted false positive of substring matching
        assert!(is_weather_query("is this weatherproof?"));
    }

    #[test]
    fn extracts_after_marker() {
        assert_eq!(extract_location("weather in new york"), "new york");
        assert_eq!(extract_location("Temperature in  Buenos Aires  "), "buenos aires");
        assert_eq!(extract_location("forecast for Lagos"), "lagos");
    }

    #[test]
    fn conversational_variants() {
        assert_eq!(extract_location("What's the weather in Paris?"), "paris");
        assert_eq!(extract_location("How's the weather in Kyoto today"), "kyoto today");
    }

    #[test]
    fn falls_back_to_last_word() {
        assert_eq!(extract_location("random text tokyo"), "tokyo");
        assert_eq!(extract_location("weather Berlin!"), "berlin");
    }

    #[test]
    fn markerless_query_yields_last_word() {
        assert_eq!(extract_location("what's the weather"), "weather");
    }

    #[test]
    fn empty_input_yields_empty_location() {
        assert_eq!(extract_location(""), "");
        assert_eq!(extract_location("   "), "");
        assert_eq!(extract_location("weather in"), "");
    }
}
