//! Popular-city matching for search and autocomplete.

pub const POPULAR_CITIES: &[&str] = &[
    "London", "New York", "Tokyo", "Paris", "Berlin", "Moscow", "Sydney", "Toronto",
    "Los Angeles", "Chicago", "Houston", "Phoenix", "Philadelphia", "San Antonio",
    "San Diego", "Dallas", "San Jose", "Austin", "Jacksonville", "San Francisco",
    "Mumbai", "Delhi", "Bangalore", "Kolkata", "Chennai", "Beijing", "Shanghai",
    "Singapore", "Dubai", "Istanbul", "Rome", "Madrid", "Barcelona", "Amsterdam",
    "Vienna", "Prague", "Budapest", "Warsaw", "Stockholm", "Copenhagen", "Oslo",
    "Helsinki", "Athens", "Lisbon", "Dublin", "Brussels", "Zurich", "Geneva", "Milan",
    "Venice", "Florence", "Naples", "Manchester", "Liverpool", "Edinburgh",
];

/// Shortest input that produces suggestions.
pub const MIN_SUGGEST_LEN: usize = 2;
pub const MAX_SUGGESTIONS: usize = 8;

/// Lowercase with all whitespace removed.
pub fn normalize(s: &str) -> String {
    s.chars()
        .filter(|c| !c.is_whitespace())
        .flat_map(char::to_lowercase)
        .collect()
}

/// First popular city whose normalised name contains the normalised input.
pub fn find_city(input: &str) -> Option<&'static str> {
    let needle = normalize(input);
    if needle.is_empty() {
        return None;
    }
    POPULAR_CITIES
        .iter()
        .copied()
        .find(|city| normalize(city).contains(&needle))
}

/// Autocomplete list for a partially typed name.
pub fn suggestions(input: &str) -> Vec<&'static str> {
    let needle = input.trim().to_lowercase();
    if needle.chars().count() < MIN_SUGGEST_LEN {
        return Vec::new();
    }
    POPULAR_CITIES
        .iter()
        .copied()
        .filter(|city| city.to_lowercase().contains(&needle))
        .take(MAX_SUGGESTIONS)
        .collect()
}
