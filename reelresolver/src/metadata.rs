//! Metadata extraction from free-form message text.
//!
//! Backend messages describe a title in loosely structured prose. These
//! helpers pull out the display fields the search API exposes: the first
//! line as title, a 4-digit year, an `IMDb: x.y` rating and a handful of
//! well-known genre keywords.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref YEAR_RE: Regex = Regex::new(r"\b(19|20)\d{2}\b").unwrap();
    static ref RATING_RE: Regex = Regex::new(r"(?i)imdb[:\s]*(\d+\.?\d*)").unwrap();
}

/// Genre keywords recognized in message text
const GENRES: &[&str] = &[
    "action",
    "thriller",
    "comedy",
    "drama",
    "horror",
    "sci-fi",
    "romance",
    "adventure",
];

/// Maximum snippet length, in characters
const SNIPPET_MAX_CHARS: usize = 200;

/// First non-empty line of the text, or "Unknown" when there is none
pub fn extract_title(text: &str) -> String {
    text.lines()
        .map(str::trim)
        .find(|line| !line.is_empty())
        .unwrap_or("Unknown")
        .to_string()
}

/// First 4-digit year token (1900-2099)
pub fn extract_year(text: &str) -> Option<u16> {
    YEAR_RE
        .find(text)
        .and_then(|m| m.as_str().parse::<u16>().ok())
}

/// IMDb rating, from patterns like `IMDb: 7.4` or `imdb 8`
pub fn extract_rating(text: &str) -> Option<f64> {
    RATING_RE
        .captures(text)
        .and_then(|c| c.get(1))
        .and_then(|m| m.as_str().parse::<f64>().ok())
}

/// Genre keywords found in the text, lowercased, in keyword-list order
pub fn extract_genres(text: &str) -> Vec<String> {
    let lower = text.to_lowercase();
    GENRES
        .iter()
        .filter(|g| lower.contains(*g))
        .map(|g| g.to_string())
        .collect()
}

/// Leading part of the text, at most 200 characters, char-boundary safe
pub fn snippet(text: &str) -> String {
    text.chars().take(SNIPPET_MAX_CHARS).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_title_first_line() {
        let text = "Inception (2010)\nIMDb: 8.8\nAction Sci-Fi Thriller";
        assert_eq!(extract_title(text), "Inception (2010)");
    }

    #[test]
    fn test_extract_title_skips_blank_lines() {
        assert_eq!(extract_title("\n\n  The Movie  \nrest"), "The Movie");
        assert_eq!(extract_title("   \n \n"), "Unknown");
        assert_eq!(extract_title(""), "Unknown");
    }

    #[test]
    fn test_extract_year() {
        assert_eq!(extract_year("Released in 1999, remastered"), Some(1999));
        assert_eq!(extract_year("Movie 2023 HD"), Some(2023));
        // 4-digit tokens outside 19xx/20xx are not years
        assert_eq!(extract_year("resolution 1080p, 3000 units"), None);
    }

    #[test]
    fn test_extract_rating() {
        assert_eq!(extract_rating("IMDb: 8.8"), Some(8.8));
        assert_eq!(extract_rating("imdb 7"), Some(7.0));
        assert_eq!(extract_rating("no rating here"), None);
    }

    #[test]
    fn test_extract_genres() {
        let genres = extract_genres("A Sci-Fi ACTION thriller like no other");
        assert_eq!(genres, vec!["action", "thriller", "sci-fi"]);
        assert!(extract_genres("documentary").is_empty());
    }

    #[test]
    fn test_snippet_truncates() {
        let long = "x".repeat(500);
        assert_eq!(snippet(&long).chars().count(), 200);
        assert_eq!(snippet("short"), "short");
    }
}
