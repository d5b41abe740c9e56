use once_cell::sync::Lazy;
use regex::Regex;

static NON_ALPHANUMERIC: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^A-Za-z0-9\s]").unwrap());

/// Reduces a free-text candidate title to a usable search query
///
/// Model responses carry stray numbering and punctuation around titles;
/// everything outside letters, digits, and whitespace is stripped and the
/// remainder trimmed.
pub fn normalize_title(raw: &str) -> String {
    NON_ALPHANUMERIC.replace_all(raw, "").trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_strips_punctuation() {
        assert_eq!(normalize_title("Inception (2010)!"), "Inception 2010");
    }

    #[test]
    fn test_normalize_empty() {
        assert_eq!(normalize_title(""), "");
    }

    #[test]
    fn test_normalize_punctuation_only() {
        assert_eq!(normalize_title("***"), "");
    }

    #[test]
    fn test_normalize_preserves_interior_whitespace() {
        assert_eq!(normalize_title("  The Thing  "), "The Thing");
    }

    #[test]
    fn test_normalize_output_alphabet() {
        let inputs = [
            "1. Blade Runner",
            "\"Heat\" (1995)",
            "Amélie",
            "Spider-Man: No Way Home",
        ];
        for input in inputs {
            let cleaned = normalize_title(input);
            assert!(
                cleaned
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || c.is_whitespace()),
                "unexpected character in {:?}",
                cleaned
            );
            assert_eq!(cleaned, cleaned.trim());
        }
    }
}
