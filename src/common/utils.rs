use lazy_static::lazy_static;
use regex::Regex;
use std::time::Duration;

lazy_static! {
    /// Punctuation stripped from title words before comparison
    static ref TITLE_PUNCTUATION: Regex = Regex::new(r"[.,?():]").unwrap();
}

/// Format a duration as "1h 02m 03s", "2m 03s" or "3.21s"
pub fn format_elapsed(elapsed: Duration) -> String {
    let secs = elapsed.as_secs();
    if secs >= 3600 {
        format!("{}h {:02}m {:02}s", secs / 3600, (secs % 3600) / 60, secs % 60)
    } else if secs >= 60 {
        format!("{}m {:02}s", secs / 60, secs % 60)
    } else {
        format!("{:.2}s", elapsed.as_secs_f64())
    }
}

/// Strip title punctuation and lowercase
pub fn normalize_word(word: &str) -> String {
    TITLE_PUNCTUATION.replace_all(word, "").to_lowercase()
}

/// Normalized words of a title, in order, repeats kept.
/// Titles are split on single spaces; empty tokens are dropped.
pub fn title_words(title: &str) -> Vec<String> {
    title
        .split(' ')
        .map(normalize_word)
        .filter(|w| !w.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_word() {
        assert_eq!(normalize_word("Learning:"), "learning");
        assert_eq!(normalize_word("(Deep)"), "deep");
        assert_eq!(normalize_word("why?"), "why");
        assert_eq!(normalize_word("e.g.,"), "eg");
        assert_eq!(normalize_word("DNA-binding"), "dna-binding");
    }

    #[test]
    fn test_title_words_keep_repeats() {
        assert_eq!(
            title_words("Deep, deep  Learning."),
            vec!["deep", "deep", "learning"]
        );
    }

    #[test]
    fn test_title_words_of_punctuation_only_title() {
        assert!(title_words("(:)").is_empty());
    }

    #[test]
    fn test_format_elapsed() {
        assert_eq!(format_elapsed(Duration::from_millis(1500)), "1.50s");
        assert_eq!(format_elapsed(Duration::from_secs(125)), "2m 05s");
        assert_eq!(format_elapsed(Duration::from_secs(3723)), "1h 02m 03s");
    }
}
