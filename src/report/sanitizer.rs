//! Vocabulary sanitizer for generated report text
//!
//! The model is told to say "Composite Risk Index" instead of "crime"; this
//! enforces it on whatever comes back.

use regex::Regex;
use std::sync::LazyLock;
use tracing::debug;

const RISK_TERM: &str = "Composite Risk Index";

/// Banned phrasing and its replacement, applied in order
static BANNED_TERMS: LazyLock<Vec<(Option<Regex>, &'static str)>> = LazyLock::new(|| {
    vec![
        (
            Regex::new(r"(?i)\bcrime\s+(rates?|index|indices|scores?|levels?|statistics)\b").ok(),
            RISK_TERM,
        ),
        (Regex::new(r"(?i)\bcrimes?\b").ok(), RISK_TERM),
    ]
});

/// Rewrite banned terms. Returns the cleaned text and the number of rewrites.
pub fn sanitize_vocabulary(text: &str) -> (String, usize) {
    let mut cleaned = text.to_string();
    let mut rewrites = 0;

    for (pattern, replacement) in BANNED_TERMS.iter() {
        if let Some(re) = pattern {
            let hits = re.find_iter(&cleaned).count();
            if hits > 0 {
                rewrites += hits;
                cleaned = re.replace_all(&cleaned, *replacement).into_owned();
            }
        }
    }

    if rewrites > 0 {
        debug!("[Report] Rewrote {} banned term(s) in generated text", rewrites);
    }
    (cleaned, rewrites)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rewrites_crime_phrasing() {
        let (text, n) = sanitize_vocabulary("Low crime rates and minimal Crime nearby.");
        assert_eq!(n, 2);
        assert_eq!(
            text,
            "Low Composite Risk Index and minimal Composite Risk Index nearby."
        );
    }

    #[test]
    fn leaves_clean_text_and_substrings() {
        let input = "A criminology-adjacent metric? No: the Composite Risk Index is 12.";
        let (text, n) = sanitize_vocabulary(input);
        assert_eq!(n, 0);
        assert_eq!(text, input);
    }
}
