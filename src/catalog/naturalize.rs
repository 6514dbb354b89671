//! Sort keys for catalog titles and names.

use lazy_static::lazy_static;
use regex::{Captures, Regex};
use unicode_normalization::UnicodeNormalization;

lazy_static! {
    static ref PUNCTUATION: Regex = Regex::new(r"[^a-z0-9\s]").unwrap();
    static ref LEADING_ARTICLE: Regex = Regex::new(r"^(a|an|the)\s+").unwrap();
    static ref DIGITS: Regex = Regex::new(r"\d+").unwrap();
}

/// Builds the key used to sort titles "naturally": accents are dropped, case and
/// punctuation are ignored, a leading English article is skipped and numbers are
/// zero-padded so that "Track 2" sorts before "Track 10".
pub fn naturalize(text: &str) -> String {
    let ascii: String = text.nfkd().filter(char::is_ascii).collect();
    let lowered = ascii.to_lowercase();
    let spaced = PUNCTUATION.replace_all(&lowered, " ");
    // Inner runs of spaces are kept, only the ends are trimmed.
    let without_article = LEADING_ARTICLE.replace(spaced.trim(), "");
    DIGITS
        .replace_all(&without_article, |caps: &Captures| {
            let digits = caps[0].trim_start_matches('0');
            let digits = if digits.is_empty() { "0" } else { digits };
            format!("{:0>8}", digits)
        })
        .into_owned()
}

/// Display name of an artist: `first "alias" last` when both an alias and a real
/// name are known, the alias alone, or the real name alone.
pub fn artist_full_name(alias: &str, first_name: &str, last_name: &str) -> String {
    let real_name = [first_name.trim(), last_name.trim()]
        .into_iter()
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>();
    let alias = alias.trim();

    if alias.is_empty() {
        return real_name.join(" ");
    }
    match real_name.as_slice() {
        [] => alias.to_string(),
        _ => {
            let mut parts = Vec::with_capacity(3);
            if !first_name.trim().is_empty() {
                parts.push(first_name.trim().to_string());
            }
            parts.push(format!("\"{}\"", alias));
            if !last_name.trim().is_empty() {
                parts.push(last_name.trim().to_string());
            }
            parts.join(" ")
        }
    }
}
