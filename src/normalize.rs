//! Field sanitizers for raw library export values.
//! Shared by the web-data build and the simple extraction commands.
//!
//! Every function here is total: bad input degrades to an empty/absent value,
//! never to an error.

use any_ascii::any_ascii;
use chrono::Datelike;
use once_cell::sync::Lazy;
use regex::Regex;
use unicode_normalization::UnicodeNormalization;

// ============================================================================
// REGEX PATTERNS
// ============================================================================

/// Anything that is not a slug character (after ASCII folding + lowercasing).
pub static NON_SLUG_CHARS: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^a-z0-9\s-]").unwrap());

/// Runs of whitespace and hyphens collapse into a single hyphen.
pub static SLUG_SEPARATORS: Lazy<Regex> = Lazy::new(|| Regex::new(r"[-\s]+").unwrap());

/// Trailing articles moved to the front of artist names, checked in order.
/// "Beatles, The" → "The Beatles"
pub const TRAILING_ARTICLES: [&str; 8] = [
    ", The", ", A", ", An", ", Le", ", La", ", Los", ", Las", ", El",
];

/// Slug used when nothing survives slugification.
pub const UNKNOWN_SLUG: &str = "unknown";

/// Earliest year accepted by [`sanitize_year`].
pub const MIN_YEAR: i32 = 1000;

// ============================================================================
// NAMES
// ============================================================================

/// A name is usable unless it is blank or only `?` placeholders.
pub fn is_valid_name(name: &str) -> bool {
    let clean = name.trim();
    !clean.is_empty() && !clean.chars().all(|c| c == '?')
}

/// Strip surrounding quote layers. Exports wrap values in `"` or `"""`
/// (sometimes several times); trimming every leading/trailing `"` removes
/// both forms in one pass.
pub fn strip_quotes(value: &str) -> &str {
    value.trim().trim_matches('"').trim()
}

/// Trimmed value, or `None` when blank.
pub fn safe_str(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Remove quotes and move a trailing article to the front.
pub fn sanitize_artist_name(name: &str) -> String {
    let name = strip_quotes(name);

    for article in TRAILING_ARTICLES {
        if let Some(rest) = strip_suffix_ignore_ascii_case(name, article) {
            // Article text without the ", " separator
            return format!("{} {}", &article[2..], rest).trim().to_string();
        }
    }

    name.to_string()
}

/// Albums only get quote removal.
pub fn sanitize_album_name(name: &str) -> String {
    strip_quotes(name).to_string()
}

fn strip_suffix_ignore_ascii_case<'a>(value: &'a str, suffix: &str) -> Option<&'a str> {
    let split = value.len().checked_sub(suffix.len())?;
    if !value.is_char_boundary(split) {
        return None;
    }
    let (head, tail) = value.split_at(split);
    tail.eq_ignore_ascii_case(suffix).then_some(head)
}

// ============================================================================
// GENRE / YEAR / NUMBERS
// ============================================================================

/// Genre with quotes removed; `None` unless it contains an ASCII letter
/// (numeric-only and punctuation-only genres are noise).
pub fn sanitize_genre(genre: &str) -> Option<String> {
    let g = strip_quotes(genre);
    if g.chars().any(|c| c.is_ascii_alphabetic()) {
        Some(g.to_string())
    } else {
        None
    }
}

/// Year in `[MIN_YEAR, ceiling]`, otherwise `None`. The ceiling is the
/// calendar year of the run.
pub fn sanitize_year(value: &str, ceiling: i32) -> Option<i32> {
    let year = safe_int(value);
    if year >= MIN_YEAR as i64 && year <= ceiling as i64 {
        Some(year as i32)
    } else {
        None
    }
}

/// Calendar year at run time (local clock).
pub fn current_year() -> i32 {
    chrono::Local::now().year()
}

/// Parse as float and truncate toward zero. Empty, non-numeric and
/// non-finite input yields 0.
pub fn safe_int(value: &str) -> i64 {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return 0;
    }
    match trimmed.parse::<f64>() {
        Ok(f) if f.is_finite() => f.trunc() as i64,
        _ => 0,
    }
}

/// Zero and negative values mean "unknown" for counts and rates.
pub fn positive(value: i64) -> Option<i64> {
    (value > 0).then_some(value)
}

/// Only an exact zero is "unset"; negative adjustments are real values.
pub fn non_zero(value: i64) -> Option<i64> {
    (value != 0).then_some(value)
}

/// Format whole seconds as `m:ss`.
pub fn format_duration(seconds: i64) -> String {
    if seconds == 0 {
        return "0:00".to_string();
    }
    format!("{}:{:02}", seconds.div_euclid(60), seconds.rem_euclid(60))
}

// ============================================================================
// SLUGS
// ============================================================================

/// Check if a character is a Unicode combining mark (diacritical mark).
pub fn is_combining_mark(c: char) -> bool {
    matches!(c, '\u{0300}'..='\u{036F}' | '\u{1AB0}'..='\u{1AFF}' |
             '\u{1DC0}'..='\u{1DFF}' | '\u{20D0}'..='\u{20FF}' |
             '\u{FE20}'..='\u{FE2F}')
}

/// Fold to lowercase ASCII: strip diacritics via NFKD, then transliterate
/// whatever is left (Cyrillic, CJK, ...).
pub fn fold_to_ascii(s: &str) -> String {
    let stripped: String = s.nfkd().filter(|c| !is_combining_mark(*c)).collect();
    any_ascii(&stripped).to_lowercase()
}

/// URL-safe identifier for a display name.
///
/// Distinct names can collide ("AC/DC" and "ACDC" both become `acdc`);
/// collisions are not disambiguated here.
pub fn slugify(text: &str) -> String {
    let folded = fold_to_ascii(text);
    let kept = NON_SLUG_CHARS.replace_all(&folded, "");
    let hyphenated = SLUG_SEPARATORS.replace_all(&kept, "-");
    let slug = hyphenated.trim_matches('-');
    if slug.is_empty() {
        UNKNOWN_SLUG.to_string()
    } else {
        slug.to_string()
    }
}

// ============================================================================
// TESTS
// ============================================================================
