use regex::Regex;
use std::sync::LazyLock;

use super::text::TokenSet;

static ORDINAL: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\d+(st|nd|rd|th)$").unwrap());
static GRADE_LABEL: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\d+[a-z]$").unwrap());
static REPEATED_PUNCT: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"!{2,}|\?{2,}|,{2,}|;{2,}").unwrap());

/// One independent grammar check. Each rule reports how many times it
/// triggers; the penalty count is the sum over all rules, uncapped here
/// (capping happens at scoring time via the errors-per-100 fraction).
pub struct GrammarRule {
    pub name: &'static str,
    check: fn(&str, &TokenSet) -> usize,
}

pub fn rules() -> &'static [GrammarRule] {
    &[
        GrammarRule {
            name: "lowercase-i",
            check: count_lowercase_i,
        },
        GrammarRule {
            name: "double-space",
            check: count_double_spaces,
        },
        GrammarRule {
            name: "mixed-digit-token",
            check: count_mixed_tokens,
        },
        GrammarRule {
            name: "repeated-punctuation",
            check: count_repeated_punctuation,
        },
    ]
}

pub fn penalty_count(raw_text: &str, tokens: &TokenSet) -> usize {
    rules().iter().map(|r| (r.check)(raw_text, tokens)).sum()
}

/// Standalone lowercase "i" used as a pronoun. Case-sensitive on the raw
/// text; a properly capitalized "I" never triggers.
fn count_lowercase_i(raw_text: &str, _tokens: &TokenSet) -> usize {
    raw_text
        .split_whitespace()
        .filter(|w| w.trim_matches(|c: char| !c.is_ascii_alphanumeric()) == "i")
        .count()
}

fn count_double_spaces(raw_text: &str, _tokens: &TokenSet) -> usize {
    raw_text.matches("  ").count()
}

/// Tokens mixing digits and letters in implausible ways. Ordinals ("1st")
/// and grade labels ("8b") are plausible in a self-introduction.
fn count_mixed_tokens(raw_text: &str, _tokens: &TokenSet) -> usize {
    raw_text
        .split_whitespace()
        .map(|w| {
            w.trim_matches(|c: char| !c.is_ascii_alphanumeric())
                .to_lowercase()
        })
        .filter(|w| {
            w.chars().any(|c| c.is_ascii_digit())
                && w.chars().any(|c| c.is_ascii_alphabetic())
                && !ORDINAL.is_match(w)
                && !GRADE_LABEL.is_match(w)
        })
        .count()
}

fn count_repeated_punctuation(raw_text: &str, _tokens: &TokenSet) -> usize {
    REPEATED_PUNCT.find_iter(raw_text).count()
}
