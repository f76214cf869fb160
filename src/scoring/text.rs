use regex::Regex;
use serde::Serialize;
use std::collections::HashSet;
use std::sync::LazyLock;
use strum::{Display, EnumIter, IntoEnumIterator};

use crate::settings::settings;

static WORD_SPLIT: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[^a-z0-9']+").unwrap());
static SENTENCE_SPLIT: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[.!?]+").unwrap());
static WHITESPACE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());
static AGE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(?:i am|i'm) (\d{1,3})\b").unwrap());

/// Tokenized view of one transcript. Recomputed fresh per scoring call and
/// never mutated afterwards.
#[derive(Debug, Clone, Serialize)]
pub struct TokenSet {
    /// Lowercased, whitespace-collapsed transcript.
    pub text: String,
    pub tokens: Vec<String>,
    pub distinct_words: usize,
    pub sentences: Vec<String>,
}

impl TokenSet {
    pub fn word_count(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}

/// Lowercases, splits on whitespace/punctuation boundaries (apostrophes
/// kept) and filters empty tokens. Whitespace-only input yields a
/// zero-token set, not an error.
pub fn preprocess(text: &str) -> TokenSet {
    let normalized = WHITESPACE
        .replace_all(text.replace(['\r', '\n'], " ").trim(), " ")
        .to_lowercase();

    let tokens: Vec<String> = WORD_SPLIT
        .split(&normalized)
        .filter(|t| t.chars().any(|c| c.is_ascii_alphanumeric()))
        .map(|t| t.to_string())
        .collect();

    let distinct_words = tokens.iter().collect::<HashSet<_>>().len();

    let sentences: Vec<String> = SENTENCE_SPLIT
        .split(&normalized)
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect();

    TokenSet {
        text: normalized,
        tokens,
        distinct_words,
        sentences,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumIter, Serialize)]
pub enum ContentElement {
    #[strum(to_string = "Name")]
    #[serde(rename = "Name")]
    Name,
    #[strum(to_string = "Age")]
    #[serde(rename = "Age")]
    Age,
    #[strum(to_string = "School/Class")]
    #[serde(rename = "School/Class")]
    SchoolClass,
    #[strum(to_string = "Family")]
    #[serde(rename = "Family")]
    Family,
    #[strum(to_string = "Hobbies/Interests")]
    #[serde(rename = "Hobbies/Interests")]
    Hobbies,
    #[strum(to_string = "About family (details)")]
    #[serde(rename = "About family (details)")]
    AboutFamily,
    #[strum(to_string = "Location/Origin")]
    #[serde(rename = "Location/Origin")]
    Location,
    #[strum(to_string = "Ambition/Goal/Dream")]
    #[serde(rename = "Ambition/Goal/Dream")]
    Ambition,
    #[strum(to_string = "Fun fact / Unique thing")]
    #[serde(rename = "Fun fact / Unique thing")]
    FunFact,
    #[strum(to_string = "Strengths/Achievements")]
    #[serde(rename = "Strengths/Achievements")]
    Achievements,
}

impl ContentElement {
    /// The first five elements are must-haves; the rest are good-to-have.
    pub fn is_required(&self) -> bool {
        matches!(
            self,
            Self::Name | Self::Age | Self::SchoolClass | Self::Family | Self::Hobbies
        )
    }

    pub fn points(&self) -> u8 {
        if self.is_required() {
            4
        } else {
            2
        }
    }

    fn patterns(&self) -> &'static [String] {
        let kw = &settings().keywords;
        match self {
            Self::Name => &kw.name,
            Self::Age => &kw.age,
            Self::SchoolClass => &kw.school_class,
            Self::Family => &kw.family,
            Self::Hobbies => &kw.hobbies,
            Self::AboutFamily => &kw.about_family,
            Self::Location => &kw.location,
            Self::Ambition => &kw.ambition,
            Self::FunFact => &kw.fun_fact,
            Self::Achievements => &kw.achievements,
        }
    }

    fn is_present_in(&self, tokens: &TokenSet) -> bool {
        if self.patterns().iter().any(|p| tokens.text.contains(p.as_str())) {
            return true;
        }
        // "i am 14" style mentions count as an age signal when the number
        // is a plausible age.
        if *self == Self::Age {
            return mentions_plausible_age(&tokens.text);
        }
        false
    }
}

fn mentions_plausible_age(text: &str) -> bool {
    let kw = &settings().keywords;
    AGE_PATTERN.captures_iter(text).any(|cap| {
        cap[1]
            .parse::<u32>()
            .map(|age| age >= kw.plausible_age_min && age <= kw.plausible_age_max)
            .unwrap_or(false)
    })
}

/// Presence of each rubric element, in fixed rubric order.
#[derive(Debug, Clone, Serialize)]
pub struct KeywordCoverage {
    pub elements: Vec<(ContentElement, bool)>,
}

impl KeywordCoverage {
    pub fn is_present(&self, element: ContentElement) -> bool {
        self.elements
            .iter()
            .any(|(e, present)| *e == element && *present)
    }

    pub fn present(&self) -> Vec<ContentElement> {
        self.elements
            .iter()
            .filter(|(_, p)| *p)
            .map(|(e, _)| *e)
            .collect()
    }

    pub fn missing(&self) -> Vec<ContentElement> {
        self.elements
            .iter()
            .filter(|(_, p)| !*p)
            .map(|(e, _)| *e)
            .collect()
    }

    pub fn missing_required(&self) -> Vec<ContentElement> {
        self.missing()
            .into_iter()
            .filter(|e| e.is_required())
            .collect()
    }
}

/// Case-insensitive, order-independent pattern matching over the whole
/// transcript.
pub fn detect_keywords(tokens: &TokenSet) -> KeywordCoverage {
    KeywordCoverage {
        elements: ContentElement::iter()
            .map(|e| (e, e.is_present_in(tokens)))
            .collect(),
    }
}

/// Single-word phrases must match a whole word; multi-word phrases match as
/// substrings. Keeps "hi" from firing inside "this".
fn phrase_matches(sentence: &str, phrase: &str) -> bool {
    if phrase.contains(' ') {
        sentence.contains(phrase)
    } else {
        WORD_SPLIT.split(sentence).any(|w| w == phrase)
    }
}

/// Salutation quality from the opening sentence: 5 for an enthusiastic
/// opener, 4 for a formal greeting, 2 for a bare one, 0 otherwise.
pub fn salutation_level(tokens: &TokenSet) -> u8 {
    let Some(first) = tokens.sentences.first() else {
        return 0;
    };
    let phrases = &settings().phrases;

    if phrases.enthusiastic.iter().any(|p| phrase_matches(first, p)) {
        5
    } else if phrases.formal.iter().any(|p| phrase_matches(first, p)) {
        4
    } else if phrases.simple.iter().any(|p| phrase_matches(first, p)) {
        2
    } else {
        0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Serialize)]
pub enum SentenceTag {
    #[strum(serialize = "SALUTATION")]
    Salutation,
    #[strum(serialize = "CLOSING")]
    Closing,
    #[strum(serialize = "BASIC")]
    Basic,
    #[strum(serialize = "ADDITIONAL")]
    Additional,
    #[strum(serialize = "OTHER")]
    Other,
}

fn sentence_has_salutation(s: &str) -> bool {
    let phrases = &settings().phrases;
    phrases
        .enthusiastic
        .iter()
        .chain(&phrases.formal)
        .chain(&phrases.simple)
        .any(|p| phrase_matches(s, p))
}

fn sentence_has_closing(s: &str) -> bool {
    settings().phrases.closings.iter().any(|p| s.contains(p.as_str()))
}

fn sentence_has_basic(s: &str) -> bool {
    let kw = &settings().keywords;
    kw.name
        .iter()
        .chain(&kw.age)
        .chain(&kw.school_class)
        .chain(&kw.location)
        .any(|p| s.contains(p.as_str()))
        || mentions_plausible_age(s)
}

fn sentence_has_additional(s: &str) -> bool {
    let kw = &settings().keywords;
    kw.family
        .iter()
        .chain(&kw.hobbies)
        .chain(&kw.ambition)
        .chain(&kw.fun_fact)
        .chain(&kw.achievements)
        .any(|p| s.contains(p.as_str()))
}

/// Tags each sentence for the opening/body/closing flow check.
pub fn structure_tags(tokens: &TokenSet) -> Vec<SentenceTag> {
    tokens
        .sentences
        .iter()
        .map(|s| {
            if sentence_has_salutation(s) {
                SentenceTag::Salutation
            } else if sentence_has_closing(s) {
                SentenceTag::Closing
            } else if sentence_has_basic(s) {
                SentenceTag::Basic
            } else if sentence_has_additional(s) {
                SentenceTag::Additional
            } else {
                SentenceTag::Other
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preprocess_empty_input() {
        for input in ["", "   ", "\n\t  \r\n"] {
            let tokens = preprocess(input);
            assert!(tokens.is_empty());
            assert_eq!(tokens.distinct_words, 0);
            assert!(tokens.sentences.is_empty());
        }
    }

    #[test]
    fn test_preprocess_strips_punctuation() {
        let tokens = preprocess("Hello, everyone! My name is Asha.");
        assert_eq!(
            tokens.tokens,
            vec!["hello", "everyone", "my", "name", "is", "asha"]
        );
        assert_eq!(tokens.sentences.len(), 2);
    }

    #[test]
    fn test_preprocess_keeps_contractions() {
        let tokens = preprocess("I'm from Pune");
        assert!(tokens.tokens.contains(&"i'm".to_string()));
    }

    #[test]
    fn test_detect_required_keywords() {
        let tokens = preprocess(
            "My name is Arjun. I am 14 years old and I study in class 9 at \
             Sunrise Public School. I live with my parents. I enjoy reading.",
        );
        let coverage = detect_keywords(&tokens);
        assert!(coverage.is_present(ContentElement::Name));
        assert!(coverage.is_present(ContentElement::Age));
        assert!(coverage.is_present(ContentElement::SchoolClass));
        assert!(coverage.is_present(ContentElement::Family));
        assert!(coverage.is_present(ContentElement::Hobbies));
        assert!(coverage.missing_required().is_empty());
    }

    #[test]
    fn test_age_from_plausible_number() {
        let tokens = preprocess("Hi, I am 12 and I study here");
        assert!(detect_keywords(&tokens).is_present(ContentElement::Age));

        let tokens = preprocess("I am 500 and I study here");
        assert!(!detect_keywords(&tokens).is_present(ContentElement::Age));
    }

    #[test]
    fn test_missing_required_listed_in_rubric_order() {
        let tokens = preprocess("Good morning everyone");
        let missing = detect_keywords(&tokens).missing_required();
        assert_eq!(
            missing,
            vec![
                ContentElement::Name,
                ContentElement::Age,
                ContentElement::SchoolClass,
                ContentElement::Family,
                ContentElement::Hobbies,
            ]
        );
    }

    #[test]
    fn test_salutation_levels() {
        assert_eq!(salutation_level(&preprocess("I am excited to be here today.")), 5);
        assert_eq!(salutation_level(&preprocess("Good morning teachers.")), 4);
        assert_eq!(salutation_level(&preprocess("Hello everyone.")), 4);
        assert_eq!(salutation_level(&preprocess("Hi, my name is Ravi.")), 2);
        assert_eq!(salutation_level(&preprocess("My name is Ravi.")), 0);
        assert_eq!(salutation_level(&preprocess("")), 0);
    }

    #[test]
    fn test_salutation_only_checks_first_sentence() {
        assert_eq!(salutation_level(&preprocess("My name is Ravi. Hello everyone.")), 0);
    }

    #[test]
    fn test_structure_tags() {
        let tokens = preprocess(
            "Hello everyone. My name is Meera. My family is very supportive. \
             The weather was nice today. Thank you for listening.",
        );
        let tags = structure_tags(&tokens);
        assert_eq!(
            tags,
            vec![
                SentenceTag::Salutation,
                SentenceTag::Basic,
                SentenceTag::Additional,
                SentenceTag::Other,
                SentenceTag::Closing,
            ]
        );
    }
}
