use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::sync::OnceLock;

static SETTINGS: OnceLock<Settings> = OnceLock::new();

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    pub rate: RateBands,
    pub grammar: GrammarSettings,
    pub vocabulary: TtrBands,
    pub clarity: ClaritySettings,
    pub engagement: EngagementSettings,
    pub fillers: Vec<String>,
    pub keywords: KeywordPatterns,
    pub phrases: PhraseBook,
}

/// A single scoring band. Whether `threshold` is a lower or upper bound
/// depends on the metric it belongs to (noted on each band list below).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Band {
    pub threshold: f64,
    pub points: u8,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateBands {
    pub ideal_min: f64,
    pub ideal_max: f64,
    pub slow_min: f64,
    pub fast_max: f64,
    pub ideal_points: u8,
    pub off_points: u8,
    pub extreme_points: u8,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GrammarSettings {
    /// errors_per_100 value at which the grammar fraction bottoms out.
    pub errors_per_100_cap: f64,
    /// Lower-bound bands over the grammar fraction, best first.
    pub bands: Vec<Band>,
    pub floor_points: u8,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TtrBands {
    /// Lower-bound bands over the type-token ratio, best first.
    pub bands: Vec<Band>,
    pub floor_points: u8,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClaritySettings {
    /// Upper-bound bands over the filler percentage, best first.
    pub bands: Vec<Band>,
    pub floor_points: u8,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngagementSettings {
    /// Lower-bound bands over the positive sentiment proportion, best first.
    pub bands: Vec<Band>,
    pub floor_points: u8,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeywordPatterns {
    pub name: Vec<String>,
    pub age: Vec<String>,
    pub school_class: Vec<String>,
    pub family: Vec<String>,
    pub hobbies: Vec<String>,
    pub about_family: Vec<String>,
    pub location: Vec<String>,
    pub ambition: Vec<String>,
    pub fun_fact: Vec<String>,
    pub achievements: Vec<String>,
    pub plausible_age_min: u32,
    pub plausible_age_max: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PhraseBook {
    pub enthusiastic: Vec<String>,
    pub formal: Vec<String>,
    pub simple: Vec<String>,
    pub closings: Vec<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            rate: RateBands {
                ideal_min: 111.0,
                ideal_max: 140.0,
                slow_min: 80.0,
                fast_max: 160.0,
                ideal_points: 10,
                off_points: 6,
                extreme_points: 2,
            },
            grammar: GrammarSettings {
                errors_per_100_cap: 20.0,
                bands: vec![
                    Band { threshold: 0.8, points: 10 },
                    Band { threshold: 0.6, points: 8 },
                    Band { threshold: 0.4, points: 6 },
                    Band { threshold: 0.2, points: 4 },
                ],
                floor_points: 2,
            },
            vocabulary: TtrBands {
                bands: vec![
                    Band { threshold: 0.9, points: 10 },
                    Band { threshold: 0.7, points: 8 },
                    Band { threshold: 0.5, points: 6 },
                    Band { threshold: 0.3, points: 4 },
                ],
                floor_points: 2,
            },
            clarity: ClaritySettings {
                bands: vec![
                    Band { threshold: 3.0, points: 15 },
                    Band { threshold: 6.0, points: 12 },
                    Band { threshold: 9.0, points: 9 },
                    Band { threshold: 12.0, points: 6 },
                ],
                floor_points: 3,
            },
            engagement: EngagementSettings {
                bands: vec![
                    Band { threshold: 0.7, points: 15 },
                    Band { threshold: 0.5, points: 12 },
                    Band { threshold: 0.3, points: 9 },
                    Band { threshold: 0.1, points: 6 },
                ],
                floor_points: 3,
            },
            fillers: vec![
                "um".into(),
                "uh".into(),
                "like".into(),
                "you know".into(),
                "so".into(),
                "actually".into(),
                "basically".into(),
                "right".into(),
                "i mean".into(),
                "well".into(),
                "kinda".into(),
                "sort of".into(),
                "okay".into(),
                "hmm".into(),
                "ah".into(),
            ],
            keywords: KeywordPatterns {
                name: vec!["my name is".into(), "myself".into(), "i am ".into()],
                age: vec!["years old".into(), "years of age".into()],
                school_class: vec![
                    "class ".into(),
                    "standard".into(),
                    "grade ".into(),
                    "school".into(),
                ],
                family: vec![
                    "family".into(),
                    "mother".into(),
                    "father".into(),
                    "parents".into(),
                    "brother".into(),
                    "sister".into(),
                ],
                hobbies: vec![
                    "my hobby is".into(),
                    "my hobbies are".into(),
                    "i like to".into(),
                    "i love to".into(),
                    "i enjoy".into(),
                    "in my free time".into(),
                ],
                about_family: vec![
                    "my family is".into(),
                    "we are a family of".into(),
                    "members in my family".into(),
                ],
                location: vec![
                    "i am from".into(),
                    "i'm from".into(),
                    "i live in".into(),
                    "my hometown".into(),
                ],
                ambition: vec![
                    "i want to become".into(),
                    "i want to be".into(),
                    "my dream is".into(),
                    "my goal is".into(),
                    "my ambition is".into(),
                ],
                fun_fact: vec![
                    "fun fact".into(),
                    "something unique about me".into(),
                    "one thing about me".into(),
                    "an interesting thing about me".into(),
                ],
                achievements: vec![
                    "i am good at".into(),
                    "i'm good at".into(),
                    "my strength is".into(),
                    "my strengths are".into(),
                    "i have won".into(),
                    "i won".into(),
                    "i achieved".into(),
                    "i have achieved".into(),
                ],
                plausible_age_min: 3,
                plausible_age_max: 100,
            },
            phrases: PhraseBook {
                enthusiastic: vec![
                    "excited to introduce myself".into(),
                    "thrilled to introduce myself".into(),
                    "thrilled to be here".into(),
                    "excited to be here".into(),
                ],
                formal: vec![
                    "good morning".into(),
                    "good afternoon".into(),
                    "good evening".into(),
                    "hello everyone".into(),
                    "hello everybody".into(),
                ],
                simple: vec!["hello".into(), "hi".into(), "hey".into()],
                closings: vec![
                    "thank you".into(),
                    "thanks for listening".into(),
                    "that's all".into(),
                ],
            },
        }
    }
}

impl Settings {
    pub fn load() -> &'static Settings {
        SETTINGS.get_or_init(Self::load_from_files)
    }

    fn load_from_files() -> Settings {
        let default_path = Path::new("settings.default.ron");
        let override_path = Path::new("settings.ron");

        let mut settings = if default_path.exists() {
            fs::read_to_string(default_path)
                .ok()
                .and_then(|content| ron::from_str(&content).ok())
                .unwrap_or_default()
        } else {
            Settings::default()
        };

        if override_path.exists() {
            if let Ok(content) = fs::read_to_string(override_path) {
                if let Ok(overrides) = ron::from_str::<Settings>(&content) {
                    settings = overrides;
                }
            }
        }

        settings
    }
}

pub fn settings() -> &'static Settings {
    Settings::load()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_consistent() {
        let s = Settings::default();
        assert!(s.rate.slow_min < s.rate.ideal_min);
        assert!(s.rate.ideal_max < s.rate.fast_max);
        assert!(s.rate.ideal_points > s.rate.off_points);
        assert!(s.rate.off_points > s.rate.extreme_points);
    }

    #[test]
    fn test_bands_sorted_best_first() {
        let s = Settings::default();
        for bands in [&s.grammar.bands, &s.vocabulary.bands, &s.engagement.bands] {
            for pair in bands.windows(2) {
                assert!(pair[0].threshold > pair[1].threshold);
                assert!(pair[0].points > pair[1].points);
            }
        }
        for pair in s.clarity.bands.windows(2) {
            assert!(pair[0].threshold < pair[1].threshold);
            assert!(pair[0].points > pair[1].points);
        }
    }

    #[test]
    fn test_default_ron_roundtrip() {
        let s = Settings::default();
        let ron = ron::to_string(&s).expect("serialize settings");
        let back: Settings = ron::from_str(&ron).expect("deserialize settings");
        assert_eq!(back.fillers, s.fillers);
        assert_eq!(back.rate.ideal_points, s.rate.ideal_points);
    }
}
