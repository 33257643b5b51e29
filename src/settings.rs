use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::sync::OnceLock;
use strum::Display;

static SETTINGS: OnceLock<Settings> = OnceLock::new();

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    pub scoring: Scoring,
    pub classifier: Classifier,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scoring {
    pub weights: ScoringWeights,
    pub relevance: RelevancePoints,
    pub proficiency: ProficiencyCredit,
    pub importance: ImportanceSettings,
    /// Ceiling of a single requirement's score, used to derive the maximum total.
    pub max_skill_score: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoringWeights {
    pub relevance: f32,
    pub proficiency: f32,
    pub importance: f32,
}

impl ScoringWeights {
    pub fn sum(&self) -> f32 {
        self.relevance + self.proficiency + self.importance
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RelevancePoints {
    pub full_match: f32,
    pub partial_match: f32,
    pub no_match: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProficiencyCredit {
    pub meets_requirement: f32,
    pub one_level_below: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImportanceSettings {
    pub default: i64,
    /// Requirements at or below this importance add nothing when relevance is zero.
    pub non_critical_max: i64,
    pub missed_offset: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
pub enum ClassifierBackend {
    #[strum(serialize = "exact-name")]
    Exact,
    #[strum(serialize = "llm")]
    Llm,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Classifier {
    pub backend: ClassifierBackend,
    pub workers: usize,
    pub timeout_ms: u64,
    pub endpoint: String,
    pub model: String,
    pub api_key_env: String,
    pub cache: bool,
}

impl Default for Scoring {
    fn default() -> Self {
        Self {
            weights: ScoringWeights {
                relevance: 0.60,
                proficiency: 0.20,
                importance: 0.20,
            },
            relevance: RelevancePoints {
                full_match: 1.0,
                partial_match: 0.5,
                no_match: 0.0,
            },
            proficiency: ProficiencyCredit {
                meets_requirement: 1.0,
                one_level_below: 0.5,
            },
            importance: ImportanceSettings {
                default: 3,
                non_critical_max: 2,
                missed_offset: 0.1,
            },
            max_skill_score: 1.5,
        }
    }
}

impl Default for Classifier {
    fn default() -> Self {
        Self {
            backend: ClassifierBackend::Exact,
            workers: 4,
            timeout_ms: 20_000,
            endpoint: "https://api.openai.com/v1/chat/completions".to_string(),
            model: "gpt-4o-mini".to_string(),
            api_key_env: "OPENAI_API_KEY".to_string(),
            cache: true,
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

        let mut settings = read_settings(default_path).unwrap_or_default();

        if let Some(overrides) = read_settings(override_path) {
            settings = overrides;
        }

        settings
    }
}

fn read_settings(path: &Path) -> Option<Settings> {
    if !path.exists() {
        return None;
    }

    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "could not read settings file");
            return None;
        }
    };

    match ron::from_str::<Settings>(&content) {
        Ok(settings) => Some(settings),
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "ignoring malformed settings file");
            None
        }
    }
}

pub fn settings() -> &'static Settings {
    Settings::load()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_weights_sum_to_one() {
        let weights = Scoring::default().weights;
        assert!((weights.sum() - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_shipped_defaults_match_code_defaults() {
        let shipped: Settings = ron::from_str(include_str!("../settings.default.ron"))
            .expect("settings.default.ron should parse");
        assert_eq!(shipped, Settings::default());
    }

    #[test]
    fn test_backend_display() {
        assert_eq!(ClassifierBackend::Exact.to_string(), "exact-name");
        assert_eq!(ClassifierBackend::Llm.to_string(), "llm");
    }
}
