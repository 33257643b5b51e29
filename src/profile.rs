//! Skill data exchanged with the extraction collaborator.
//!
//! Field names follow the JSON the extraction prompts emit (`"Skill"`,
//! `"Proficiency Level"`, ...), so requirement and candidate files can be fed
//! in as produced.

use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;
use thiserror::Error;

static CODE_FENCE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)^\s*```(?:json)?\s*(.*?)\s*```\s*$").unwrap());

#[derive(Debug, Error)]
pub enum ProfileError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid skill data: {0}")]
    Json(#[from] serde_json::Error),
}

/// One skill as held by a job requirement or a candidate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkillRecord {
    #[serde(rename = "Skill")]
    pub name: String,
    /// Empty when missing or null; any other non-string value keeps its JSON text.
    #[serde(
        rename = "Proficiency Level",
        default,
        deserialize_with = "lenient_level"
    )]
    pub proficiency_level: String,
    /// Requirement side only; 1 is most critical.
    #[serde(rename = "Importance", default, skip_serializing_if = "Option::is_none")]
    pub importance: Option<i64>,
    #[serde(rename = "Explanation", default, skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,
    #[serde(rename = "Category", default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(
        rename = "Job Responsibility",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub responsibility: Option<String>,
}

impl SkillRecord {
    pub fn new(name: impl Into<String>, proficiency_level: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            proficiency_level: proficiency_level.into(),
            importance: None,
            explanation: None,
            category: None,
            responsibility: None,
        }
    }

    pub fn with_importance(mut self, importance: i64) -> Self {
        self.importance = Some(importance);
        self
    }

    pub fn with_explanation(mut self, explanation: impl Into<String>) -> Self {
        self.explanation = Some(explanation.into());
        self
    }

    pub fn importance_or(&self, default: i64) -> i64 {
        self.importance.unwrap_or(default)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateProfile {
    #[serde(rename = "Name", default = "unknown_candidate")]
    pub name: String,
    #[serde(rename = "Qualification", default, skip_serializing_if = "Option::is_none")]
    pub qualification: Option<String>,
    #[serde(rename = "Skills", default)]
    pub skills: Vec<SkillRecord>,
}

fn lenient_level<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(level)) => level,
        Some(other) => other.to_string(),
    })
}

fn unknown_candidate() -> String {
    "Unknown Candidate".to_string()
}

impl CandidateProfile {
    pub fn new(name: impl Into<String>, skills: Vec<SkillRecord>) -> Self {
        Self {
            name: name.into(),
            qualification: None,
            skills,
        }
    }

    /// First skill whose name equals `name` exactly. Later duplicates are never returned.
    pub fn find_skill(&self, name: &str) -> Option<&SkillRecord> {
        self.skills.iter().find(|skill| skill.name == name)
    }
}

fn strip_code_fence(text: &str) -> &str {
    CODE_FENCE
        .captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
        .unwrap_or_else(|| text.trim())
}

pub fn parse_requirements(text: &str) -> Result<Vec<SkillRecord>, ProfileError> {
    Ok(serde_json::from_str(strip_code_fence(text))?)
}

/// Accepts either a list of profiles or an object keyed by candidate name.
/// In the keyed form the key becomes the candidate's name.
pub fn parse_candidates(text: &str) -> Result<Vec<CandidateProfile>, ProfileError> {
    let text = strip_code_fence(text);
    if text.starts_with('[') {
        return Ok(serde_json::from_str(text)?);
    }

    let keyed: BTreeMap<String, CandidateProfile> = serde_json::from_str(text)?;
    Ok(keyed
        .into_iter()
        .map(|(name, mut profile)| {
            profile.name = name;
            profile
        })
        .collect())
}

fn read(path: &Path) -> Result<String, ProfileError> {
    fs::read_to_string(path).map_err(|source| ProfileError::Io {
        path: path.to_path_buf(),
        source,
    })
}

pub fn load_requirements(path: impl AsRef<Path>) -> Result<Vec<SkillRecord>, ProfileError> {
    parse_requirements(&read(path.as_ref())?)
}

pub fn load_candidates(path: impl AsRef<Path>) -> Result<Vec<CandidateProfile>, ProfileError> {
    parse_candidates(&read(path.as_ref())?)
}
