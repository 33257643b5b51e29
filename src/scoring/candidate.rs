use serde::Serialize;

use super::classification::RelevanceClassifier;
use super::skill::{SkillScoreBreakdown, SkillScorer};
use crate::profile::{CandidateProfile, SkillRecord};

#[derive(Debug, Clone, Serialize)]
pub struct RequirementScore {
    pub requirement: String,
    /// `None` when the candidate lists no skill with this exact name.
    pub matched: Option<SkillScoreBreakdown>,
}

impl RequirementScore {
    pub fn score(&self) -> f32 {
        self.matched.as_ref().map(|m| m.score).unwrap_or(0.0)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CandidateScore {
    pub candidate: String,
    pub total: f32,
    pub max_possible: f32,
    /// 0 to 100.
    pub normalized: f32,
    pub requirements: Vec<RequirementScore>,
}

impl CandidateScore {
    pub fn matched_count(&self) -> usize {
        self.requirements
            .iter()
            .filter(|r| r.matched.is_some())
            .count()
    }

    pub fn classifier_failures(&self) -> usize {
        self.requirements
            .iter()
            .filter_map(|r| r.matched.as_ref())
            .filter(|m| m.classifier_failed())
            .count()
    }
}

/// Scores one candidate against an already deduplicated requirement list.
///
/// Each requirement is paired with the first candidate skill of the exact same
/// name; unpaired requirements add nothing. The total is normalized against
/// `requirements.len() * max_skill_score` and capped at 100. An empty
/// requirement list scores 0.
pub fn score_candidate<C: RelevanceClassifier>(
    scorer: &SkillScorer<C>,
    candidate: &CandidateProfile,
    requirements: &[SkillRecord],
) -> CandidateScore {
    let requirement_scores: Vec<RequirementScore> = requirements
        .iter()
        .map(|required| RequirementScore {
            requirement: required.name.clone(),
            matched: candidate
                .find_skill(&required.name)
                .map(|skill| scorer.score(skill, required)),
        })
        .collect();

    let total: f32 = requirement_scores.iter().map(RequirementScore::score).sum();
    let max_possible = requirements.len() as f32 * scorer.config().max_skill_score;

    let normalized = if max_possible > 0.0 {
        (total / max_possible * 100.0).min(100.0)
    } else {
        0.0
    };

    CandidateScore {
        candidate: candidate.name.clone(),
        total,
        max_possible,
        normalized,
        requirements: requirement_scores,
    }
}
