use serde::Serialize;

use super::classification::{RelevanceClassifier, RelevanceOutcome};
use super::proficiency::{compare, ProficiencyComparison};
use crate::profile::SkillRecord;
use crate::settings::Scoring;

#[derive(Debug, Clone, Serialize)]
pub struct SkillScoreBreakdown {
    pub skill: String,
    pub candidate_level: String,
    pub required_level: String,
    pub relevance: RelevanceOutcome,
    pub relevance_points: f32,
    pub proficiency: ProficiencyComparison,
    pub proficiency_points: f32,
    pub importance: i64,
    /// Already weighted; added to the total as is.
    pub importance_term: f32,
    pub score: f32,
}

impl SkillScoreBreakdown {
    pub fn classifier_failed(&self) -> bool {
        self.relevance.is_err()
    }
}

/// Weighted score of one candidate skill against the requirement of the same name.
pub struct SkillScorer<C> {
    config: Scoring,
    classifier: C,
}

impl<C: RelevanceClassifier> SkillScorer<C> {
    pub fn new(config: Scoring, classifier: C) -> Self {
        Self { config, classifier }
    }

    pub fn config(&self) -> &Scoring {
        &self.config
    }

    pub fn classifier(&self) -> &C {
        &self.classifier
    }

    pub fn score(&self, candidate: &SkillRecord, required: &SkillRecord) -> SkillScoreBreakdown {
        let s = &self.config;

        let relevance = self.classifier.classify(&candidate.name, &required.name);
        if let Err(e) = &relevance {
            tracing::warn!(
                candidate_skill = %candidate.name,
                required_skill = %required.name,
                classifier = self.classifier.name(),
                error = %e,
                "relevance classification failed, scoring as no match"
            );
        }
        let relevance_points = relevance
            .as_ref()
            .map(|r| r.points(&s.relevance))
            .unwrap_or(0.0);

        let proficiency = compare(&candidate.proficiency_level, &required.proficiency_level);
        let importance = required.importance_or(s.importance.default);

        let (proficiency_points, importance_term) = if relevance_points > 0.0 {
            (
                self.proficiency_points(proficiency),
                importance as f32 * s.weights.importance,
            )
        } else if importance <= s.importance.non_critical_max {
            (0.0, 0.0)
        } else {
            (0.0, s.importance.missed_offset)
        };

        let score = relevance_points * s.weights.relevance
            + proficiency_points * s.weights.proficiency
            + importance_term;

        SkillScoreBreakdown {
            skill: required.name.clone(),
            candidate_level: candidate.proficiency_level.clone(),
            required_level: required.proficiency_level.clone(),
            relevance,
            relevance_points,
            proficiency,
            proficiency_points,
            importance,
            importance_term,
            score,
        }
    }

    fn proficiency_points(&self, comparison: ProficiencyComparison) -> f32 {
        let credit = &self.config.proficiency;
        match comparison {
            ProficiencyComparison::Equal | ProficiencyComparison::Higher => {
                credit.meets_requirement
            }
            ProficiencyComparison::Lower { levels: 1 } => credit.one_level_below,
            ProficiencyComparison::Lower { .. } | ProficiencyComparison::Unranked => 0.0,
        }
    }
}
