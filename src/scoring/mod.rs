pub mod candidate;
mod classification;
pub mod dedup;
mod llm;
pub mod proficiency;
pub mod ranking;
pub mod skill;

pub use candidate::{score_candidate, CandidateScore, RequirementScore};
pub use classification::{
    build_classifier, parse_relevance, CachedClassifier, ClassifierError, ExactNameClassifier,
    Relevance, RelevanceClassifier, RelevanceOutcome,
};
pub use dedup::dedupe_requirements;
pub use llm::{relevance_prompt, LlmClassifier};
pub use proficiency::{compare, rank, ProficiencyComparison, ProficiencyLevel};
pub use ranking::{rank_all, rank_all_concurrent, sorted_by_score, RankingReport, Rankings};
pub use skill::{SkillScoreBreakdown, SkillScorer};


#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::{CandidateProfile, SkillRecord};
    use crate::settings::Scoring;

    #[test]
    fn test_dedupe_then_rank_pipeline() {
        let requirements = dedupe_requirements(vec![
            SkillRecord::new("Python", "Intermediate").with_importance(1),
            SkillRecord::new("SQL", "Intermediate").with_importance(3),
            SkillRecord::new("Python", "Advanced").with_importance(4),
        ]);
        let candidates = vec![
            CandidateProfile::new(
                "A",
                vec![
                    SkillRecord::new("Python", "Advanced"),
                    SkillRecord::new("SQL", "Advanced"),
                ],
            ),
            CandidateProfile::new("B", vec![SkillRecord::new("Python", "Basic")]),
        ];

        let scorer = SkillScorer::new(Scoring::default(), CachedClassifier::new(ExactNameClassifier));
        let rankings = rank_all(&scorer, &candidates, &requirements);

        // Python kept at Advanced with importance 4: 0.6 + 0.2 + 0.8.
        assert!((rankings["A"].requirements[0].score() - 1.6).abs() < 1e-4);
        assert!((rankings["A"].normalized - 100.0).abs() < 1e-3);
        assert!(rankings["B"].normalized < rankings["A"].normalized);
        assert_eq!(scorer.classifier().cached_pairs(), 2);
    }

    #[test]
    fn test_partial_classifier_lowers_score() {
        let requirements = vec![SkillRecord::new("SQL", "Basic").with_importance(3)];
        let candidate = CandidateProfile::new("A", vec![SkillRecord::new("SQL", "Basic")]);

        let full = score_candidate(
            &SkillScorer::new(Scoring::default(), test_support::FixedClassifier::full()),
            &candidate,
            &requirements,
        );
        let partial = score_candidate(
            &SkillScorer::new(
                Scoring::default(),
                test_support::FixedClassifier::new(Ok(Relevance::PartialMatch)),
            ),
            &candidate,
            &requirements,
        );

        assert!(partial.normalized < full.normalized);
    }
}
