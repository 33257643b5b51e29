use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;

use super::candidate::{score_candidate, CandidateScore};
use super::classification::RelevanceClassifier;
use super::skill::SkillScorer;
use crate::profile::{CandidateProfile, SkillRecord};

/// Candidate name to score. Iteration order carries no meaning.
pub type Rankings = HashMap<String, CandidateScore>;

fn insert_score(rankings: &mut Rankings, score: CandidateScore) {
    if let Some(previous) = rankings.insert(score.candidate.clone(), score) {
        tracing::warn!(
            candidate = %previous.candidate,
            "duplicate candidate name, keeping the later profile"
        );
    }
}

pub fn rank_all<C: RelevanceClassifier>(
    scorer: &SkillScorer<C>,
    candidates: &[CandidateProfile],
    requirements: &[SkillRecord],
) -> Rankings {
    let mut rankings = Rankings::with_capacity(candidates.len());
    for candidate in candidates {
        insert_score(&mut rankings, score_candidate(scorer, candidate, requirements));
    }
    rankings
}

/// Scores candidates on the blocking pool with at most `workers` in flight,
/// which bounds concurrent classifier calls to the same number.
///
/// When names repeat, which profile ends up in the map depends on completion
/// order; callers should pass unique names.
pub async fn rank_all_concurrent<C>(
    scorer: Arc<SkillScorer<C>>,
    candidates: Vec<CandidateProfile>,
    requirements: Arc<[SkillRecord]>,
    workers: usize,
) -> Result<Rankings>
where
    C: RelevanceClassifier + 'static,
{
    let permits = Arc::new(Semaphore::new(workers.max(1)));
    let mut tasks = JoinSet::new();
    let mut rankings = Rankings::with_capacity(candidates.len());

    for candidate in candidates {
        let permit = permits.clone().acquire_owned().await?;
        let scorer = scorer.clone();
        let requirements = requirements.clone();
        tasks.spawn_blocking(move || {
            let _permit = permit;
            score_candidate(&*scorer, &candidate, &requirements)
        });
    }

    while let Some(joined) = tasks.join_next().await {
        insert_score(&mut rankings, joined?);
    }

    Ok(rankings)
}

/// Highest score first; equal scores fall back to candidate name.
pub fn sorted_by_score(rankings: &Rankings) -> Vec<&CandidateScore> {
    let mut sorted: Vec<_> = rankings.values().collect();
    sorted.sort_by(|a, b| match b.normalized.partial_cmp(&a.normalized) {
        Some(Ordering::Equal) | None => a.candidate.cmp(&b.candidate),
        Some(other) => other,
    });
    sorted
}

#[derive(Debug, Clone, Serialize)]
pub struct RankingReport<'a> {
    pub generated_at: DateTime<Utc>,
    pub classifier: &'a str,
    pub requirements: &'a [SkillRecord],
    pub candidates: Vec<&'a CandidateScore>,
}

impl<'a> RankingReport<'a> {
    pub fn new(classifier: &'a str, requirements: &'a [SkillRecord], rankings: &'a Rankings) -> Self {
        Self {
            generated_at: Utc::now(),
            classifier,
            requirements,
            candidates: sorted_by_score(rankings),
        }
    }
}
