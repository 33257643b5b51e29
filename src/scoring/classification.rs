use regex::Regex;
use serde::Serialize;
use std::collections::HashMap;
use std::str::FromStr;
use std::sync::{Arc, LazyLock, Mutex};
use strum::{Display, EnumIter, EnumString, IntoStaticStr};
use thiserror::Error;

use super::llm::LlmClassifier;
use crate::settings::{Classifier, ClassifierBackend, RelevancePoints};

static REPLY_TRIM: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"^[\s"'`*]+|[\s"'`*.!]+$"#).unwrap());

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter, EnumString, IntoStaticStr, Serialize,
)]
pub enum Relevance {
    #[strum(serialize = "Full Match")]
    #[serde(rename = "Full Match")]
    FullMatch,
    #[strum(serialize = "Partial Match")]
    #[serde(rename = "Partial Match")]
    PartialMatch,
    #[strum(serialize = "No Match")]
    #[serde(rename = "No Match")]
    NoMatch,
}

impl Relevance {
    pub fn points(self, points: &RelevancePoints) -> f32 {
        match self {
            Self::FullMatch => points.full_match,
            Self::PartialMatch => points.partial_match,
            Self::NoMatch => points.no_match,
        }
    }
}

/// The classifier could not produce one of the three relevance tiers.
#[derive(Debug, Clone, PartialEq, Error, Serialize)]
pub enum ClassifierError {
    #[error("classifier timed out")]
    Timeout,
    #[error("classifier transport error: {0}")]
    Transport(String),
    #[error("classifier returned status {0}")]
    Status(u16),
    #[error("unrecognised classifier reply: {0:?}")]
    Malformed(String),
    #[error("missing API key in ${0}")]
    MissingApiKey(String),
}

pub type RelevanceOutcome = Result<Relevance, ClassifierError>;

/// Judges how closely a candidate skill covers a required skill.
///
/// Implementations must report failures as `Err` rather than picking a tier;
/// the scorer decides how a failure counts.
pub trait RelevanceClassifier: Send + Sync {
    fn classify(&self, candidate_skill: &str, required_skill: &str) -> RelevanceOutcome;

    fn name(&self) -> &'static str;
}

impl<T: RelevanceClassifier + ?Sized> RelevanceClassifier for &T {
    fn classify(&self, candidate_skill: &str, required_skill: &str) -> RelevanceOutcome {
        (**self).classify(candidate_skill, required_skill)
    }

    fn name(&self) -> &'static str {
        (**self).name()
    }
}

impl<T: RelevanceClassifier + ?Sized> RelevanceClassifier for Box<T> {
    fn classify(&self, candidate_skill: &str, required_skill: &str) -> RelevanceOutcome {
        (**self).classify(candidate_skill, required_skill)
    }

    fn name(&self) -> &'static str {
        (**self).name()
    }
}

impl<T: RelevanceClassifier + ?Sized> RelevanceClassifier for Arc<T> {
    fn classify(&self, candidate_skill: &str, required_skill: &str) -> RelevanceOutcome {
        (**self).classify(candidate_skill, required_skill)
    }

    fn name(&self) -> &'static str {
        (**self).name()
    }
}

/// Parses a free-text classifier reply into a tier. Only the three exact
/// labels are accepted once surrounding quotes and punctuation are trimmed.
pub fn parse_relevance(reply: &str) -> RelevanceOutcome {
    let label = REPLY_TRIM.replace_all(reply, "");
    Relevance::from_str(&label).map_err(|_| ClassifierError::Malformed(reply.trim().to_string()))
}

/// Offline classifier: identical names are a full match, names equal up to
/// ASCII case are partial, anything else is no match.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExactNameClassifier;

impl RelevanceClassifier for ExactNameClassifier {
    fn classify(&self, candidate_skill: &str, required_skill: &str) -> RelevanceOutcome {
        if candidate_skill == required_skill {
            Ok(Relevance::FullMatch)
        } else if candidate_skill.eq_ignore_ascii_case(required_skill) {
            Ok(Relevance::PartialMatch)
        } else {
            Ok(Relevance::NoMatch)
        }
    }

    fn name(&self) -> &'static str {
        "exact-name"
    }
}

/// Memoises successful classifications per `(candidate, required)` name pair.
/// Failures are passed through and retried on the next call.
pub struct CachedClassifier<C> {
    inner: C,
    cache: Mutex<HashMap<(String, String), Relevance>>,
}

impl<C: RelevanceClassifier> CachedClassifier<C> {
    pub fn new(inner: C) -> Self {
        Self {
            inner,
            cache: Mutex::new(HashMap::new()),
        }
    }

    pub fn cached_pairs(&self) -> usize {
        self.cache.lock().map(|cache| cache.len()).unwrap_or(0)
    }

    fn lookup(&self, key: &(String, String)) -> Option<Relevance> {
        self.cache.lock().ok()?.get(key).copied()
    }
}

impl<C: RelevanceClassifier> RelevanceClassifier for CachedClassifier<C> {
    fn classify(&self, candidate_skill: &str, required_skill: &str) -> RelevanceOutcome {
        let key = (candidate_skill.to_string(), required_skill.to_string());
        if let Some(relevance) = self.lookup(&key) {
            tracing::debug!(candidate_skill, required_skill, %relevance, "relevance cache hit");
            return Ok(relevance);
        }

        let relevance = self.inner.classify(candidate_skill, required_skill)?;
        if let Ok(mut cache) = self.cache.lock() {
            cache.insert(key, relevance);
        }
        Ok(relevance)
    }

    fn name(&self) -> &'static str {
        self.inner.name()
    }
}

/// Builds the configured backend, or the chat model when `force_llm` is set,
/// wrapped in a [`CachedClassifier`] when caching is enabled.
pub fn build_classifier(
    config: &Classifier,
    force_llm: bool,
) -> Result<Box<dyn RelevanceClassifier>, ClassifierError> {
    let backend = if force_llm {
        ClassifierBackend::Llm
    } else {
        config.backend
    };

    let classifier: Box<dyn RelevanceClassifier> = match backend {
        ClassifierBackend::Exact => Box::new(ExactNameClassifier),
        ClassifierBackend::Llm => {
            let classifier = LlmClassifier::from_settings(config)?;
            tracing::info!(model = classifier.model(), "using chat model for relevance");
            Box::new(classifier)
        }
    };

    Ok(if config.cache {
        Box::new(CachedClassifier::new(classifier))
    } else {
        classifier
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use strum::IntoEnumIterator;

    struct CountingClassifier {
        calls: AtomicUsize,
        outcome: RelevanceOutcome,
    }

    impl CountingClassifier {
        fn new(outcome: RelevanceOutcome) -> Self {
            Self {
                calls: AtomicUsize::new(0),
                outcome,
            }
        }
    }

    impl RelevanceClassifier for CountingClassifier {
        fn classify(&self, _: &str, _: &str) -> RelevanceOutcome {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.outcome.clone()
        }

        fn name(&self) -> &'static str {
            "counting"
        }
    }

    #[test]
    fn test_relevance_points() {
        let points = RelevancePoints {
            full_match: 1.0,
            partial_match: 0.5,
            no_match: 0.0,
        };
        assert_eq!(Relevance::FullMatch.points(&points), 1.0);
        assert_eq!(Relevance::PartialMatch.points(&points), 0.5);
        assert_eq!(Relevance::NoMatch.points(&points), 0.0);
    }

    #[test]
    fn test_parse_exact_labels() {
        for relevance in Relevance::iter() {
            assert_eq!(parse_relevance(&relevance.to_string()), Ok(relevance));
        }
    }

    #[test]
    fn test_parse_trims_quotes_and_punctuation() {
        assert_eq!(parse_relevance("  \"Full Match\".\n"), Ok(Relevance::FullMatch));
        assert_eq!(parse_relevance("**Partial Match**"), Ok(Relevance::PartialMatch));
        assert_eq!(parse_relevance("'No Match'"), Ok(Relevance::NoMatch));
    }

    #[test]
    fn test_parse_rejects_anything_else() {
        assert!(matches!(
            parse_relevance("full match"),
            Err(ClassifierError::Malformed(_))
        ));
        assert!(matches!(
            parse_relevance("It is a Full Match because both are SQL"),
            Err(ClassifierError::Malformed(_))
        ));
        assert!(matches!(parse_relevance(""), Err(ClassifierError::Malformed(_))));
    }

    #[test]
    fn test_exact_name_classifier() {
        let classifier = ExactNameClassifier;
        assert_eq!(classifier.classify("SQL", "SQL"), Ok(Relevance::FullMatch));
        assert_eq!(classifier.classify("sql", "SQL"), Ok(Relevance::PartialMatch));
        assert_eq!(classifier.classify("Python", "SQL"), Ok(Relevance::NoMatch));
    }

    fn config_without_key(backend: ClassifierBackend) -> Classifier {
        Classifier {
            backend,
            api_key_env: "SKILL_RANKER_TEST_UNSET_KEY".to_string(),
            ..Classifier::default()
        }
    }

    #[test]
    fn test_build_exact_backend() {
        for cache in [true, false] {
            let config = Classifier {
                cache,
                ..config_without_key(ClassifierBackend::Exact)
            };
            let Ok(classifier) = build_classifier(&config, false) else {
                panic!("exact backend needs no credentials");
            };
            assert_eq!(classifier.name(), "exact-name");
            assert_eq!(classifier.classify("SQL", "SQL"), Ok(Relevance::FullMatch));
        }
    }

    #[test]
    fn test_build_honours_configured_llm_backend() {
        let config = config_without_key(ClassifierBackend::Llm);
        assert!(matches!(
            build_classifier(&config, false),
            Err(ClassifierError::MissingApiKey(_))
        ));
    }

    #[test]
    fn test_build_force_llm_overrides_backend() {
        let config = config_without_key(ClassifierBackend::Exact);
        assert!(matches!(
            build_classifier(&config, true),
            Err(ClassifierError::MissingApiKey(_))
        ));
    }

    #[test]
    fn test_cache_reuses_identical_pairs() {
        let cached = CachedClassifier::new(CountingClassifier::new(Ok(Relevance::PartialMatch)));

        assert_eq!(cached.classify("SQL", "SQL"), Ok(Relevance::PartialMatch));
        assert_eq!(cached.classify("SQL", "SQL"), Ok(Relevance::PartialMatch));
        assert_eq!(cached.inner.calls.load(Ordering::SeqCst), 1);

        cached.classify("Python", "SQL").unwrap();
        assert_eq!(cached.inner.calls.load(Ordering::SeqCst), 2);
        assert_eq!(cached.cached_pairs(), 2);
    }

    #[test]
    fn test_cache_key_is_ordered() {
        let cached = CachedClassifier::new(CountingClassifier::new(Ok(Relevance::FullMatch)));
        cached.classify("A", "B").unwrap();
        cached.classify("B", "A").unwrap();
        assert_eq!(cached.inner.calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_cache_skips_failures() {
        let cached = CachedClassifier::new(CountingClassifier::new(Err(ClassifierError::Timeout)));

        assert_eq!(cached.classify("SQL", "SQL"), Err(ClassifierError::Timeout));
        assert_eq!(cached.classify("SQL", "SQL"), Err(ClassifierError::Timeout));
        assert_eq!(cached.inner.calls.load(Ordering::SeqCst), 2);
        assert_eq!(cached.cached_pairs(), 0);
    }

    #[test]
    fn test_boxed_classifier_delegates() {
        let boxed: Box<dyn RelevanceClassifier> = Box::new(ExactNameClassifier);
        assert_eq!(boxed.name(), "exact-name");
        assert_eq!(boxed.classify("Go", "Go"), Ok(Relevance::FullMatch));
    }
}
