use super::classification::{
    parse_relevance, ClassifierError, RelevanceClassifier, RelevanceOutcome,
};
use crate::settings::Classifier;
use crate::utils::llm::CompletionClient;

pub fn relevance_prompt(candidate_skill: &str, required_skill: &str) -> String {
    format!(
        "Evaluate the relevance of the candidate's skill to the job description skill.

Candidate Skill: {candidate_skill}
Job Description Skill: {required_skill}

Please respond with one of the following and nothing else:
- \"Full Match\" if the skills are the same or nearly identical.
- \"Partial Match\" if there is some relevance between the skills.
- \"No Match\" if the skills are not relevant."
    )
}

/// Relevance judged by a chat-completion model.
pub struct LlmClassifier {
    client: CompletionClient,
}

impl LlmClassifier {
    pub fn new(client: CompletionClient) -> Self {
        Self { client }
    }

    pub fn from_settings(settings: &Classifier) -> Result<Self, ClassifierError> {
        Ok(Self::new(CompletionClient::from_settings(settings)?))
    }

    pub fn model(&self) -> &str {
        self.client.model()
    }
}

impl RelevanceClassifier for LlmClassifier {
    fn classify(&self, candidate_skill: &str, required_skill: &str) -> RelevanceOutcome {
        let reply = self
            .client
            .complete(&relevance_prompt(candidate_skill, required_skill))?;
        parse_relevance(&reply)
    }

    fn name(&self) -> &'static str {
        "llm"
    }
}
