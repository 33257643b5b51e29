use skill_ranker::profile::{load_candidates, load_requirements};
use skill_ranker::scoring::{
    build_classifier, dedupe_requirements, score_candidate, RelevanceClassifier, SkillScorer,
};
use skill_ranker::settings::settings;
use skill_ranker::utils::{
    init_tracing, log_candidate_breakdown, log_classifier_ready, log_generic_error, log_newline,
    log_requirements,
};
use std::env;
use std::process;

fn print_usage() {
    eprintln!("Usage: score-candidate <requirements.json> <candidates.json> [name] [--llm]");
    eprintln!();
    eprintln!("Arguments:");
    eprintln!("  <requirements.json>  Job skill requirements");
    eprintln!("  <candidates.json>    Candidate profiles, as a list or keyed by name");
    eprintln!("  [name]               Only score the candidate with this name");
    eprintln!("  --llm                Judge relevance with the configured chat model");
}

fn fail(prefix: &str, message: &str) -> ! {
    log_generic_error(prefix, message);
    process::exit(1);
}

fn main() {
    dotenvy::dotenv().ok();
    if let Err(e) = init_tracing() {
        fail("[ERROR]", &format!("failed to set tracing subscriber: {e}"));
    }

    let args: Vec<String> = env::args().collect();
    let use_llm = args.iter().any(|a| a == "--llm");

    let positional: Vec<&String> = args.iter().skip(1).filter(|a| *a != "--llm").collect();
    if positional.len() < 2 || positional.len() > 3 {
        print_usage();
        process::exit(1);
    }

    let requirements = match load_requirements(positional[0]) {
        Ok(requirements) => dedupe_requirements(requirements),
        Err(e) => fail("[ERROR]", &e.to_string()),
    };
    let candidates = match load_candidates(positional[1]) {
        Ok(candidates) => candidates,
        Err(e) => fail("[ERROR]", &e.to_string()),
    };

    let selected: Vec<_> = match positional.get(2) {
        Some(name) => candidates
            .iter()
            .filter(|c| c.name == name.as_str())
            .collect(),
        None => candidates.iter().collect(),
    };
    if selected.is_empty() {
        fail("[ERROR]", "no matching candidate");
    }

    let config = settings();
    let classifier = match build_classifier(&config.classifier, use_llm) {
        Ok(classifier) => classifier,
        Err(e) => fail("[CLASSIFIER]", &e.to_string()),
    };
    log_classifier_ready(classifier.name(), config.classifier.cache);
    log_newline();

    log_requirements(&requirements, config.scoring.importance.default);
    log_newline();

    let scorer = SkillScorer::new(config.scoring.clone(), classifier);
    for candidate in selected {
        log_candidate_breakdown(&score_candidate(&scorer, candidate, &requirements));
    }
}
