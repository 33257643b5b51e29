use anyhow::{Context, Result};
use skill_ranker::profile::{load_candidates, load_requirements};
use skill_ranker::scoring::{
    build_classifier, dedupe_requirements, rank_all_concurrent, sorted_by_score, RankingReport,
    RelevanceClassifier, SkillScorer,
};
use skill_ranker::settings::settings;
use skill_ranker::utils::{
    init_tracing, log_candidates_loaded, log_classifier_ready, log_generic_error, log_init,
    log_newline, log_ranking, log_report_written, log_requirements_loaded,
};
use std::env;
use std::path::PathBuf;
use std::process;
use std::sync::Arc;

struct Args {
    requirements: PathBuf,
    candidates: PathBuf,
    llm: bool,
    output: Option<PathBuf>,
}

fn print_usage() {
    eprintln!("Usage: skill-ranker <requirements.json> <candidates.json> [--llm] [--output <path>]");
    eprintln!();
    eprintln!("Arguments:");
    eprintln!("  <requirements.json>  Job skill requirements");
    eprintln!("  <candidates.json>    Candidate profiles, as a list or keyed by name");
    eprintln!("  --llm                Judge relevance with the configured chat model");
    eprintln!("  --output, -o <path>  Write the ranking report as JSON");
}

fn parse_args() -> Option<Args> {
    let mut positional = Vec::new();
    let mut llm = false;
    let mut output = None;

    let mut args = env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--llm" => llm = true,
            "--output" | "-o" => output = Some(PathBuf::from(args.next()?)),
            "--help" | "-h" => return None,
            _ => positional.push(PathBuf::from(arg)),
        }
    }

    let [requirements, candidates]: [PathBuf; 2] = positional.try_into().ok()?;
    Some(Args {
        requirements,
        candidates,
        llm,
        output,
    })
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    init_tracing().context("failed to set tracing subscriber")?;

    let Some(args) = parse_args() else {
        print_usage();
        process::exit(1);
    };

    let config = settings();
    let workers: usize = env::var("RANK_WORKERS")
        .ok()
        .and_then(|w| w.parse().ok())
        .unwrap_or(config.classifier.workers);

    log_init(&config.classifier, workers);

    let loaded = load_requirements(&args.requirements)?;
    let loaded_count = loaded.len();
    let requirements = dedupe_requirements(loaded);
    log_requirements_loaded(&args.requirements, loaded_count, requirements.len());

    let candidates = load_candidates(&args.candidates)?;
    log_candidates_loaded(&args.candidates, candidates.len());

    let classifier = match build_classifier(&config.classifier, args.llm) {
        Ok(classifier) => classifier,
        Err(e) => {
            log_generic_error("[CLASSIFIER]", &e.to_string());
            process::exit(1);
        }
    };
    let classifier_name = classifier.name();
    log_classifier_ready(classifier_name, config.classifier.cache);
    log_newline();

    let scorer = Arc::new(SkillScorer::new(config.scoring.clone(), classifier));
    let requirements: Arc<[_]> = Arc::from(requirements);

    // The chat client blocks, so it must never be dropped inside async code.
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;
    let rankings = runtime.block_on(rank_all_concurrent(
        scorer.clone(),
        candidates,
        requirements.clone(),
        workers,
    ))?;

    log_ranking(&sorted_by_score(&rankings));

    if let Some(path) = &args.output {
        let report = RankingReport::new(classifier_name, &requirements, &rankings);
        let json = serde_json::to_string_pretty(&report)?;
        std::fs::write(path, json)
            .with_context(|| format!("failed to write report to {}", path.display()))?;
        log_report_written(path);
    }

    Ok(())
}
