use console::{measure_text_width, Style};
use std::path::Path;
use tracing::subscriber::set_global_default;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::profile::SkillRecord;
use crate::scoring::{CandidateScore, ProficiencyComparison, SkillScoreBreakdown};
use crate::settings::Classifier;

const BRANCH: char = '\u{251C}';
const LAST: char = '\u{2514}';
const RULE: char = '\u{2500}';
const PIPE: char = '\u{2502}';

/// Width of one tree level; values line up at `VALUE_COLUMN` at every depth.
const LEVEL_WIDTH: usize = 4;
const VALUE_COLUMN: usize = 25;

/// Installs the compact tracing subscriber used by both binaries.
/// Crate events log at info; other targets follow `RUST_LOG`.
pub fn init_tracing() -> anyhow::Result<()> {
    let subscriber = tracing_subscriber::registry()
        .with(EnvFilter::from_default_env().add_directive("skill_ranker=info".parse()?))
        .with(
            fmt::layer()
                .with_target(false)
                .with_thread_ids(false)
                .with_file(false)
                .with_line_number(false)
                .compact(),
        );
    set_global_default(subscriber)?;
    Ok(())
}

fn connector(glyph: char) -> String {
    dim().apply_to(format!("{glyph}{RULE}{RULE} ")).to_string()
}

fn tree_branch() -> String {
    connector(BRANCH)
}

fn tree_end() -> String {
    connector(LAST)
}

fn tree_glyph(is_last: bool) -> String {
    connector(if is_last { LAST } else { BRANCH })
}

/// Continuation prefix for children of a node.
fn child_indent(parent_is_last: bool) -> String {
    if parent_is_last {
        " ".repeat(LEVEL_WIDTH)
    } else {
        dim().apply_to(format!("{PIPE}   ")).to_string()
    }
}

fn dim() -> Style {
    Style::new().dim()
}

fn blue() -> Style {
    Style::new().blue()
}

fn magenta() -> Style {
    Style::new().magenta()
}

fn cyan() -> Style {
    Style::new().cyan()
}

fn green() -> Style {
    Style::new().green()
}

fn red() -> Style {
    Style::new().red()
}

fn yellow() -> Style {
    Style::new().yellow()
}

fn bold() -> Style {
    Style::new().bold()
}

fn init_prefix() -> String {
    blue().apply_to("[INIT]").to_string()
}

fn rank_prefix() -> String {
    magenta().apply_to("[RANK]").to_string()
}

fn classifier_prefix() -> String {
    yellow().apply_to("[CLASSIFIER]").to_string()
}

fn pad_label(label: &str, depth: usize) -> String {
    let width = VALUE_COLUMN.saturating_sub(depth * LEVEL_WIDTH);
    match width.checked_sub(measure_text_width(label)) {
        Some(pad) if pad > 0 => format!("{label}{}", " ".repeat(pad)),
        _ => format!("{label} "),
    }
}

fn format_points(value: f32) -> String {
    let sign = if value < 0.0 { '-' } else { '+' };
    format!("{}{:.2}", dim().apply_to(sign), value.abs())
}

fn score_style(normalized: f32) -> Style {
    if normalized >= 70.0 {
        green()
    } else if normalized >= 40.0 {
        yellow()
    } else {
        red()
    }
}

pub fn log_newline() {
    println!();
}

pub fn log_header(title: &str) {
    println!("{}", bold().apply_to(title.to_uppercase()));
}

pub fn log_generic_error(prefix: &str, message: &str) {
    eprintln!("{} {}", red().apply_to(prefix), message);
}

pub fn log_init(classifier: &Classifier, workers: usize) {
    println!(
        "{} classifier backend is {}.",
        init_prefix(),
        cyan().apply_to(classifier.backend)
    );
    println!(
        "{} scoring with up to {} worker(s).",
        init_prefix(),
        bold().apply_to(workers)
    );
}

pub fn log_requirements_loaded(path: &Path, loaded: usize, unique: usize) {
    println!(
        "{} loaded {} requirements from {}",
        init_prefix(),
        bold().apply_to(loaded),
        dim().apply_to(path.display())
    );
    if unique < loaded {
        println!(
            "{}merged {} duplicate skill(s), {} remain",
            tree_end(),
            bold().apply_to(loaded - unique),
            bold().apply_to(unique)
        );
    }
}

pub fn log_candidates_loaded(path: &Path, count: usize) {
    println!(
        "{} loaded {} candidates from {}",
        init_prefix(),
        bold().apply_to(count),
        dim().apply_to(path.display())
    );
}

pub fn log_classifier_ready(name: &str, cached: bool) {
    let cache = if cached {
        green().apply_to("cached")
    } else {
        dim().apply_to("uncached")
    };
    println!(
        "{} {} ready ({})",
        classifier_prefix(),
        cyan().apply_to(name),
        cache
    );
}

pub fn log_requirements(requirements: &[SkillRecord], default_importance: i64) {
    log_header("Requirements");
    if requirements.is_empty() {
        println!("{}{}", tree_end(), dim().apply_to("none"));
        return;
    }

    let count = requirements.len();
    for (i, requirement) in requirements.iter().enumerate() {
        let importance = match requirement.importance {
            Some(importance) => importance.to_string(),
            None => format!("{default_importance} (default)"),
        };
        println!(
            "{}{} {} {}",
            tree_glyph(i == count - 1),
            pad_label(&requirement.name, 1),
            cyan().apply_to(&requirement.proficiency_level),
            dim().apply_to(format!("importance {importance}"))
        );
    }
}

pub fn log_ranking(ranked: &[&CandidateScore]) {
    println!("{} done.", rank_prefix());
    if ranked.is_empty() {
        println!("{}{}", tree_end(), dim().apply_to("no candidates"));
        return;
    }

    let count = ranked.len();
    for (i, score) in ranked.iter().enumerate() {
        let failures = match score.classifier_failures() {
            0 => String::new(),
            n => format!(" {}", red().apply_to(format!("({n} classifier failures)"))),
        };
        println!(
            "{}{} {} {}{}",
            tree_glyph(i == count - 1),
            pad_label(&score.candidate, 1),
            score_style(score.normalized).apply_to(format!("{:>6.2}%", score.normalized)),
            dim().apply_to(format!(
                "{}/{} skills",
                score.matched_count(),
                score.requirements.len()
            )),
            failures
        );
    }
}

pub fn log_report_written(path: &Path) {
    println!(
        "{} report written to {}",
        rank_prefix(),
        cyan().apply_to(path.display())
    );
}

fn format_proficiency(breakdown: &SkillScoreBreakdown) -> String {
    let relation = match breakdown.proficiency {
        ProficiencyComparison::Equal => "meets".to_string(),
        ProficiencyComparison::Higher => "exceeds".to_string(),
        ProficiencyComparison::Lower { levels } => format!("{levels} below"),
        ProficiencyComparison::Unranked => "unranked".to_string(),
    };
    format!(
        "{} vs {} ({})",
        breakdown.candidate_level, breakdown.required_level, relation
    )
}

fn format_relevance(breakdown: &SkillScoreBreakdown) -> String {
    match &breakdown.relevance {
        Ok(relevance) => format!("{}", green().apply_to(relevance)),
        Err(e) => format!("{} ({})", red().apply_to("failed"), dim().apply_to(e)),
    }
}

fn skill_lines(breakdown: &SkillScoreBreakdown, indent: &str) -> Vec<String> {
    vec![
        format!(
            "{}{}{} {}",
            indent,
            tree_branch(),
            pad_label("relevance", 2),
            format_relevance(breakdown)
        ),
        format!(
            "{}{}{} {}",
            indent,
            tree_branch(),
            pad_label("proficiency", 2),
            dim().apply_to(format_proficiency(breakdown))
        ),
        format!(
            "{}{}{} {}",
            indent,
            tree_branch(),
            pad_label("importance", 2),
            dim().apply_to(breakdown.importance)
        ),
        format!(
            "{}{}{}{} {}",
            indent,
            tree_end(),
            pad_label("score", 2),
            format_points(breakdown.score),
            dim().apply_to(format!(
                "(relevance {:.1}, proficiency {:.1}, importance {:+.2})",
                breakdown.relevance_points, breakdown.proficiency_points, breakdown.importance_term
            ))
        ),
    ]
}

pub fn log_candidate_breakdown(score: &CandidateScore) {
    let mut lines: Vec<String> = Vec::new();

    lines.push(format!(
        "{} {}",
        magenta().apply_to(bold().apply_to("[CANDIDATE]")),
        bold().apply_to(&score.candidate)
    ));

    lines.push(String::new());
    lines.push(format!("{}", bold().apply_to("SKILLS")));

    if score.requirements.is_empty() {
        lines.push(format!("{}{}", tree_end(), dim().apply_to("no requirements")));
    }

    let count = score.requirements.len();
    for (i, requirement) in score.requirements.iter().enumerate() {
        let is_last = i == count - 1;
        match &requirement.matched {
            Some(breakdown) => {
                lines.push(format!("{}{}", tree_glyph(is_last), requirement.requirement));
                let indent = child_indent(is_last);
                lines.extend(skill_lines(breakdown, &indent));
            }
            None => lines.push(format!(
                "{}{} {}",
                tree_glyph(is_last),
                pad_label(&requirement.requirement, 1),
                dim().apply_to("not listed (+0.00)")
            )),
        }
    }

    lines.push(String::new());
    lines.push(format!("{}", bold().apply_to("RESULT")));
    lines.push(format!(
        "{}{} {:.2}",
        tree_branch(),
        pad_label("total", 1),
        score.total
    ));
    lines.push(format!(
        "{}{} {:.2}",
        tree_branch(),
        pad_label("max possible", 1),
        score.max_possible
    ));
    lines.push(format!(
        "{}{} {}",
        tree_end(),
        pad_label("score", 1),
        score_style(score.normalized).apply_to(format!("{:.2}%", score.normalized))
    ));

    println!("{}\n", lines.join("\n"));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pad_label_aligns_values() {
        assert_eq!(measure_text_width(&pad_label("score", 1)), VALUE_COLUMN - LEVEL_WIDTH);
        assert_eq!(measure_text_width(&pad_label("score", 2)), VALUE_COLUMN - 2 * LEVEL_WIDTH);
    }

    #[test]
    fn test_pad_label_long_label() {
        let label = "a".repeat(40);
        assert_eq!(pad_label(&label, 1), format!("{label} "));
    }

    #[test]
    fn test_format_points() {
        console::set_colors_enabled(false);
        assert_eq!(format_points(1.234), "+1.23");
        assert_eq!(format_points(-0.5), "-0.50");
        assert_eq!(format_points(0.0), "+0.00");
    }

    #[test]
    fn test_child_indent_matches_level_width() {
        assert_eq!(measure_text_width(&child_indent(true)), LEVEL_WIDTH);
        assert_eq!(measure_text_width(&child_indent(false)), LEVEL_WIDTH);
        assert_eq!(measure_text_width(&tree_glyph(false)), LEVEL_WIDTH);
    }
}
