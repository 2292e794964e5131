use std::collections::HashMap;
use std::num::{IntErrorKind, ParseIntError};
use thiserror::Error;

pub const RANKINGS_HEADER: &str = "RANKINGS:";
pub const EXPLANATIONS_HEADER: &str = "EXPLANATIONS:";
pub const SUMMARY_HEADER: &str = "SUMMARY:";

/// The three sections of a well-formed ranking completion.
#[derive(Debug, Clone, PartialEq)]
pub struct RankingCompletion {
    /// `(article number, score)` in first-seen order; a repeated number keeps
    /// its first position and takes the later score.
    pub rankings: Vec<(i64, f64)>,
    pub explanations: HashMap<i64, String>,
    pub summary: String,
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum MalformedResponse {
    #[error("missing {0} section")]
    MissingSection(&'static str),

    #[error("invalid ranking line '{line}': {reason}")]
    InvalidRanking { line: String, reason: String },

    #[error("invalid explanation line '{line}': {reason}")]
    InvalidExplanation { line: String, reason: String },
}

/// Parse the free-text completion returned for a ranking prompt.
///
/// Sections are blank-line separated blocks, each starting with its header.
/// Lines without a `:` are ignored inside RANKINGS and EXPLANATIONS; any other
/// deviation rejects the whole completion.
pub fn parse_completion(text: &str) -> Result<RankingCompletion, MalformedResponse> {
    let blocks: Vec<&str> = text.split("\n\n").collect();

    let rankings = parse_rankings(find_section(&blocks, RANKINGS_HEADER)?)?;
    let explanations = parse_explanations(find_section(&blocks, EXPLANATIONS_HEADER)?)?;
    let summary = find_section(&blocks, SUMMARY_HEADER)?
        .replace(SUMMARY_HEADER, "")
        .trim()
        .to_string();

    Ok(RankingCompletion {
        rankings,
        explanations,
        summary,
    })
}

fn find_section<'a>(blocks: &[&'a str], header: &'static str) -> Result<&'a str, MalformedResponse> {
    blocks
        .iter()
        .copied()
        .find(|block| block.starts_with(header))
        .ok_or(MalformedResponse::MissingSection(header))
}

fn body_lines(section: &str) -> impl Iterator<Item = &str> {
    section.split('\n').skip(1).filter(|line| line.contains(':'))
}

/// Integers too large for `i64` saturate so they are later dropped as out of range.
fn parse_article_number(text: &str) -> Result<i64, ParseIntError> {
    match text.trim().parse::<i64>() {
        Err(e) if *e.kind() == IntErrorKind::PosOverflow => Ok(i64::MAX),
        Err(e) if *e.kind() == IntErrorKind::NegOverflow => Ok(i64::MIN),
        other => other,
    }
}

fn parse_rankings(section: &str) -> Result<Vec<(i64, f64)>, MalformedResponse> {
    let mut rankings: Vec<(i64, f64)> = Vec::new();
    for line in body_lines(section) {
        let invalid = |reason: String| MalformedResponse::InvalidRanking {
            line: line.to_string(),
            reason,
        };

        // `<rank>: <article>, <score>`; only the field after the first ':' matters
        let fields = line.split(':').nth(1).unwrap_or_default();
        let parts: Vec<&str> = fields.split(',').collect();
        let [number, score] = parts.as_slice() else {
            return Err(invalid(format!("expected 2 comma-separated fields, got {}", parts.len())));
        };
        let number = parse_article_number(number)
            .map_err(|e| invalid(format!("article number: {}", e)))?;
        let score: f64 = score
            .trim()
            .parse()
            .map_err(|e| invalid(format!("score: {}", e)))?;

        match rankings.iter_mut().find(|(n, _)| *n == number) {
            Some(existing) => existing.1 = score,
            None => rankings.push((number, score)),
        }
    }
    Ok(rankings)
}

fn parse_explanations(section: &str) -> Result<HashMap<i64, String>, MalformedResponse> {
    let mut explanations = HashMap::new();
    for line in body_lines(section) {
        let (number, explanation) = line.split_once(':').unwrap_or((line, ""));
        let number = parse_article_number(number).map_err(|e| MalformedResponse::InvalidExplanation {
            line: line.to_string(),
            reason: format!("article number: {}", e),
        })?;
        explanations.insert(number, explanation.trim().to_string());
    }
    Ok(explanations)
}
