//! Suggestion ranking.
//!
//! Orders similarity candidates best-first. Equal scores keep their input
//! order, so the same dataset always yields the same suggestion list.

use crate::similarity::SimilarityCandidate;

/// Attribute names, best suggestion first
pub type SuggestionList = Vec<String>;

/// Rank candidates into a suggestion list
pub fn rank(candidates: Vec<SimilarityCandidate>) -> SuggestionList {
    let mut candidates = candidates;
    sort_candidates(&mut candidates);
    candidates.into_iter().map(|c| c.name).collect()
}

/// Stable sort by descending score
pub fn sort_candidates(candidates: &mut [SimilarityCandidate]) {
    candidates.sort_by(|a, b| b.score.total_cmp(&a.score));
}
