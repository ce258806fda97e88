//! Fuzzy matching over known attribute names.
//!
//! Candidates are retrieved by n-gram cosine similarity and then, by default,
//! rescored with normalized Levenshtein similarity:
//!
//! ```text
//! query ──▶ lowercase ──▶ "-query-" grams (size upper..=lower)
//!                              │  first size with any hit wins
//!                              v
//!                  cosine over gram counts  ──▶ levenshtein rescore
//!                              │
//!                              v
//!                  drop score < min_score, sort best-first (stable)
//! ```
//!
//! Only an exact (case-sensitive) match scores 1.0; a name equal to the
//! query up to case is capped at [`CASE_ONLY_SCORE`]. Names sharing no gram
//! with the query are never candidates.

use crate::ranker::sort_candidates;
use serde::Serialize;
use std::collections::HashMap;

/// Ceiling for every non-exact match, so the exact name always ranks first
pub const CASE_ONLY_SCORE: f64 = 0.999;

/// Tuning knobs for the similarity index
#[derive(Debug, Clone, PartialEq)]
pub struct SimilarityConfig {
    pub gram_size_lower: usize,
    pub gram_size_upper: usize,
    /// Rescore cosine hits with normalized Levenshtein similarity
    pub use_levenshtein: bool,
    /// Candidates below this score are dropped
    pub min_score: f64,
}

impl Default for SimilarityConfig {
    fn default() -> Self {
        Self {
            gram_size_lower: 2,
            gram_size_upper: 3,
            use_levenshtein: true,
            min_score: 0.33,
        }
    }
}

/// A known attribute name and its similarity to the query, in `[0, 1]`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimilarityCandidate {
    pub name: String,
    pub score: f64,
}

/// Precomputed n-gram index over attribute names
#[derive(Debug, Clone)]
pub struct SimilarityIndex {
    names: Vec<String>,
    normalized: Vec<String>,
    /// One layer per gram size, smallest first
    layers: Vec<GramLayer>,
    config: SimilarityConfig,
}

#[derive(Debug, Clone)]
struct GramLayer {
    size: usize,
    /// gram → (name slot, occurrences)
    postings: HashMap<String, Vec<(usize, usize)>>,
    /// Euclidean norm of each name's gram vector
    norms: Vec<f64>,
}

impl SimilarityIndex {
    /// Build the index over `names`, keeping their order for tie-breaks
    pub fn build<I, S>(names: I, config: SimilarityConfig) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut config = config;
        config.gram_size_lower = config.gram_size_lower.max(1);
        config.gram_size_upper = config.gram_size_upper.max(config.gram_size_lower);

        let names: Vec<String> = names.into_iter().map(Into::into).collect();
        let normalized: Vec<String> = names.iter().map(|n| normalize(n)).collect();

        let layers = (config.gram_size_lower..=config.gram_size_upper)
            .map(|size| GramLayer::build(size, &normalized))
            .collect();

        tracing::debug!(
            names = names.len(),
            gram_sizes = ?(config.gram_size_lower..=config.gram_size_upper),
            "built similarity index"
        );

        SimilarityIndex { names, normalized, layers, config }
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn config(&self) -> &SimilarityConfig {
        &self.config
    }

    /// Candidates similar to `input`, best-first.
    ///
    /// Empty (or blank) input has no candidates.
    pub fn query(&self, input: &str) -> Vec<SimilarityCandidate> {
        if input.trim().is_empty() {
            return Vec::new();
        }

        let query = normalize(input);
        for layer in self.layers.iter().rev() {
            let mut candidates = self.query_layer(layer, input.trim(), &query);
            if !candidates.is_empty() {
                sort_candidates(&mut candidates);
                return candidates;
            }
        }

        Vec::new()
    }

    fn query_layer(&self, layer: &GramLayer, raw: &str, query: &str) -> Vec<SimilarityCandidate> {
        let grams = gram_counts(query, layer.size);
        let query_norm = norm(&grams);

        let mut dots: HashMap<usize, usize> = HashMap::new();
        for (gram, count) in &grams {
            if let Some(postings) = layer.postings.get(gram) {
                for &(slot, occurrences) in postings {
                    *dots.entry(slot).or_insert(0) += count * occurrences;
                }
            }
        }

        // Index order, so equal scores keep dataset order after the stable sort
        let mut hits: Vec<(usize, usize)> = dots.into_iter().collect();
        hits.sort_unstable_by_key(|&(slot, _)| slot);

        hits.into_iter()
            .filter_map(|(slot, dot)| {
                let cosine = dot as f64 / (query_norm * layer.norms[slot]);
                let score = if self.config.use_levenshtein {
                    strsim::normalized_levenshtein(query, &self.normalized[slot])
                } else {
                    cosine
                };
                let score = if self.names[slot] == raw {
                    1.0
                } else {
                    score.clamp(0.0, CASE_ONLY_SCORE)
                };

                (score >= self.config.min_score).then(|| SimilarityCandidate {
                    name: self.names[slot].clone(),
                    score,
                })
            })
            .collect()
    }
}

impl GramLayer {
    fn build(size: usize, normalized: &[String]) -> Self {
        let mut postings: HashMap<String, Vec<(usize, usize)>> = HashMap::new();
        let mut norms = Vec::with_capacity(normalized.len());

        for (slot, name) in normalized.iter().enumerate() {
            let grams = gram_counts(name, size);
            norms.push(norm(&grams));
            for (gram, count) in grams {
                postings.entry(gram).or_default().push((slot, count));
            }
        }

        GramLayer { size, postings, norms }
    }
}

fn normalize(name: &str) -> String {
    name.trim().to_lowercase()
}

/// Count the `size`-grams of `-text-`, padding short inputs with `-`
fn gram_counts(text: &str, size: usize) -> HashMap<String, usize> {
    let mut chars: Vec<char> = std::iter::once('-')
        .chain(text.chars())
        .chain(std::iter::once('-'))
        .collect();
    while chars.len() < size {
        chars.push('-');
    }

    let mut counts = HashMap::new();
    for window in chars.windows(size) {
        *counts.entry(window.iter().collect::<String>()).or_insert(0) += 1;
    }
    counts
}

fn norm(grams: &HashMap<String, usize>) -> f64 {
    grams.values().map(|&c| (c * c) as f64).sum::<f64>().sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;

    const NAMES: &[&str] = &[
        "flex-wrap",
        "flex-direction",
        "border-radius",
        "transition",
        "transform",
        "user-select",
    ];

    fn index() -> SimilarityIndex {
        SimilarityIndex::build(NAMES.iter().copied(), SimilarityConfig::default())
    }

    #[test]
    fn test_empty_query() {
        let index = index();
        assert!(index.query("").is_empty());
        assert!(index.query("   ").is_empty());
    }

    #[test]
    fn test_exact_match_scores_max_and_ranks_first() {
        let index = index();
        for name in NAMES {
            let results = index.query(name);
            assert_eq!(results[0].name, *name, "Wrong top hit for {}", name);
            assert_eq!(results[0].score, 1.0);
        }
    }

    #[test]
    fn test_single_edits_score_high_but_below_max() {
        let index = index();
        for typo in ["flexx-wrap", "flex-wra", "flex-wrup"] {
            let results = index.query(typo);
            assert_eq!(results[0].name, "flex-wrap", "Wrong top hit for {}", typo);
            assert!(results[0].score > 0.8 && results[0].score < 1.0, "Score {} for {}", results[0].score, typo);
        }
    }

    #[test]
    fn test_dissimilar_input_has_no_candidates() {
        let index = index();
        assert!(index.query("qqqqqqqq").is_empty());
        assert!(index.query("zzz").is_empty());
    }

    #[test]
    fn test_results_are_best_first() {
        let index = index();
        let results = index.query("trans");
        assert!(!results.is_empty());
        for pair in results.windows(2) {
            assert!(pair[0].score >= pair[1].score);
        }
        assert!(results.iter().all(|c| c.score >= 0.33 && c.score <= 1.0));
    }

    #[test]
    fn test_query_is_case_insensitive() {
        let index = index();
        let results = index.query("FLEX-WRAP");
        assert_eq!(results[0].name, "flex-wrap");
        assert_eq!(results[0].score, CASE_ONLY_SCORE);
    }

    #[test]
    fn test_exact_case_outranks_case_only_match() {
        let index = SimilarityIndex::build(["Zoom", "zoom"], SimilarityConfig::default());

        let results = index.query("zoom");
        assert_eq!(results[0].name, "zoom");
        assert_eq!(results[0].score, 1.0);
        assert_eq!(results[1].name, "Zoom");
        assert!(results[1].score < 1.0);

        let results = index.query("Zoom");
        assert_eq!(results[0].name, "Zoom");
        assert_eq!(results[1].name, "zoom");
    }

    #[test]
    fn test_cosine_only_scoring() {
        let config = SimilarityConfig { use_levenshtein: false, ..SimilarityConfig::default() };
        let index = SimilarityIndex::build(NAMES.iter().copied(), config);

        let exact = index.query("transform");
        assert_eq!(exact[0].name, "transform");
        assert!((exact[0].score - 1.0).abs() < 1e-9);

        let typo = index.query("transfrom");
        assert_eq!(typo[0].name, "transform");
        assert!(typo[0].score < 1.0);
    }

    #[test]
    fn test_falls_back_to_smaller_grams() {
        let config = SimilarityConfig {
            gram_size_lower: 1,
            gram_size_upper: 3,
            use_levenshtein: false,
            ..SimilarityConfig::default()
        };
        let index = SimilarityIndex::build(["ab"], config);

        // No shared bigram or trigram with "ba", but unigrams overlap
        let results = index.query("ba");
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].name, "ab");
    }

    #[test]
    fn test_invalid_gram_sizes_are_normalized() {
        let config = SimilarityConfig { gram_size_lower: 0, gram_size_upper: 0, ..SimilarityConfig::default() };
        let index = SimilarityIndex::build(NAMES.iter().copied(), config);
        assert_eq!(index.config().gram_size_lower, 1);
        assert_eq!(index.config().gram_size_upper, 1);
        assert_eq!(index.query("transition")[0].name, "transition");
    }

    #[test]
    fn test_gram_counts_pads_short_text() {
        let grams = gram_counts("a", 4);
        assert_eq!(grams.len(), 1);
        assert_eq!(grams.get("-a--"), Some(&1));

        let grams = gram_counts("aa", 2);
        assert_eq!(grams.get("-a"), Some(&1));
        assert_eq!(grams.get("aa"), Some(&1));
        assert_eq!(grams.get("a-"), Some(&1));
    }
}
