//! Maximum Marginal Relevance keyword selection.
//!
//! `MMR(t) = λ·relevance(t) − (1 − λ)·max_{s ∈ selected} sim(t, s)`

use std::{cmp::Ordering, collections::HashSet};

use crate::CandidateTerm;

/// One pick of the selector.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Selection {
    /// Index into the candidate slice.
    pub index: usize,
    /// Combined score normalized to [0, 1].
    pub relevance: f64,
    /// MMR score at the time of selection.
    pub mmr: f64,
}

/// Lexical features of one term, computed once.
struct Features {
    /// Distinct words.
    words: HashSet<String>,
    /// Distinct character trigrams of the space-padded term.
    trigrams: HashSet<String>,
}

impl Features {
    /// Extracts features from a term.
    fn new(term: &str) -> Self {
        let words = term.split_whitespace().map(str::to_string).collect();
        let padded: Vec<char> = format!(" {term} ").chars().collect();
        let trigrams = if padded.len() < 3 {
            HashSet::from([padded.iter().collect()])
        } else {
            padded.windows(3).map(|w| w.iter().collect()).collect()
        };
        Self { words, trigrams }
    }

    /// Similarity in [0, 1]: the larger of word and trigram Jaccard.
    fn similarity(&self, other: &Self) -> f64 {
        jaccard(&self.words, &other.words).max(jaccard(&self.trigrams, &other.trigrams))
    }
}

/// Jaccard index of two sets; 0 when both are empty.
fn jaccard(a: &HashSet<String>, b: &HashSet<String>) -> f64 {
    let union = a.union(b).count();
    if union == 0 {
        return 0.0;
    }
    a.intersection(b).count() as f64 / union as f64
}

/// Lexical similarity between two terms.
///
/// Symmetric, in [0, 1], and 1 for identical terms.
pub fn term_similarity(a: &str, b: &str) -> f64 {
    Features::new(a).similarity(&Features::new(b))
}

/// Orders candidate `a` against `b` for selection; `Greater` means `a` is preferred.
///
/// Higher MMR first, then higher relevance, then earlier first-seen index.
fn prefer(a: (f64, f64, usize), b: (f64, f64, usize)) -> Ordering {
    a.0.partial_cmp(&b.0)
        .unwrap_or(Ordering::Equal)
        .then_with(|| a.1.partial_cmp(&b.1).unwrap_or(Ordering::Equal))
        .then_with(|| b.2.cmp(&a.2))
}

/// Selects up to `k` diverse candidates.
///
/// The first pick is always the most relevant candidate. Selection is deterministic,
/// returns at most `k` entries, and never repeats a candidate. `lambda` is clamped to
/// [0, 1]; NaN is treated as 1.
pub fn select(candidates: &[CandidateTerm], k: usize, lambda: f64) -> Vec<Selection> {
    let lambda = if lambda.is_nan() {
        1.0
    } else {
        lambda.clamp(0.0, 1.0)
    };
    let max_combined = candidates
        .iter()
        .map(|c| c.combined)
        .fold(0.0_f64, f64::max);
    let relevance: Vec<f64> = candidates
        .iter()
        .map(|c| {
            if max_combined > 0.0 {
                (c.combined / max_combined).clamp(0.0, 1.0)
            } else {
                0.0
            }
        })
        .collect();
    let features: Vec<Features> = candidates.iter().map(|c| Features::new(&c.term)).collect();

    let mut remaining: Vec<usize> = (0..candidates.len()).collect();
    let mut max_sim = vec![0.0_f64; candidates.len()];
    let mut selected: Vec<Selection> = Vec::with_capacity(k.min(candidates.len()));

    while selected.len() < k && !remaining.is_empty() {
        let score = |i: usize| {
            if selected.is_empty() {
                relevance[i]
            } else {
                lambda * relevance[i] - (1.0 - lambda) * max_sim[i]
            }
        };

        let key = |i: usize| (score(i), relevance[i], candidates[i].first_seen);
        let Some((pos, &best)) = remaining
            .iter()
            .enumerate()
            .max_by(|a, b| prefer(key(*a.1), key(*b.1)))
        else {
            break;
        };

        let mmr = score(best);
        remaining.swap_remove(pos);
        selected.push(Selection {
            index: best,
            relevance: relevance[best],
            mmr,
        });

        for &i in &remaining {
            let sim = features[i].similarity(&features[best]);
            if sim > max_sim[i] {
                max_sim[i] = sim;
            }
        }
    }

    selected
}
