// ============================================================
// Layer 5 — Beam Search Decoding
// ============================================================
// Keeps the `num_beams` best partial answers alive at every
// decoder step instead of committing to the single most likely
// token (greedy decoding).
//
// One step, for every live beam:
//   1. ask the StepScorer for logits of the next token
//   2. log-softmax → log-probabilities
//   3. candidate score = beam score + log-probability
// then across all beams:
//   4. keep the best 2 × num_beams candidates
//   5. a candidate ending in EOS becomes a finished hypothesis
//      (only if it ranks inside the first num_beams)
//   6. the best num_beams non-EOS candidates become next beams
//
// Finished hypotheses are scored as
//     sum_logprobs / length ^ length_penalty
// where length counts the decoder start token.
//
// With early stopping the search ends as soon as num_beams
// hypotheses are finished. Without it, the search ends once
// the best live beam can no longer beat the worst finished one.

use anyhow::{anyhow, bail, Result};
use serde::{Deserialize, Serialize};

use crate::domain::traits::StepScorer;

/// Score given to beams 1.. before the first step so that step
/// expands beam 0 only (all beams start from the same token).
const INACTIVE_BEAM_SCORE: f32 = -1e9;

// ─── Configuration ───────────────────────────────────────────────────────────
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationConfig {
    /// Number of beams kept alive at every step
    pub num_beams: usize,

    /// Maximum decoder length, decoder start token included
    pub max_length: usize,

    /// Stop as soon as `num_beams` hypotheses are finished
    pub early_stopping: bool,

    /// Exponent applied to the hypothesis length when scoring.
    /// > 0 favours longer answers, < 0 favours shorter ones.
    pub length_penalty: f32,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            num_beams:      4,
            max_length:     64,
            early_stopping: true,
            length_penalty: 1.0,
        }
    }
}

impl GenerationConfig {
    pub fn validate(&self) -> Result<()> {
        if self.num_beams == 0 {
            bail!("num_beams must be at least 1");
        }
        if self.max_length == 0 {
            bail!("max_length must be at least 1");
        }
        if !self.length_penalty.is_finite() {
            bail!("length_penalty must be a finite number");
        }
        Ok(())
    }
}

/// Token IDs the search needs to know about
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchTokens {
    /// First token of every decoder sequence
    pub decoder_start: u32,
    /// Ends a hypothesis
    pub eos: u32,
}

// ─── Internal bookkeeping ────────────────────────────────────────────────────
#[derive(Debug, Clone)]
struct Beam {
    tokens: Vec<u32>,
    score:  f32,
}

#[derive(Debug, Clone, Copy)]
struct Candidate {
    score: f32,
    token: u32,
    beam:  usize,
}

#[derive(Debug)]
struct Hypothesis {
    tokens: Vec<u32>,
    score:  f32,
}

/// The pool of finished hypotheses, capped at num_beams entries.
#[derive(Debug)]
struct Hypotheses {
    capacity:       usize,
    length_penalty: f32,
    early_stopping: bool,
    items:          Vec<Hypothesis>,
    worst_score:    f32,
}

impl Hypotheses {
    fn new(config: &GenerationConfig) -> Self {
        Self {
            capacity:       config.num_beams,
            length_penalty: config.length_penalty,
            early_stopping: config.early_stopping,
            items:          Vec::with_capacity(config.num_beams + 1),
            worst_score:    1e9,
        }
    }

    fn len(&self) -> usize {
        self.items.len()
    }

    fn normalise(&self, sum_logprobs: f32, len: usize) -> f32 {
        sum_logprobs / (len as f32).powf(self.length_penalty)
    }

    fn add(&mut self, tokens: Vec<u32>, sum_logprobs: f32) {
        let score = self.normalise(sum_logprobs, tokens.len());
        if self.items.len() >= self.capacity && score <= self.worst_score {
            return;
        }

        self.items.push(Hypothesis { tokens, score });

        if self.items.len() > self.capacity {
            if let Some(worst) = self.worst_index() {
                self.items.remove(worst);
            }
            self.worst_score = self
                .items
                .iter()
                .map(|h| h.score)
                .fold(f32::INFINITY, f32::min);
        } else {
            self.worst_score = self.worst_score.min(score);
        }
    }

    fn worst_index(&self) -> Option<usize> {
        self.items
            .iter()
            .enumerate()
            .min_by(|a, b| a.1.score.total_cmp(&b.1.score))
            .map(|(i, _)| i)
    }

    fn is_done(&self, best_sum_logprobs: f32, cur_len: usize) -> bool {
        if self.items.len() < self.capacity {
            false
        } else if self.early_stopping {
            true
        } else {
            self.normalise(best_sum_logprobs, cur_len) <= self.worst_score
        }
    }

    /// Highest score wins; among equal scores the most recently added
    fn into_best(self) -> Option<Hypothesis> {
        self.items
            .into_iter()
            .max_by(|a, b| a.score.total_cmp(&b.score))
    }
}

// ─── Search ──────────────────────────────────────────────────────────────────
/// Run beam search against `scorer`.
///
/// Returns the generated tokens of the best hypothesis, without
/// the decoder start token and without the closing EOS.
pub fn beam_search<S>(
    scorer: &mut S,
    tokens: SearchTokens,
    config: &GenerationConfig,
) -> Result<Vec<u32>>
where
    S: StepScorer + ?Sized,
{
    config.validate()?;
    let num_beams = config.num_beams;
    let top_n     = 2 * num_beams;

    let mut beams: Vec<Beam> = (0..num_beams)
        .map(|i| Beam {
            tokens: vec![tokens.decoder_start],
            score:  if i == 0 { 0.0 } else { INACTIVE_BEAM_SCORE },
        })
        .collect();
    let mut hypotheses = Hypotheses::new(config);
    let mut done       = false;
    let mut cur_len    = 1usize;

    while cur_len < config.max_length {
        let mut candidates: Vec<Candidate> = Vec::with_capacity(beams.len() * top_n);
        // Identical prefixes (all beams on the first step) are scored once
        let mut scored: Vec<(usize, Vec<(u32, f32)>)> = Vec::new();

        for (b, beam) in beams.iter().enumerate() {
            let cached = scored
                .iter()
                .find(|(other, _)| beams[*other].tokens == beam.tokens)
                .map(|(_, top)| top.clone());
            let top = match cached {
                Some(top) => top,
                None => {
                    let logits = scorer.next_token_logits(&beam.tokens)?;
                    if logits.is_empty() {
                        bail!("scorer returned empty logits");
                    }
                    let top = top_k(&log_softmax(&logits), top_n);
                    scored.push((b, top.clone()));
                    top
                }
            };
            candidates.extend(top.into_iter().map(|(token, logprob)| Candidate {
                score: beam.score + logprob,
                token,
                beam: b,
            }));
        }

        candidates.sort_by(|x, y| {
            y.score
                .total_cmp(&x.score)
                .then(x.beam.cmp(&y.beam))
                .then(x.token.cmp(&y.token))
        });
        candidates.truncate(top_n);

        let mut next: Vec<Beam> = Vec::with_capacity(num_beams);
        for (rank, cand) in candidates.iter().enumerate() {
            let parent = &beams[cand.beam];
            if cand.token == tokens.eos {
                if rank >= num_beams {
                    continue;
                }
                hypotheses.add(parent.tokens.clone(), cand.score);
            } else {
                let mut seq = Vec::with_capacity(parent.tokens.len() + 1);
                seq.extend_from_slice(&parent.tokens);
                seq.push(cand.token);
                next.push(Beam { tokens: seq, score: cand.score });
            }
            if next.len() == num_beams {
                break;
            }
        }

        let best_score = candidates.first().map_or(f32::NEG_INFINITY, |c| c.score);
        done = hypotheses.is_done(best_score, cur_len);

        beams = next;
        cur_len += 1;

        if done || beams.is_empty() {
            break;
        }
    }

    if !done {
        for beam in beams {
            hypotheses.add(beam.tokens, beam.score);
        }
    }

    tracing::debug!(
        "Beam search finished at length {} with {} hypotheses",
        cur_len,
        hypotheses.len()
    );

    let best = hypotheses
        .into_best()
        .ok_or_else(|| anyhow!("beam search produced no hypothesis"))?;
    Ok(best.tokens.into_iter().skip(1).collect())
}

/// Numerically stable log-softmax
pub fn log_softmax(logits: &[f32]) -> Vec<f32> {
    let max = logits.iter().copied().fold(f32::NEG_INFINITY, f32::max);
    if !max.is_finite() {
        return vec![f32::NEG_INFINITY; logits.len()];
    }
    let sum: f32 = logits.iter().map(|&x| (x - max).exp()).sum();
    let log_sum = sum.ln() + max;
    logits.iter().map(|&x| x - log_sum).collect()
}

/// The `k` largest values with their indices, best first.
/// Ties keep the lower index first.
fn top_k(values: &[f32], k: usize) -> Vec<(u32, f32)> {
    let mut best: Vec<(u32, f32)> = Vec::with_capacity(k + 1);
    for (i, &v) in values.iter().enumerate() {
        if best.len() == k && best.last().is_some_and(|&(_, w)| v <= w) {
            continue;
        }
        let pos = best.partition_point(|&(_, w)| w >= v);
        best.insert(pos, (i as u32, v));
        best.truncate(k);
    }
    best
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    const START: u32 = 0;
    const EOS: u32 = 1;
    const A: u32 = 2;
    const B: u32 = 3;
    const NEVER: f32 = -1e4;

    const TOKENS: SearchTokens = SearchTokens { decoder_start: START, eos: EOS };

    /// Scorer backed by a closure over the prefix.
    /// Also records every prefix it was asked about.
    struct FnScorer<F: FnMut(&[u32]) -> Vec<f32>> {
        f:     F,
        calls: Vec<Vec<u32>>,
    }

    impl<F: FnMut(&[u32]) -> Vec<f32>> FnScorer<F> {
        fn new(f: F) -> Self {
            Self { f, calls: Vec::new() }
        }
    }

    impl<F: FnMut(&[u32]) -> Vec<f32>> StepScorer for FnScorer<F> {
        fn next_token_logits(&mut self, prefix: &[u32]) -> Result<Vec<f32>> {
            self.calls.push(prefix.to_vec());
            Ok((self.f)(prefix))
        }
    }

    /// Logits laid out as [start, eos, a, b]
    fn probs(eos: f32, a: f32, b: f32) -> Vec<f32> {
        let ln = |p: f32| if p > 0.0 { p.ln() } else { NEVER };
        vec![NEVER, ln(eos), ln(a), ln(b)]
    }

    /// Greedy picks "a" first; the single most likely full answer is "b".
    ///   [start]       → a 0.6, b 0.4
    ///   [start, a]    → a 0.6, b 0.4
    ///   [start, a, _] → eos 1.0
    ///   [start, b]    → eos 1.0
    fn garden_path(prefix: &[u32]) -> Vec<f32> {
        match prefix {
            [START] => probs(0.0, 0.6, 0.4),
            [START, A] => probs(0.0, 0.6, 0.4),
            [START, A, _] => probs(1.0, 0.0, 0.0),
            [START, B] => probs(1.0, 0.0, 0.0),
            _ => probs(1.0, 0.0, 0.0),
        }
    }

    fn config(num_beams: usize, length_penalty: f32) -> GenerationConfig {
        GenerationConfig {
            num_beams,
            max_length: 10,
            early_stopping: true,
            length_penalty,
        }
    }

    #[test]
    fn test_log_softmax_sums_to_one() {
        let lp = log_softmax(&[1.0, 2.0, 3.0]);
        let total: f32 = lp.iter().map(|x| x.exp()).sum();
        assert!((total - 1.0).abs() < 1e-5);
        assert!(lp[2] > lp[1] && lp[1] > lp[0]);
    }

    #[test]
    fn test_top_k_orders_best_first() {
        let top = top_k(&[0.1, 0.9, 0.5, 0.9, -1.0], 3);
        assert_eq!(top, vec![(1, 0.9), (3, 0.9), (2, 0.5)]);
    }

    #[test]
    fn test_beam_search_beats_greedy_without_length_penalty() {
        let mut scorer = FnScorer::new(garden_path);
        let out = beam_search(&mut scorer, TOKENS, &config(2, 0.0)).unwrap();
        // P(b) = 0.4 beats P(a a) = 0.36
        assert_eq!(out, vec![B]);
    }

    #[test]
    fn test_greedy_with_single_beam() {
        let mut scorer = FnScorer::new(garden_path);
        let out = beam_search(&mut scorer, TOKENS, &config(1, 0.0)).unwrap();
        assert_eq!(out, vec![A, A]);
    }

    #[test]
    fn test_length_penalty_favours_longer_answers() {
        let mut scorer = FnScorer::new(garden_path);
        let out = beam_search(&mut scorer, TOKENS, &config(2, 1.0)).unwrap();
        // ln(0.36) / 3 = -0.34 beats ln(0.4) / 2 = -0.46
        assert_eq!(out, vec![A, A]);
    }

    #[test]
    fn test_first_step_scores_shared_prefix_once() {
        let mut scorer = FnScorer::new(garden_path);
        beam_search(&mut scorer, TOKENS, &config(2, 0.0)).unwrap();

        let start_calls = scorer.calls.iter().filter(|p| p.as_slice() == [START]).count();
        assert_eq!(start_calls, 1);

        // Second step expands two distinct beams, not two copies of beam 0
        let second: Vec<&Vec<u32>> = scorer.calls.iter().filter(|p| p.len() == 2).collect();
        assert_eq!(second.len(), 2);
        assert_ne!(second[0], second[1]);
    }

    #[test]
    fn test_max_length_caps_output() {
        // EOS is never likely, "a" always is
        let mut scorer = FnScorer::new(|_: &[u32]| vec![NEVER, NEVER, 0.0, -1.0]);
        let cfg = GenerationConfig { max_length: 5, ..config(2, 1.0) };
        let out = beam_search(&mut scorer, TOKENS, &cfg).unwrap();
        assert_eq!(out, vec![A, A, A, A]);
    }

    #[test]
    fn test_max_length_one_yields_empty_answer() {
        let mut scorer = FnScorer::new(garden_path);
        let cfg = GenerationConfig { max_length: 1, ..config(4, 1.0) };
        assert!(beam_search(&mut scorer, TOKENS, &cfg).unwrap().is_empty());
        assert!(scorer.calls.is_empty());
    }

    #[test]
    fn test_without_early_stopping_still_finds_best() {
        let mut scorer = FnScorer::new(garden_path);
        let cfg = GenerationConfig { early_stopping: false, ..config(2, 0.0) };
        let out = beam_search(&mut scorer, TOKENS, &cfg).unwrap();
        assert_eq!(out, vec![B]);
    }

    #[test]
    fn test_zero_beams_is_rejected() {
        let mut scorer = FnScorer::new(garden_path);
        assert!(beam_search(&mut scorer, TOKENS, &config(0, 1.0)).is_err());
    }

    #[test]
    fn test_scorer_errors_propagate() {
        struct Failing;
        impl StepScorer for Failing {
            fn next_token_logits(&mut self, _: &[u32]) -> Result<Vec<f32>> {
                Err(anyhow!("device lost"))
            }
        }
        let err = beam_search(&mut Failing, TOKENS, &GenerationConfig::default()).unwrap_err();
        assert!(err.to_string().contains("device lost"));
    }

    #[test]
    fn test_hypotheses_keep_only_the_best() {
        let mut hyps = Hypotheses::new(&config(2, 0.0));
        hyps.add(vec![0, 2], -3.0);
        hyps.add(vec![0, 3], -1.0);
        hyps.add(vec![0, 2, 2], -2.0);
        assert_eq!(hyps.len(), 2);
        assert_eq!(hyps.worst_score, -2.0);
        assert_eq!(hyps.into_best().map(|h| h.tokens), Some(vec![0, 3]));
    }
}
