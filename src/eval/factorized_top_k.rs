//! Factorized top-K accuracy.
//!
//! For every query, the score against its true positive is compared with the scores against
//! the whole candidate corpus. The true positive's rank is one plus the number of corpus
//! candidates scoring strictly higher, and it counts as a hit for cutoff `k` when that rank is
//! at most `k`. Candidates arrive in batches; per-batch counts are summed before the cutoff is
//! applied, so any batching of the same corpus gives the same result.
//!
//! The evaluator is a plain accumulator: `update` adds to running counts and `result` reads
//! them. It is single-writer (`update` takes `&mut self`); evaluate shards independently and
//! combine them with [`FactorizedTopK::merge`] instead of sharing one across threads.

use crate::config::EvaluatorConfig;
use crate::error::{Result, TopkEvalError};
use crate::eval::corpus::batched;
use crate::eval::result::AccuracyResult;
use crate::eval::scoring::{
    candidate_scores, check_query_pair, check_width, count_higher, positive_scores,
};
use crate::search::StreamingTopK;
use ndarray::{ArrayBase, ArrayView2, Data, Ix2};
use std::collections::HashSet;

/// Streaming top-k accuracy over a batched candidate corpus.
#[derive(Debug, Clone)]
pub struct FactorizedTopK {
    ks: Vec<usize>,
    hits: Vec<u64>,
    num_queries: u64,
    candidate_batch_size: usize,
}

const DEFAULT_CANDIDATE_BATCH_SIZE: usize = 128;

impl FactorizedTopK {
    /// Create an evaluator reporting the given cutoffs, in the given order.
    pub fn new(ks: Vec<usize>) -> Result<Self> {
        if ks.is_empty() {
            return Err(TopkEvalError::InvalidInput(
                "at least one cutoff k is required".to_string(),
            ));
        }
        if ks.contains(&0) {
            return Err(TopkEvalError::InvalidInput("cutoff k must be at least 1".to_string()));
        }
        if ks.iter().collect::<HashSet<_>>().len() != ks.len() {
            return Err(TopkEvalError::InvalidInput(format!("duplicate cutoffs in {:?}", ks)));
        }
        let hits = vec![0; ks.len()];
        Ok(Self {
            ks,
            hits,
            num_queries: 0,
            candidate_batch_size: DEFAULT_CANDIDATE_BATCH_SIZE,
        })
    }

    /// Cutoffs and in-memory corpus batch size from `[evaluator]`.
    pub fn from_config(config: &EvaluatorConfig) -> Result<Self> {
        Self::new(config.ks.clone())?.with_candidate_batch_size(config.candidate_batch_size)
    }

    /// Rows per batch used by [`update_corpus`](Self::update_corpus).
    pub fn with_candidate_batch_size(mut self, candidate_batch_size: usize) -> Result<Self> {
        if candidate_batch_size == 0 {
            return Err(TopkEvalError::InvalidInput(
                "candidate batch size must be greater than 0".to_string(),
            ));
        }
        self.candidate_batch_size = candidate_batch_size;
        Ok(self)
    }

    pub fn ks(&self) -> &[usize] {
        &self.ks
    }

    pub fn candidate_batch_size(&self) -> usize {
        self.candidate_batch_size
    }

    /// Queries accumulated since creation or the last reset.
    pub fn num_queries(&self) -> u64 {
        self.num_queries
    }

    /// Score `queries` against their true positives and the candidate corpus, and add the
    /// outcome to the running counts.
    ///
    /// `candidates` may be any finite sequence of batches of the same width as the queries.
    /// An empty corpus ranks every true positive first. On error the counts are unchanged.
    pub fn update<'c, I>(
        &mut self,
        queries: ArrayView2<f32>,
        true_positives: ArrayView2<f32>,
        candidates: I,
    ) -> Result<()>
    where
        I: IntoIterator<Item = ArrayView2<'c, f32>>,
    {
        let (n, d) = check_query_pair(&queries, &true_positives)?;
        let positives = positive_scores(&queries, &true_positives);

        let mut higher = vec![0usize; n];
        let mut num_candidates = 0usize;
        for (batch_index, batch) in candidates.into_iter().enumerate() {
            check_width(&format!("candidate batch {}", batch_index), d, batch.ncols())?;
            if batch.nrows() == 0 {
                continue;
            }
            let scores = candidate_scores(&queries, &batch);
            for (total, count) in higher
                .iter_mut()
                .zip(count_higher(&scores.view(), &positives.view()))
            {
                *total += count;
            }
            num_candidates += batch.nrows();
            log::trace!("Scored candidate batch {} ({} rows)", batch_index, batch.nrows());
        }

        // A non-finite positive is never inside the top k.
        let ranks: Vec<Option<usize>> = positives
            .iter()
            .zip(&higher)
            .map(|(positive, &count)| positive.is_finite().then(|| count + 1))
            .collect();

        self.record(&ranks);
        log::debug!(
            "FactorizedTopK update: {} queries against {} candidates ({} total queries)",
            n,
            num_candidates,
            self.num_queries
        );
        Ok(())
    }

    /// [`update`](Self::update) against an in-memory corpus, split into batches of
    /// `candidate_batch_size` rows.
    pub fn update_corpus<S>(
        &mut self,
        queries: ArrayView2<f32>,
        true_positives: ArrayView2<f32>,
        corpus: &ArrayBase<S, Ix2>,
    ) -> Result<()>
    where
        S: Data<Elem = f32>,
    {
        self.update(queries, true_positives, batched(corpus, self.candidate_batch_size)?)
    }

    /// Like [`update`](Self::update), but with the true positive identified by its index in
    /// the concatenated corpus instead of by its embedding.
    ///
    /// The top `max(ks)` candidates are retrieved per query; the query is a hit for `k` when
    /// `true_ids[i]` is among the first `k` retrieved. Candidates with equal scores are ordered
    /// by index.
    pub fn update_with_ids<'c, I>(
        &mut self,
        queries: ArrayView2<f32>,
        true_ids: &[usize],
        candidates: I,
    ) -> Result<()>
    where
        I: IntoIterator<Item = ArrayView2<'c, f32>>,
    {
        let n = queries.nrows();
        if n == 0 {
            return Err(TopkEvalError::InvalidInput(
                "query batch must contain at least one query".to_string(),
            ));
        }
        check_width("true candidate ids", n, true_ids.len())?;

        let max_k = self.ks.iter().copied().max().unwrap_or(1);
        let top = StreamingTopK::new(max_k)?.search(queries, candidates)?;
        let ranks: Vec<Option<usize>> = true_ids
            .iter()
            .enumerate()
            .map(|(row, &id)| top.rank_of(row, id))
            .collect();

        self.record(&ranks);
        log::debug!(
            "FactorizedTopK update_with_ids: {} queries, top-{} retrieved ({} total queries)",
            n,
            max_k,
            self.num_queries
        );
        Ok(())
    }

    fn record(&mut self, ranks: &[Option<usize>]) {
        for (&k, hits) in self.ks.iter().zip(self.hits.iter_mut()) {
            *hits += ranks
                .iter()
                .filter(|rank| matches!(rank, Some(r) if *r <= k))
                .count() as u64;
        }
        self.num_queries += ranks.len() as u64;
    }

    /// Accuracy per cutoff over everything accumulated so far.
    ///
    /// Fails with `InvalidInput` before the first update, since there is nothing to average.
    pub fn result(&self) -> Result<AccuracyResult> {
        if self.num_queries == 0 {
            return Err(TopkEvalError::InvalidInput(
                "no queries accumulated; call update before result".to_string(),
            ));
        }
        let total = self.num_queries as f64;
        Ok(AccuracyResult::new(
            self.ks
                .iter()
                .zip(&self.hits)
                .map(|(&k, &hits)| (k, hits as f64 / total))
                .collect(),
        ))
    }

    /// Clear the running counts; the cutoffs are kept.
    pub fn reset(&mut self) {
        self.hits.iter_mut().for_each(|h| *h = 0);
        self.num_queries = 0;
    }

    /// Add another evaluator's counts to this one. Both must report the same cutoffs.
    pub fn merge(&mut self, other: &FactorizedTopK) -> Result<()> {
        if self.ks != other.ks {
            return Err(TopkEvalError::InvalidInput(format!(
                "cannot merge evaluators with cutoffs {:?} and {:?}",
                self.ks, other.ks
            )));
        }
        for (hits, other_hits) in self.hits.iter_mut().zip(&other.hits) {
            *hits += other_hits;
        }
        self.num_queries += other.num_queries;
        Ok(())
    }
}
