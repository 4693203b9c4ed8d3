//! Seeded synthetic retrieval data.
//!
//! Generates standard-normal candidates, queries and true positives with a known seed so an
//! evaluation harness can be smoke-tested end to end without a trained model.

use crate::config::SyntheticConfig;
use crate::error::Result;
use crate::eval::corpus::batched;
use ndarray::iter::AxisChunksIter;
use ndarray::{Array2, Ix2};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rand_distr::{Distribution, StandardNormal};

/// Random candidates, queries and one true positive per query.
///
/// True positives are drawn independently of the corpus, so in general none of them equals a
/// corpus candidate.
#[derive(Debug, Clone)]
pub struct SyntheticRetrievalSet {
    /// M × D
    pub candidates: Array2<f32>,
    /// N × D
    pub queries: Array2<f32>,
    /// N × D
    pub true_candidates: Array2<f32>,
}

impl SyntheticRetrievalSet {
    /// Draw candidates, then queries, then true positives from one seeded stream.
    pub fn generate(config: &SyntheticConfig) -> Self {
        let mut rng = ChaCha8Rng::seed_from_u64(config.seed);
        let dim = config.embedding_dim;

        let candidates = standard_normal((config.num_candidates, dim), &mut rng);
        let queries = standard_normal((config.num_queries, dim), &mut rng);
        let true_candidates = standard_normal((config.num_queries, dim), &mut rng);

        log::debug!(
            "Generated synthetic set: seed={}, candidates={}, queries={}, dim={}",
            config.seed,
            config.num_candidates,
            config.num_queries,
            dim
        );

        Self {
            candidates,
            queries,
            true_candidates,
        }
    }

    /// The candidate corpus in batches of `batch_size` rows.
    pub fn candidate_batches(&self, batch_size: usize) -> Result<AxisChunksIter<'_, f32, Ix2>> {
        batched(&self.candidates, batch_size)
    }
}

fn standard_normal(shape: (usize, usize), rng: &mut ChaCha8Rng) -> Array2<f32> {
    Array2::from_shape_simple_fn(shape, || StandardNormal.sample(&mut *rng))
}
