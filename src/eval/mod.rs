//! Evaluation framework: factorized top-K accuracy, its brute-force reference, and the
//! scoring primitives both share.

pub mod corpus;
pub mod factorized_top_k;
pub mod reference;
pub mod result;
pub mod scoring;

pub use corpus::batched;
pub use factorized_top_k::FactorizedTopK;
pub use reference::{brute_force_accuracy, in_top_k, score_matrix};
pub use result::{metric_name, AccuracyResult};
