pub mod config;
pub mod error;
pub mod eval;
pub mod search;
pub mod synthetic;

pub use config::Config;
pub use error::{Result, TopkEvalError};
pub use eval::{AccuracyResult, FactorizedTopK};
pub use search::{StreamingTopK, TopKCandidates};
pub use synthetic::SyntheticRetrievalSet;
