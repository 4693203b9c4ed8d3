pub mod streaming;

pub use streaming::{StreamingTopK, TopKCandidates};
