//! Data models shared across the detection pipeline

pub mod candidate;
pub mod result;

pub use candidate::{
    Candidate, PredictedEntity, ResolvedEntity, SourceKind, Span, DETERMINISTIC_SCORE,
};
pub use result::AnonymizerResult;
