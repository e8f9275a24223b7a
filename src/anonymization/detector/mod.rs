//! Entity sources
//!
//! Every source turns text into unresolved [`Candidate`]s. The coordinator
//! composes them as trait objects. Sources absorb their own partial failures
//! (a bad pattern, a failed chunk); an error returned from [`EntitySource::find`]
//! fails the whole call.

pub mod list;
pub mod pattern;
pub mod predictor;

pub use list::{BlocklistSource, ListMatcher, BLOCKLIST_LABEL};
pub use pattern::{CompiledPattern, PatternMatcher, PatternSource};
pub use predictor::{plan_passes, EntityPredictor, PredictionPass, PredictorSource};

use crate::anonymization::models::Candidate;
use crate::domain::Result;
use async_trait::async_trait;

/// A producer of candidate spans over the whole document
#[async_trait]
pub trait EntitySource: Send + Sync {
    /// Short name used in logs
    fn name(&self) -> &'static str;

    /// Find candidates; offsets are byte offsets into `text`
    async fn find(&self, text: &str) -> Result<Vec<Candidate>>;
}
