//! Candidate spans and resolved entities

use serde::{Deserialize, Serialize};

/// Score carried by every pattern and list match
pub const DETERMINISTIC_SCORE: f32 = 1.0;

/// Which kind of source produced a candidate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceKind {
    /// Learned entity predictor
    Predictor,
    /// Profile regex pattern
    Pattern,
    /// Profile blocklist
    List,
}

/// Half-open `[start, end)` byte range into the original text
///
/// Both ends always fall on `char` boundaries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.start >= self.end
    }

    /// Shift the span by `offset` bytes (chunk-local to document-global)
    pub fn shifted(&self, offset: usize) -> Self {
        Self::new(self.start + offset, self.end + offset)
    }

    pub fn overlaps(&self, other: &Span) -> bool {
        self.start < other.end && other.start < self.end
    }

    /// Check that the span is non-empty and slices `text` on char boundaries
    pub fn fits(&self, text: &str) -> bool {
        !self.is_empty()
            && self.end <= text.len()
            && text.is_char_boundary(self.start)
            && text.is_char_boundary(self.end)
    }
}

/// An unresolved detection from any source
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    pub span: Span,
    /// Raw, source-specific label (`"phone number"`, `"FI_HETU"`, `"MUU_TUNNISTE"`)
    pub label: String,
    /// Confidence, exactly `1.0` for deterministic sources
    pub score: f32,
    pub source: SourceKind,
    /// Slice of the original text covered by `span`
    pub text: String,
}

impl Candidate {
    /// Create a pattern or list match
    pub fn deterministic(
        span: Span,
        label: impl Into<String>,
        text: impl Into<String>,
        source: SourceKind,
    ) -> Self {
        Self {
            span,
            label: label.into(),
            score: DETERMINISTIC_SCORE,
            source,
            text: text.into(),
        }
    }

    /// Create a predictor detection
    pub fn predicted(
        span: Span,
        label: impl Into<String>,
        score: f32,
        text: impl Into<String>,
    ) -> Self {
        Self {
            span,
            label: label.into(),
            score: score.clamp(0.0, 1.0),
            source: SourceKind::Predictor,
            text: text.into(),
        }
    }

    pub fn start(&self) -> usize {
        self.span.start
    }

    pub fn end(&self) -> usize {
        self.span.end
    }

    pub fn len(&self) -> usize {
        self.span.len()
    }

    pub fn is_empty(&self) -> bool {
        self.span.is_empty()
    }

    /// Ranked ahead of probabilistic output on equal start
    pub fn is_deterministic(&self) -> bool {
        self.score == DETERMINISTIC_SCORE
    }
}

/// Entity as returned by the external predictor, offsets local to the text it saw
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictedEntity {
    pub start: usize,
    pub end: usize,
    pub text: String,
    pub label: String,
    pub score: f32,
}

/// A candidate that survived overlap resolution
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolvedEntity {
    pub start: usize,
    pub end: usize,
    /// Raw label of the winning candidate
    pub label: String,
    /// Label substituted into the output text
    pub display_label: String,
    pub score: f32,
    pub source: SourceKind,
    pub text: String,
}
