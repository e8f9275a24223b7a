//! Label handling
//!
//! [`router`] splits requested labels into predictor labels and pattern
//! entity types; [`mapper`] turns internal entity types into display labels.

pub mod mapper;
pub mod router;

pub use mapper::{normalize_label, LabelMapper};
pub use router::{LabelRoute, LabelRouter, BLOCKLIST_TOKEN};
