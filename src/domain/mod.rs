//! Domain error and result types for the anonymizer.
//!
//! # Error Handling
//!
//! All fallible operations return [`Result<T, AnonymizerError>`]:
//!
//! ```rust
//! use text_anonymizer::domain::{AnonymizerError, Result};
//!
//! fn example() -> Result<()> {
//!     Err(AnonymizerError::Configuration("max_chars must be > 0".to_string()))
//! }
//! ```

pub mod errors;
pub mod result;

pub use errors::AnonymizerError;
pub use result::Result;
