//! Result type alias for the anonymizer
//!
//! Every fallible operation in the crate returns this alias so callers only
//! deal with [`AnonymizerError`].

use super::errors::AnonymizerError;

/// Result type alias for anonymizer operations
///
/// # Examples
///
/// ```
/// use text_anonymizer::domain::result::Result;
/// use text_anonymizer::domain::errors::AnonymizerError;
///
/// fn example_function() -> Result<String> {
///     Ok("success".to_string())
/// }
///
/// fn failing_function() -> Result<()> {
///     Err(AnonymizerError::Profile("unreadable blocklist".to_string()))
/// }
/// ```
pub type Result<T> = std::result::Result<T, AnonymizerError>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::errors::AnonymizerError;

    #[test]
    fn test_result_err() {
        let result: Result<i32> = Err(AnonymizerError::Pattern("bad".to_string()));
        assert!(result.is_err());
    }

    #[test]
    fn test_result_with_question_mark() -> Result<()> {
        fn inner() -> Result<i32> {
            Ok(42)
        }

        let value = inner()?;
        assert_eq!(value, 42);
        Ok(())
    }
}
