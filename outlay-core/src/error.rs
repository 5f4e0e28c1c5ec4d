//! Query-side error taxonomy.
//!
//! Parsing and categorization failures are absorbed where they happen; these
//! are the errors that must surface to the caller, since they indicate a
//! malformed query that would otherwise produce misleading zeros.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum QueryError {
    /// An unrecognized period string reached the resolver.
    #[error("invalid period: {0}")]
    InvalidPeriod(String),

    /// An unrecognized intent-type string.
    #[error("invalid intent type: {0}")]
    InvalidIntentType(String),

    /// The classifier reply could not be parsed into an intent.
    #[error("could not parse intent: {0}")]
    MalformedIntent(String),

    #[error("category is required for CATEGORY_SUMMARY intent")]
    MissingCategory,

    #[error("both category1 and category2 are required for CATEGORY_COMPARISON intent")]
    MissingComparisonCategories,

    #[error("both period1 and period2 are required for PERIOD_COMPARISON intent")]
    MissingComparisonPeriods,
}
