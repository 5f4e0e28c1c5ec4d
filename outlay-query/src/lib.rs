//! outlay-query: the aggregation engine and the intent dispatcher.

pub mod aggregate;
pub mod dispatch;
pub mod results;

pub use aggregate::Aggregator;
pub use dispatch::{dispatch, dispatch_at};
pub use results::{
    AggregationOutcome, AnomalyReport, CategorySpendResult, ComparisonResult, SpendResult,
    TopMerchantsResult,
};
