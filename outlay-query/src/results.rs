//! Aggregation result shapes.
//!
//! Plain data records, produced fresh per query and never persisted. The
//! numbers in them are ground truth for any downstream explanation step.

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

use outlay_core::Transaction;

/// Total spending for one period.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpendResult {
    pub period: String,
    pub total_spent: f64,
}

/// Spending within one category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategorySpendResult {
    pub category: String,
    pub period: String,
    pub total_spent: f64,
    pub average: f64,
}

/// Spending across two periods.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonResult {
    pub base_period: String,
    pub compare_period: String,
    pub base_amount: f64,
    pub compare_amount: f64,
    pub delta_percent: f64,
}

/// Top merchants by total spending.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopMerchantsResult {
    pub period: String,
    pub merchants: HashMap<String, f64>,
}

/// Transactions statistically above typical spending for the period.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnomalyReport {
    pub period: String,
    pub average: f64,
    pub threshold: f64,
    pub anomaly_count: usize,
    pub anomalies: Vec<Transaction>,
}

/// Whatever one dispatched intent produced. Serializes as the bare inner
/// record, so callers see the shape that matches the intent.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum AggregationOutcome {
    Spend(SpendResult),
    CategorySpend(CategorySpendResult),
    CategoryComparison(HashMap<String, f64>),
    PeriodComparison(ComparisonResult),
    TopMerchants(TopMerchantsResult),
    /// Daily (`YYYY-MM-DD`) or monthly (`YYYY-MM`) buckets.
    Trend(BTreeMap<String, f64>),
    Anomalies(AnomalyReport),
}
