//! Structured spending intents.
//!
//! Intents are produced by an external language-model classifier and consumed
//! by the dispatcher. This module owns the wire shape and the validation that
//! happens when a raw classifier reply is turned into an [`ExpenseIntent`]:
//! fence stripping, confidence clamping, and category coercion. It never
//! touches the store.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::QueryError;
use crate::model::INTENT_CATEGORIES;
use crate::period::Period;

/// Closed intent-type enumeration. Wire-stable string set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum IntentType {
    #[serde(rename = "TOTAL_SPEND")]
    TotalSpend,
    #[serde(rename = "CATEGORY_SUMMARY")]
    CategorySummary,
    #[serde(rename = "CATEGORY_COMPARISON")]
    CategoryComparison,
    #[serde(rename = "PERIOD_COMPARISON")]
    PeriodComparison,
    #[serde(rename = "TOP_MERCHANTS")]
    TopMerchants,
    #[serde(rename = "DAILY_TREND")]
    DailyTrend,
    #[serde(rename = "MONTHLY_TREND")]
    MonthlyTrend,
    #[serde(rename = "ANOMALY_EXPLANATION")]
    AnomalyExplanation,
    #[serde(rename = "BUDGET_STATUS")]
    BudgetStatus,
    #[serde(rename = "GENERAL_INSIGHT")]
    GeneralInsight,
}

impl fmt::Display for IntentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            IntentType::TotalSpend => "TOTAL_SPEND",
            IntentType::CategorySummary => "CATEGORY_SUMMARY",
            IntentType::CategoryComparison => "CATEGORY_COMPARISON",
            IntentType::PeriodComparison => "PERIOD_COMPARISON",
            IntentType::TopMerchants => "TOP_MERCHANTS",
            IntentType::DailyTrend => "DAILY_TREND",
            IntentType::MonthlyTrend => "MONTHLY_TREND",
            IntentType::AnomalyExplanation => "ANOMALY_EXPLANATION",
            IntentType::BudgetStatus => "BUDGET_STATUS",
            IntentType::GeneralInsight => "GENERAL_INSIGHT",
        };
        f.write_str(s)
    }
}

impl FromStr for IntentType {
    type Err = QueryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "TOTAL_SPEND" => Ok(IntentType::TotalSpend),
            "CATEGORY_SUMMARY" => Ok(IntentType::CategorySummary),
            "CATEGORY_COMPARISON" => Ok(IntentType::CategoryComparison),
            "PERIOD_COMPARISON" => Ok(IntentType::PeriodComparison),
            "TOP_MERCHANTS" => Ok(IntentType::TopMerchants),
            "DAILY_TREND" => Ok(IntentType::DailyTrend),
            "MONTHLY_TREND" => Ok(IntentType::MonthlyTrend),
            "ANOMALY_EXPLANATION" => Ok(IntentType::AnomalyExplanation),
            "BUDGET_STATUS" => Ok(IntentType::BudgetStatus),
            "GENERAL_INSIGHT" => Ok(IntentType::GeneralInsight),
            other => Err(QueryError::InvalidIntentType(other.to_string())),
        }
    }
}

/// A validated, structured description of what the user is asking.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpenseIntent {
    pub intent_type: IntentType,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub category: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub period: Option<Period>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub vendor: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount: Option<f64>,
    /// Intent-specific extras: category1/category2, period1/period2, months.
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub parameters: HashMap<String, String>,
    /// Always within [0, 1]; informational only, never gates aggregation.
    #[serde(default)]
    pub confidence: f64,
}

impl ExpenseIntent {
    pub fn new(intent_type: IntentType) -> Self {
        Self {
            intent_type,
            category: String::new(),
            period: None,
            vendor: String::new(),
            amount: None,
            parameters: HashMap::new(),
            confidence: 0.0,
        }
    }

    /// Extra parameter by key; empty string when absent.
    pub fn param(&self, key: &str) -> &str {
        self.parameters.get(key).map(String::as_str).unwrap_or("")
    }

    /// Parse a raw classifier reply into a validated intent.
    ///
    /// Strips markdown code fences the model may wrap the JSON in, clamps
    /// confidence into [0, 1], and drops a category outside the accepted set
    /// rather than failing. Unknown intent-type or period strings are errors.
    pub fn from_model_response(raw: &str) -> Result<Self, QueryError> {
        let mut text = raw.trim();
        text = text.strip_prefix("```json").unwrap_or(text);
        text = text.strip_prefix("```").unwrap_or(text);
        text = text.trim();
        text = text.strip_suffix("```").unwrap_or(text);
        let text = text.trim();

        let mut intent: ExpenseIntent = serde_json::from_str(text)
            .map_err(|e| QueryError::MalformedIntent(format!("{e} (response: {text})")))?;

        intent.confidence = intent.confidence.clamp(0.0, 1.0);
        if !intent.category.is_empty() && !INTENT_CATEGORIES.contains(&intent.category.as_str()) {
            intent.category.clear();
        }
        Ok(intent)
    }
}
