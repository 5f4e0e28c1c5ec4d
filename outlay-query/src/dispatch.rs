//! Intent dispatch: validate, then route to the aggregation engine.
//!
//! Validation runs before any store access so a malformed query can never
//! silently aggregate over a defaulted category. Only the period defaults
//! (THIS_MONTH); categories and vendors never do.

use anyhow::Result;
use chrono::{DateTime, Utc};

use outlay_core::{ExpenseIntent, ExpenseStore, IntentType, Period, QueryError};

use crate::aggregate::Aggregator;
use crate::results::AggregationOutcome;

/// Category for CATEGORY_SUMMARY: the direct field, falling back to the
/// parameters map.
fn summary_category(intent: &ExpenseIntent) -> String {
    if !intent.category.is_empty() {
        intent.category.clone()
    } else {
        intent.param("category").to_string()
    }
}

/// Categories for CATEGORY_COMPARISON: `category1`/`category2` parameters,
/// with the direct category field standing in for the first when absent.
fn comparison_categories(intent: &ExpenseIntent) -> (String, String) {
    let mut c1 = intent.param("category1").to_string();
    let c2 = intent.param("category2").to_string();
    if c1.is_empty() && !intent.category.is_empty() {
        c1 = intent.category.clone();
    }
    (c1, c2)
}

fn validate(intent: &ExpenseIntent) -> Result<(), QueryError> {
    match intent.intent_type {
        IntentType::CategorySummary => {
            if summary_category(intent).is_empty() {
                return Err(QueryError::MissingCategory);
            }
        }
        IntentType::CategoryComparison => {
            let (c1, c2) = comparison_categories(intent);
            if c1.is_empty() || c2.is_empty() {
                return Err(QueryError::MissingComparisonCategories);
            }
        }
        IntentType::PeriodComparison => {
            if intent.param("period1").is_empty() || intent.param("period2").is_empty() {
                return Err(QueryError::MissingComparisonPeriods);
            }
        }
        _ => {}
    }
    Ok(())
}

pub fn dispatch(intent: &ExpenseIntent, store: &dyn ExpenseStore) -> Result<AggregationOutcome> {
    dispatch_at(intent, store, Utc::now())
}

/// Route a validated intent against a fixed instant.
pub fn dispatch_at(
    intent: &ExpenseIntent,
    store: &dyn ExpenseStore,
    now: DateTime<Utc>,
) -> Result<AggregationOutcome> {
    validate(intent)?;

    let agg = Aggregator::at(store, now);
    let period = intent.period.unwrap_or(Period::ThisMonth);

    match intent.intent_type {
        IntentType::TotalSpend => Ok(AggregationOutcome::Spend(agg.total_spend(period)?)),

        IntentType::CategorySummary => {
            let category = summary_category(intent);
            Ok(AggregationOutcome::CategorySpend(
                agg.category_spend(&category, period)?,
            ))
        }

        IntentType::CategoryComparison => {
            let (c1, c2) = comparison_categories(intent);
            Ok(AggregationOutcome::CategoryComparison(
                agg.compare_categories(&c1, &c2, period)?,
            ))
        }

        IntentType::PeriodComparison => {
            let p1: Period = intent.param("period1").parse()?;
            let p2: Period = intent.param("period2").parse()?;
            Ok(AggregationOutcome::PeriodComparison(
                agg.compare_periods(p1, p2)?,
            ))
        }

        IntentType::TopMerchants => Ok(AggregationOutcome::TopMerchants(
            agg.top_merchants(period, 10)?,
        )),

        IntentType::DailyTrend => Ok(AggregationOutcome::Trend(agg.daily_trend(period)?)),

        IntentType::MonthlyTrend => {
            let months = intent.param("months").parse().unwrap_or(12);
            Ok(AggregationOutcome::Trend(agg.monthly_trend(months)?))
        }

        IntentType::AnomalyExplanation => {
            Ok(AggregationOutcome::Anomalies(agg.anomalies(period)?))
        }

        // no budget definitions to compare against; answer with the total
        IntentType::BudgetStatus | IntentType::GeneralInsight => {
            Ok(AggregationOutcome::Spend(agg.total_spend(period)?))
        }
    }
}
