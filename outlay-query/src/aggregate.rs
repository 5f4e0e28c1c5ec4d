//! Deterministic numeric aggregation over the transaction store.
//!
//! Every operation fetches the full transaction list and filters in memory
//! to the inclusive UTC range the period resolves to; the store is never
//! asked to filter. All operations are read-only and reproducible given the
//! same store contents and `now`.

use std::collections::{BTreeMap, HashMap};

use anyhow::{bail, Result};
use chrono::{DateTime, Datelike, Months, NaiveDate, NaiveTime, Utc};
use tracing::debug;

use outlay_core::{ExpenseStore, Period, Transaction};

use crate::results::{
    AnomalyReport, CategorySpendResult, ComparisonResult, SpendResult, TopMerchantsResult,
};

pub struct Aggregator<'a> {
    store: &'a dyn ExpenseStore,
    now: DateTime<Utc>,
}

impl<'a> Aggregator<'a> {
    pub fn new(store: &'a dyn ExpenseStore) -> Self {
        Self::at(store, Utc::now())
    }

    /// Aggregate relative to a fixed instant. Period resolution and the
    /// monthly-trend window both derive from `now`.
    pub fn at(store: &'a dyn ExpenseStore, now: DateTime<Utc>) -> Self {
        Self { store, now }
    }

    fn in_range(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Vec<Transaction>> {
        let all = self.store.fetch_all_transactions()?;
        let filtered: Vec<Transaction> = all
            .into_iter()
            .filter(|tx| tx.date_time >= start && tx.date_time <= end)
            .collect();
        debug!(
            "{} transactions in range {} .. {}",
            filtered.len(),
            start.to_rfc3339(),
            end.to_rfc3339()
        );
        Ok(filtered)
    }

    fn in_period(&self, period: Period) -> Result<Vec<Transaction>> {
        let (start, end) = period.resolve_at(self.now);
        self.in_range(start, end)
    }

    pub fn total_spend(&self, period: Period) -> Result<SpendResult> {
        let transactions = self.in_period(period)?;
        let total_spent = transactions.iter().map(|tx| tx.amount).sum();
        Ok(SpendResult {
            period: period.to_string(),
            total_spent,
        })
    }

    /// Sum and per-transaction average for one category. Category match is
    /// case-sensitive: category strings are canonical, not normalized here.
    pub fn category_spend(&self, category: &str, period: Period) -> Result<CategorySpendResult> {
        if category.is_empty() {
            bail!("category is required");
        }
        let transactions = self.in_period(period)?;

        let mut total_spent = 0.0;
        let mut count = 0u32;
        for tx in &transactions {
            if tx.category == category {
                total_spent += tx.amount;
                count += 1;
            }
        }
        let average = if count > 0 {
            total_spent / f64::from(count)
        } else {
            0.0
        };

        Ok(CategorySpendResult {
            category: category.to_string(),
            period: period.to_string(),
            total_spent,
            average,
        })
    }

    /// Independent sums for two category labels over the same window,
    /// returned as a label → sum map with the two keys.
    pub fn compare_categories(
        &self,
        c1: &str,
        c2: &str,
        period: Period,
    ) -> Result<HashMap<String, f64>> {
        if c1.is_empty() || c2.is_empty() {
            bail!("both categories are required");
        }
        let transactions = self.in_period(period)?;

        let mut total1 = 0.0;
        let mut total2 = 0.0;
        for tx in &transactions {
            if tx.category == c1 {
                total1 += tx.amount;
            } else if tx.category == c2 {
                total2 += tx.amount;
            }
        }

        let mut result = HashMap::new();
        result.insert(c1.to_string(), total1);
        result.insert(c2.to_string(), total2);
        Ok(result)
    }

    /// Totals over two independently resolved windows plus the percent
    /// change from the first to the second.
    pub fn compare_periods(&self, p1: Period, p2: Period) -> Result<ComparisonResult> {
        let amount1: f64 = self.in_period(p1)?.iter().map(|tx| tx.amount).sum();
        let amount2: f64 = self.in_period(p2)?.iter().map(|tx| tx.amount).sum();

        let delta_percent = if amount1 > 0.0 {
            (amount2 - amount1) / amount1 * 100.0
        } else if amount2 > 0.0 {
            // nothing in the base period: call it a 100% increase
            100.0
        } else {
            0.0
        };

        Ok(ComparisonResult {
            base_period: p1.to_string(),
            compare_period: p2.to_string(),
            base_amount: amount1,
            compare_amount: amount2,
            delta_percent,
        })
    }

    /// Top merchants by summed spending. Transactions without a vendor
    /// (pure transfers) are excluded. Ties land in whichever order the
    /// grouping map yields them; callers must not rely on it.
    pub fn top_merchants(&self, period: Period, limit: usize) -> Result<TopMerchantsResult> {
        let limit = if limit == 0 { 10 } else { limit };
        let transactions = self.in_period(period)?;

        let mut totals: HashMap<String, f64> = HashMap::new();
        for tx in &transactions {
            if !tx.vendor.is_empty() {
                *totals.entry(tx.vendor.clone()).or_insert(0.0) += tx.amount;
            }
        }

        let mut sorted: Vec<(String, f64)> = totals.into_iter().collect();
        sorted.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
        sorted.truncate(limit);

        Ok(TopMerchantsResult {
            period: period.to_string(),
            merchants: sorted.into_iter().collect(),
        })
    }

    /// Spending summed per calendar day, keyed `YYYY-MM-DD`.
    pub fn daily_trend(&self, period: Period) -> Result<BTreeMap<String, f64>> {
        let transactions = self.in_period(period)?;
        let mut buckets = BTreeMap::new();
        for tx in &transactions {
            let key = tx.date_time.format("%Y-%m-%d").to_string();
            *buckets.entry(key).or_insert(0.0) += tx.amount;
        }
        Ok(buckets)
    }

    /// Spending summed per calendar month, keyed `YYYY-MM`. Ignores the
    /// period resolver: the window runs from the first day of the month
    /// `months` months before the current month, through now.
    pub fn monthly_trend(&self, months: u32) -> Result<BTreeMap<String, f64>> {
        let months = if months == 0 { 12 } else { months };

        let first_of_this_month = self
            .now
            .date_naive()
            .with_day(1)
            .expect("day 1 exists in every month");
        let start_date = first_of_this_month
            .checked_sub_months(Months::new(months))
            .unwrap_or(NaiveDate::MIN);
        let start = start_date.and_time(NaiveTime::MIN).and_utc();

        let transactions = self.in_range(start, self.now)?;
        let mut buckets = BTreeMap::new();
        for tx in &transactions {
            let key = format!("{:04}-{:02}", tx.date_time.year(), tx.date_time.month());
            *buckets.entry(key).or_insert(0.0) += tx.amount;
        }
        Ok(buckets)
    }

    /// Transactions whose amount exceeds `max(mean + 2*stddev, 2*mean)` over
    /// the period, with the statistics that produced the cut. Standard
    /// deviation is the population form and zero for fewer than two
    /// transactions. An empty window yields the zero-valued report.
    pub fn anomalies(&self, period: Period) -> Result<AnomalyReport> {
        let transactions = self.in_period(period)?;

        if transactions.is_empty() {
            return Ok(AnomalyReport {
                period: period.to_string(),
                average: 0.0,
                threshold: 0.0,
                anomaly_count: 0,
                anomalies: Vec::new(),
            });
        }

        let count = transactions.len() as f64;
        let total: f64 = transactions.iter().map(|tx| tx.amount).sum();
        let average = total / count;

        let variance = if transactions.len() > 1 {
            transactions
                .iter()
                .map(|tx| {
                    let diff = tx.amount - average;
                    diff * diff
                })
                .sum::<f64>()
                / count
        } else {
            0.0
        };
        let std_dev = variance.sqrt();

        let mut threshold = average + 2.0 * std_dev;
        if threshold < average * 2.0 {
            // low-variance floor: never flag anything under twice the mean
            threshold = average * 2.0;
        }

        let anomalies: Vec<Transaction> = transactions
            .into_iter()
            .filter(|tx| tx.amount > threshold)
            .collect();

        Ok(AnomalyReport {
            period: period.to_string(),
            average,
            threshold,
            anomaly_count: anomalies.len(),
            anomalies,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use outlay_core::{MemoryStore, TransactionKind};

    fn fixed_now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 8, 7, 12, 0, 0).unwrap()
    }

    fn tx(amount: f64, category: &str, vendor: &str, date_time: DateTime<Utc>) -> Transaction {
        Transaction {
            kind: TransactionKind::HdfcCreditCard,
            card_ending: Some("4207".to_string()),
            debited_account: None,
            credited_account: None,
            amount,
            vendor: vendor.to_string(),
            date_time,
            category: category.to_string(),
        }
    }

    fn aug(day: u32, hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 8, day, hour, 0, 0).unwrap()
    }

    fn jul(day: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 7, day, 10, 0, 0).unwrap()
    }

    fn seeded_store() -> MemoryStore {
        let store = MemoryStore::new();
        store.save_transaction(&tx(100.0, "Food", "ZOMATO", aug(5, 9))).unwrap();
        store.save_transaction(&tx(50.0, "Food", "SWIGGY", aug(6, 13))).unwrap();
        store.save_transaction(&tx(200.0, "Travel", "UBER", aug(5, 18))).unwrap();
        store
    }

    #[test]
    fn test_total_spend() {
        let store = seeded_store();
        let agg = Aggregator::at(&store, fixed_now());
        let result = agg.total_spend(Period::ThisMonth).unwrap();
        assert_eq!(result.total_spent, 350.0);
        assert_eq!(result.period, "THIS_MONTH");
    }

    #[test]
    fn test_total_spend_excludes_outside_range() {
        let store = seeded_store();
        store.save_transaction(&tx(999.0, "Food", "OLD", jul(15))).unwrap();
        let agg = Aggregator::at(&store, fixed_now());
        assert_eq!(agg.total_spend(Period::ThisMonth).unwrap().total_spent, 350.0);
    }

    #[test]
    fn test_range_is_inclusive_at_period_start() {
        let store = MemoryStore::new();
        let start_of_month = Utc.with_ymd_and_hms(2026, 8, 1, 0, 0, 0).unwrap();
        store.save_transaction(&tx(10.0, "Food", "V", start_of_month)).unwrap();
        let agg = Aggregator::at(&store, fixed_now());
        assert_eq!(agg.total_spend(Period::ThisMonth).unwrap().total_spent, 10.0);
    }

    #[test]
    fn test_category_spend_sum_and_average() {
        let store = seeded_store();
        let agg = Aggregator::at(&store, fixed_now());
        let result = agg.category_spend("Food", Period::ThisMonth).unwrap();
        assert_eq!(result.total_spent, 150.0);
        assert_eq!(result.average, 75.0);
    }

    #[test]
    fn test_category_spend_is_case_sensitive() {
        let store = seeded_store();
        let agg = Aggregator::at(&store, fixed_now());
        let result = agg.category_spend("food", Period::ThisMonth).unwrap();
        assert_eq!(result.total_spent, 0.0);
        assert_eq!(result.average, 0.0);
    }

    #[test]
    fn test_category_spend_requires_category() {
        let store = seeded_store();
        let agg = Aggregator::at(&store, fixed_now());
        assert!(agg.category_spend("", Period::ThisMonth).is_err());
    }

    #[test]
    fn test_compare_categories() {
        let store = seeded_store();
        let agg = Aggregator::at(&store, fixed_now());
        let result = agg
            .compare_categories("Food", "Travel", Period::ThisMonth)
            .unwrap();
        assert_eq!(result.len(), 2);
        assert_eq!(result["Food"], 150.0);
        assert_eq!(result["Travel"], 200.0);
    }

    #[test]
    fn test_compare_periods_delta_from_empty_base() {
        let store = MemoryStore::new();
        store.save_transaction(&tx(500.0, "Food", "V", aug(3, 10))).unwrap();
        let agg = Aggregator::at(&store, fixed_now());
        let result = agg
            .compare_periods(Period::LastMonth, Period::ThisMonth)
            .unwrap();
        assert_eq!(result.base_amount, 0.0);
        assert_eq!(result.compare_amount, 500.0);
        assert_eq!(result.delta_percent, 100.0);
    }

    #[test]
    fn test_compare_periods_delta_percent() {
        let store = MemoryStore::new();
        store.save_transaction(&tx(200.0, "Food", "V", jul(10))).unwrap();
        store.save_transaction(&tx(300.0, "Food", "V", aug(3, 10))).unwrap();
        let agg = Aggregator::at(&store, fixed_now());
        let result = agg
            .compare_periods(Period::LastMonth, Period::ThisMonth)
            .unwrap();
        assert!((result.delta_percent - 50.0).abs() < 1e-9);
    }

    #[test]
    fn test_compare_periods_both_empty() {
        let store = MemoryStore::new();
        let agg = Aggregator::at(&store, fixed_now());
        let result = agg
            .compare_periods(Period::LastMonth, Period::ThisMonth)
            .unwrap();
        assert_eq!(result.delta_percent, 0.0);
    }

    #[test]
    fn test_top_merchants_limit_and_exclusions() {
        let store = MemoryStore::new();
        store.save_transaction(&tx(300.0, "Food", "A", aug(2, 9))).unwrap();
        store.save_transaction(&tx(150.0, "Food", "B", aug(2, 10))).unwrap();
        store.save_transaction(&tx(50.0, "Food", "B", aug(3, 10))).unwrap();
        store.save_transaction(&tx(100.0, "Food", "C", aug(4, 10))).unwrap();
        // a transfer has no vendor and never ranks
        let mut transfer = tx(9999.0, "Transfer", "", aug(4, 12));
        transfer.kind = TransactionKind::HdfcBankTransfer;
        store.save_transaction(&transfer).unwrap();

        let agg = Aggregator::at(&store, fixed_now());
        let result = agg.top_merchants(Period::ThisMonth, 2).unwrap();
        assert_eq!(result.merchants.len(), 2);
        assert_eq!(result.merchants["A"], 300.0);
        assert_eq!(result.merchants["B"], 200.0);
        assert!(!result.merchants.contains_key("C"));
        assert!(!result.merchants.contains_key(""));
    }

    #[test]
    fn test_top_merchants_zero_limit_defaults_to_ten() {
        let store = MemoryStore::new();
        for i in 0..12 {
            let vendor = format!("V{i}");
            store
                .save_transaction(&tx(10.0 + i as f64, "Food", &vendor, aug(2, 9)))
                .unwrap();
        }
        let agg = Aggregator::at(&store, fixed_now());
        let result = agg.top_merchants(Period::ThisMonth, 0).unwrap();
        assert_eq!(result.merchants.len(), 10);
    }

    #[test]
    fn test_daily_trend_buckets() {
        let store = seeded_store();
        let agg = Aggregator::at(&store, fixed_now());
        let trend = agg.daily_trend(Period::ThisMonth).unwrap();
        assert_eq!(trend["2026-08-05"], 300.0);
        assert_eq!(trend["2026-08-06"], 50.0);
        assert_eq!(trend.len(), 2);
    }

    #[test]
    fn test_monthly_trend_window_and_buckets() {
        let store = MemoryStore::new();
        store.save_transaction(&tx(100.0, "Food", "V", jul(10))).unwrap();
        store.save_transaction(&tx(40.0, "Food", "V", aug(3, 9))).unwrap();
        store
            .save_transaction(&tx(999.0, "Food", "V", Utc.with_ymd_and_hms(2026, 5, 20, 9, 0, 0).unwrap()))
            .unwrap();

        let agg = Aggregator::at(&store, fixed_now());
        // two months back from August: window starts June 1, May is out
        let trend = agg.monthly_trend(2).unwrap();
        assert_eq!(trend.get("2026-05"), None);
        assert_eq!(trend["2026-07"], 100.0);
        assert_eq!(trend["2026-08"], 40.0);
    }

    #[test]
    fn test_anomaly_flags_outlier() {
        let store = MemoryStore::new();
        for _ in 0..5 {
            store.save_transaction(&tx(10.0, "Food", "V", aug(2, 9))).unwrap();
        }
        store.save_transaction(&tx(1000.0, "Shopping", "W", aug(3, 9))).unwrap();

        let agg = Aggregator::at(&store, fixed_now());
        let report = agg.anomalies(Period::ThisMonth).unwrap();
        assert_eq!(report.average, 175.0);
        assert!(report.threshold > 900.0 && report.threshold < 925.0);
        assert_eq!(report.anomaly_count, 1);
        assert_eq!(report.anomalies[0].amount, 1000.0);
    }

    #[test]
    fn test_anomaly_low_variance_floor_is_twice_the_mean() {
        let store = MemoryStore::new();
        for _ in 0..9 {
            store.save_transaction(&tx(100.0, "Food", "V", aug(2, 9))).unwrap();
        }
        store.save_transaction(&tx(201.0, "Food", "W", aug(3, 9))).unwrap();

        let agg = Aggregator::at(&store, fixed_now());
        let report = agg.anomalies(Period::ThisMonth).unwrap();
        // mean + 2σ would sit below 2*mean here, so the floor applies
        assert!((report.threshold - 2.0 * report.average).abs() < 1e-9);
        assert_eq!(report.anomaly_count, 0);
    }

    #[test]
    fn test_anomaly_single_transaction_has_zero_stddev() {
        let store = MemoryStore::new();
        store.save_transaction(&tx(100.0, "Food", "V", aug(2, 9))).unwrap();
        let agg = Aggregator::at(&store, fixed_now());
        let report = agg.anomalies(Period::ThisMonth).unwrap();
        assert_eq!(report.average, 100.0);
        assert_eq!(report.threshold, 200.0);
        assert!(report.anomalies.is_empty());
    }

    #[test]
    fn test_anomaly_empty_window_is_zero_valued() {
        let store = MemoryStore::new();
        let agg = Aggregator::at(&store, fixed_now());
        let report = agg.anomalies(Period::ThisMonth).unwrap();
        assert_eq!(report.average, 0.0);
        assert_eq!(report.threshold, 0.0);
        assert_eq!(report.anomaly_count, 0);
        assert!(report.anomalies.is_empty());
    }
}
