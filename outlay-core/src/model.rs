//! Record types for extracted transactions and cached vendor mappings.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The guaranteed fallback category. Every transaction carries a non-empty
/// category; this is what everything degrades to.
pub const CATEGORY_OTHER: &str = "Other";

/// Fixed tag for account-to-account transfers (no vendor to classify).
pub const CATEGORY_TRANSFER: &str = "Transfer";

/// Closed set the AI classifier is allowed to answer with. Anything else it
/// returns is coerced to "Other".
pub const AI_CATEGORIES: &[&str] = &[
    "Food",
    "Shopping",
    "Travel",
    "Entertainment",
    "Bills",
    "Healthcare",
    "Other",
];

/// Categories accepted on an incoming intent. Superset of [`AI_CATEGORIES`]:
/// the built-in table carries "Amazon" as a manual special case.
pub const INTENT_CATEGORIES: &[&str] = &[
    "Food",
    "Shopping",
    "Travel",
    "Entertainment",
    "Bills",
    "Healthcare",
    "Amazon",
    "Other",
];

/// Source notification format a transaction was extracted from.
/// The wire tags are stable; persisted records round-trip through them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TransactionKind {
    #[serde(rename = "HDFCCreditCard")]
    HdfcCreditCard,
    #[serde(rename = "HDFCBankTransfer")]
    HdfcBankTransfer,
    #[serde(rename = "ICICICreditCard")]
    IciciCreditCard,
    #[serde(rename = "ICICIBankTransfer")]
    IciciBankTransfer,
    #[serde(rename = "ICICIIMPS")]
    IciciImps,
}

/// One extracted transaction. Created by an extractor at ingestion time,
/// categorized exactly once, immutable thereafter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub kind: TransactionKind,
    /// Last digits of the card, where the format carries them.
    pub card_ending: Option<String>,
    pub debited_account: Option<String>,
    pub credited_account: Option<String>,
    /// Non-negative, currency-agnostic.
    pub amount: f64,
    /// Merchant/payee free text; empty for pure transfers.
    #[serde(default)]
    pub vendor: String,
    /// Parsed from the bank's local layout, compared in UTC.
    pub date_time: DateTime<Utc>,
    /// Always non-empty; "Other" at worst.
    pub category: String,
}

/// How a cached vendor mapping came to be.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MappingSource {
    #[serde(rename = "manual")]
    Manual,
    #[serde(rename = "ai")]
    Ai,
}

/// A cached vendor → category resolution. At most one per vendor; the key is
/// lowercased before every read or write.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryMapping {
    pub vendor: String,
    pub category: String,
    pub source: MappingSource,
    pub created: DateTime<Utc>,
}
