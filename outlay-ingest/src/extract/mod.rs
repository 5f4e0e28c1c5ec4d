//! Bank-notification extractors.
//!
//! One module per notification grammar. Each extractor is a pure function
//! from raw text to an [`Extraction`]; a pattern mismatch, a malformed
//! amount, or an unparseable date all mean "not mine" — the chain moves on
//! to the next format. Extraction never assigns a vendor category; that
//! happens in the pipeline, except for formats whose category is fixed by
//! the grammar itself (account transfers).

pub mod account_transfer;
pub mod hdfc_card;
pub mod icici_card;
pub mod imobile;
pub mod imps;

use chrono::{DateTime, Utc};
use tracing::debug;

use outlay_core::TransactionKind;

/// Fields captured from one notification, before categorization.
#[derive(Debug, Clone, PartialEq)]
pub struct Extraction {
    pub kind: TransactionKind,
    pub card_ending: Option<String>,
    pub debited_account: Option<String>,
    pub credited_account: Option<String>,
    pub amount: f64,
    pub vendor: String,
    pub date_time: DateTime<Utc>,
    /// Set when the grammar fixes the category (transfers); `None` means
    /// the categorizer decides.
    pub fixed_category: Option<&'static str>,
}

pub type ExtractFn = fn(&str, DateTime<Utc>) -> Option<Extraction>;

/// Extractors in priority order. First match wins; there is no merging.
pub const EXTRACTORS: &[(&str, ExtractFn)] = &[
    ("icici-credit-card", icici_card::extract),
    ("hdfc-credit-card", hdfc_card::extract),
    ("imobile-payment", imobile::extract),
    ("icici-imps", imps::extract),
    ("account-transfer", account_transfer::extract),
];

/// Run the chain over one email body. `received` stamps formats whose
/// grammar carries no timestamp.
pub fn extract_transaction(text: &str, received: DateTime<Utc>) -> Option<Extraction> {
    for (name, extract) in EXTRACTORS {
        if let Some(found) = extract(text, received) {
            debug!("matched {name} notification format");
            return Some(found);
        }
    }
    None
}

/// Strip thousands separators and parse as a decimal amount.
/// Malformed input is a mismatch for the calling extractor, never a crash.
pub(crate) fn parse_amount(raw: &str) -> Option<f64> {
    match raw.replace(',', "").parse::<f64>() {
        Ok(amount) if amount >= 0.0 => Some(amount),
        Ok(amount) => {
            debug!("rejecting negative amount {amount}");
            None
        }
        Err(e) => {
            debug!("amount '{raw}' did not parse: {e}");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_amount_strips_thousands_separators() {
        assert_eq!(parse_amount("1,234.50"), Some(1234.50));
        assert_eq!(parse_amount("304.00"), Some(304.0));
        assert_eq!(parse_amount("12,34,567.89"), Some(1234567.89));
    }

    #[test]
    fn test_parse_amount_rejects_garbage() {
        assert_eq!(parse_amount("1.2.3"), None);
        assert_eq!(parse_amount("abc"), None);
        assert_eq!(parse_amount(""), None);
    }
}
