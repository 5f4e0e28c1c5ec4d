//! Account-to-account debit notification.
//!
//! Expected body:
//!   "Your A/c XX5678 is debited for INR 3,000.00 on 05-01-26 and
//!    A/c XX9012 is credited."
//!
//! There is no vendor in this grammar; the category is the fixed Transfer
//! tag and the categorizer is never consulted.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use regex::Regex;
use tracing::debug;

use outlay_core::{TransactionKind, CATEGORY_TRANSFER};

use super::{parse_amount, Extraction};

pub fn extract(text: &str, _received: DateTime<Utc>) -> Option<Extraction> {
    let re = Regex::new(concat!(
        r"Your A/c (?P<debited>\w+) is debited for INR (?P<amount>[\d,\.]+) on ",
        r"(?P<date>\d{2}-\d{2}-\d{2}) and A/c (?P<credited>\w+) is credited"
    ))
    .expect("pattern compiles");

    let caps = re.captures(text)?;
    let amount = parse_amount(&caps["amount"])?;

    let date = match NaiveDate::parse_from_str(&caps["date"], "%d-%m-%y") {
        Ok(d) => d,
        Err(e) => {
            debug!("transfer date '{}' did not parse: {e}", &caps["date"]);
            return None;
        }
    };

    Some(Extraction {
        kind: TransactionKind::HdfcBankTransfer,
        card_ending: None,
        debited_account: Some(caps["debited"].to_string()),
        credited_account: Some(caps["credited"].to_string()),
        amount,
        vendor: String::new(),
        date_time: date.and_time(NaiveTime::MIN).and_utc(),
        fixed_category: Some(CATEGORY_TRANSFER),
    })
}
