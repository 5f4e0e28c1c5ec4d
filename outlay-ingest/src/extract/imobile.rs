//! iMobile card/bill payment notification.
//!
//! Expected body:
//!   "... payment of INR 5,000.00 using iMobile towards CREDITCARD from your
//!    Account XX1234 ..."
//!
//! This grammar carries no timestamp; the record is stamped with the
//! ingestion time supplied by the pipeline.

use chrono::{DateTime, Utc};
use regex::Regex;

use outlay_core::TransactionKind;

use super::{parse_amount, Extraction};

pub fn extract(text: &str, received: DateTime<Utc>) -> Option<Extraction> {
    let re = Regex::new(
        r"payment of [₹INR ]*(?P<amount>[\d,\.]+) using iMobile towards (?P<payee>\w+) from your Account (?P<account>\w+)",
    )
    .expect("pattern compiles");

    let caps = re.captures(text)?;
    let amount = parse_amount(&caps["amount"])?;

    Some(Extraction {
        kind: TransactionKind::IciciBankTransfer,
        card_ending: None,
        debited_account: Some(caps["account"].to_string()),
        credited_account: None,
        amount,
        vendor: caps["payee"].to_string(),
        date_time: received,
        fixed_category: None,
    })
}
