//! ICICI IMPS payment notification.
//!
//! Expected body:
//!   "You have made an online IMPS payment of Rs 12,000.00 towards RENT
//!    PAYMENT on Jan 05, 2026 at 02:30 p.m. from your Savings Account XX1234"
//!
//! The time is 12-hour with an "a.m./p.m." suffix and must be shifted by
//! hand: p.m. adds 12 unless the hour already reads 12, so 12 p.m. stays 12
//! and 1 p.m. becomes 13. a.m. is taken as-is.

use chrono::{DateTime, NaiveDateTime, Utc};
use regex::Regex;
use tracing::debug;

use outlay_core::TransactionKind;

use super::{parse_amount, Extraction};

pub fn extract(text: &str, _received: DateTime<Utc>) -> Option<Extraction> {
    let re = Regex::new(concat!(
        r"You have made an online IMPS payment of Rs (?P<amount>[\d,\.]+) towards ",
        r"(?P<payee>.+) on (?P<date>[A-Za-z]+ \d{2}, \d{4}) at (?P<time>\d{2}:\d{2}) ",
        r"(?P<ampm>a\.m\.|p\.m\.) from your .* Account (?P<account>\w+)"
    ))
    .expect("pattern compiles");

    let caps = re.captures(text)?;
    let amount = parse_amount(&caps["amount"])?;

    let mut time = caps["time"].to_string();
    if &caps["ampm"] == "p.m." && !time.starts_with("12") {
        let (hour, minute) = time.split_once(':')?;
        let hour: u32 = hour.parse().ok()?;
        time = format!("{:02}:{minute}", hour + 12);
    }

    let datetime = format!("{} {}", &caps["date"], time);
    let dt = match NaiveDateTime::parse_from_str(&datetime, "%b %d, %Y %H:%M") {
        Ok(dt) => dt,
        Err(e) => {
            debug!("imps datetime '{datetime}' did not parse: {e}");
            return None;
        }
    };

    Some(Extraction {
        kind: TransactionKind::IciciImps,
        card_ending: None,
        debited_account: Some(caps["account"].to_string()),
        credited_account: None,
        amount,
        vendor: caps["payee"].trim().to_string(),
        date_time: dt.and_utc(),
        fixed_category: None,
    })
}
