//! ICICI credit card notification.
//!
//! Expected body:
//!   "Dear Customer, ICICI Bank Credit Card XX7004 has been used for a
//!    transaction of INR 1,499.00 on Jan 15, 2026 at 14:30:45. Info:
//!    AMAZON PAY INDIA. The Available Credit Limit ..."

use chrono::{DateTime, NaiveDateTime, Utc};
use regex::Regex;
use tracing::debug;

use outlay_core::TransactionKind;

use super::{parse_amount, Extraction};

pub fn extract(text: &str, _received: DateTime<Utc>) -> Option<Extraction> {
    // Vendor capture stops at the first period followed by "The", i.e.
    // before "The Available Credit Limit".
    let re = Regex::new(concat!(
        r"ICICI Bank Credit Card (?P<card>\w+) has been used for a transaction of ",
        r"INR (?P<amount>[\d,\.]+) on (?P<date>[A-Za-z]+ \d{1,2}, \d{4}) at ",
        r"(?P<time>\d{2}:\d{2}:\d{2})\. Info: (?P<vendor>.+?)\.\s+The"
    ))
    .expect("pattern compiles");

    let caps = re.captures(text)?;
    let amount = parse_amount(&caps["amount"])?;

    let datetime = format!("{} {}", &caps["date"], &caps["time"]);
    let dt = match NaiveDateTime::parse_from_str(&datetime, "%b %d, %Y %H:%M:%S") {
        Ok(dt) => dt,
        Err(e) => {
            debug!("icici card datetime '{datetime}' did not parse: {e}");
            return None;
        }
    };

    Some(Extraction {
        kind: TransactionKind::IciciCreditCard,
        card_ending: Some(caps["card"].to_string()),
        debited_account: None,
        credited_account: None,
        amount,
        vendor: caps["vendor"].trim().to_string(),
        date_time: dt.and_utc(),
        fixed_category: None,
    })
}
