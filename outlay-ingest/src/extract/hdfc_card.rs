//! HDFC credit card notifications, two generations of the same alert.
//!
//! Current:
//!   "Rs.304.00 is debited from your HDFC Bank Credit Card ending 4207
//!    towards RAZORPAY LICIOUS on 09 Jan, 2026 at 16:28:26."
//! Legacy:
//!   "Credit Card ending 1234 for Rs 100.00 at VENDOR on 01-01-2024 12:00:00"

use chrono::{DateTime, NaiveDateTime, Utc};
use regex::Regex;
use tracing::debug;

use outlay_core::TransactionKind;

use super::{parse_amount, Extraction};

pub fn extract(text: &str, _received: DateTime<Utc>) -> Option<Extraction> {
    extract_current(text).or_else(|| extract_legacy(text))
}

fn extract_current(text: &str) -> Option<Extraction> {
    let re = Regex::new(concat!(
        r"Rs\.?(?P<amount>[\d,\.]+)\s+is\s+debited\s+from\s+your\s+HDFC\s+Bank\s+",
        r"Credit\s+Card\s+ending\s+(?P<card>\d+)\s+towards\s+(?P<vendor>.+?)\s+on\s+",
        r"(?P<date>\d{1,2}\s+[A-Za-z]{3},\s+\d{4})\s+at\s+(?P<time>\d{2}:\d{2}:\d{2})"
    ))
    .expect("pattern compiles");

    let caps = re.captures(text)?;
    let amount = parse_amount(&caps["amount"])?;

    let datetime = format!("{} {}", &caps["date"], &caps["time"]);
    let dt = match NaiveDateTime::parse_from_str(&datetime, "%d %b, %Y %H:%M:%S") {
        Ok(dt) => dt,
        Err(e) => {
            debug!("hdfc card datetime '{datetime}' did not parse: {e}");
            return None;
        }
    };

    Some(Extraction {
        kind: TransactionKind::HdfcCreditCard,
        card_ending: Some(caps["card"].to_string()),
        debited_account: None,
        credited_account: None,
        amount,
        vendor: caps["vendor"].trim().to_string(),
        date_time: dt.and_utc(),
        fixed_category: None,
    })
}

fn extract_legacy(text: &str) -> Option<Extraction> {
    let re = Regex::new(concat!(
        r"Credit Card ending (?P<card>\d+) for Rs (?P<amount>[\d,.]+) at ",
        r"(?P<vendor>.*?) on (?P<date>\d{2}-\d{2}-\d{4} \d{2}:\d{2}:\d{2})"
    ))
    .expect("pattern compiles");

    let caps = re.captures(text)?;
    let amount = parse_amount(&caps["amount"])?;

    let dt = match NaiveDateTime::parse_from_str(&caps["date"], "%d-%m-%Y %H:%M:%S") {
        Ok(dt) => dt,
        Err(e) => {
            debug!("hdfc legacy datetime '{}' did not parse: {e}", &caps["date"]);
            return None;
        }
    };

    Some(Extraction {
        kind: TransactionKind::HdfcCreditCard,
        card_ending: Some(caps["card"].to_string()),
        debited_account: None,
        credited_account: None,
        amount,
        vendor: caps["vendor"].trim().to_string(),
        date_time: dt.and_utc(),
        fixed_category: None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_current_format() {
        let body = "Dear Card Member, Rs.304.00 is debited from your HDFC Bank \
Credit Card ending 4207 towards RAZORPAY LICIOUS on 09 Jan, 2026 at 16:28:26. \
Authorization code: 05158P.";
        let ex = extract(body, Utc::now()).unwrap();
        assert_eq!(ex.kind, TransactionKind::HdfcCreditCard);
        assert_eq!(ex.card_ending.as_deref(), Some("4207"));
        assert_eq!(ex.amount, 304.0);
        assert_eq!(ex.vendor, "RAZORPAY LICIOUS");
        assert_eq!(
            ex.date_time,
            Utc.with_ymd_and_hms(2026, 1, 9, 16, 28, 26).unwrap()
        );
    }

    #[test]
    fn test_current_format_single_digit_day() {
        let body = "Rs.99.00 is debited from your HDFC Bank Credit Card ending 4207 \
towards NETFLIX on 3 Feb, 2026 at 08:01:12.";
        let ex = extract(body, Utc::now()).unwrap();
        assert_eq!(
            ex.date_time,
            Utc.with_ymd_and_hms(2026, 2, 3, 8, 1, 12).unwrap()
        );
    }

    #[test]
    fn test_legacy_format() {
        let body = "Credit Card ending 1234 for Rs 2,100.00 at BIG BAZAAR on 01-03-2024 12:00:00";
        let ex = extract(body, Utc::now()).unwrap();
        assert_eq!(ex.card_ending.as_deref(), Some("1234"));
        assert_eq!(ex.amount, 2100.0);
        assert_eq!(ex.vendor, "BIG BAZAAR");
        assert_eq!(
            ex.date_time,
            Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap()
        );
    }

    #[test]
    fn test_current_format_preferred_over_legacy() {
        // a body matching the current grammar must not fall through
        let body = "Rs.10.00 is debited from your HDFC Bank Credit Card ending 1111 \
towards ZOMATO on 01 Jan, 2026 at 10:00:00.";
        let ex = extract(body, Utc::now()).unwrap();
        assert_eq!(ex.vendor, "ZOMATO");
    }

    #[test]
    fn test_amount_with_letters_is_a_mismatch() {
        let body = "Credit Card ending 1234 for Rs 1..0 at SHOP on 01-03-2024 12:00:00";
        assert!(extract(body, Utc::now()).is_none());
    }
}
