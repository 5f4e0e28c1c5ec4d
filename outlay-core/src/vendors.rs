//! Built-in vendor → category lookup table.
//!
//! Loaded once and injected; never mutated after construction. The table is
//! the first two steps of the categorization chain: exact match on the
//! lowercased vendor, then substring match in either direction. Substring
//! iteration order over a HashMap is unspecified, so when several entries
//! could match the same vendor the winner is implementation-defined.

use std::collections::HashMap;

/// Immutable vendor → category configuration.
#[derive(Debug, Clone)]
pub struct VendorTable {
    entries: HashMap<String, String>,
}

impl VendorTable {
    /// The built-in mapping. Keys are lowercased vendor fragments as they
    /// appear in bank notifications.
    pub fn builtin() -> Self {
        let entries = [
            // Food & dining
            ("zomato", "Food"),
            ("swiggy", "Food"),
            ("dominos", "Food"),
            ("mcdonalds", "Food"),
            ("kfc", "Food"),
            ("subway", "Food"),
            ("pizza hut", "Food"),
            ("burger king", "Food"),
            ("dunkin", "Food"),
            ("starbucks", "Food"),
            ("cafe coffee day", "Food"),
            ("barbeque nation", "Food"),
            ("haldirams", "Food"),
            ("blinkit", "Food"),
            ("zepto", "Food"),
            ("dineout", "Food"),
            ("licious", "Food"),
            // Transportation
            ("flight", "Travel"),
            ("airbnb", "Travel"),
            ("uber", "Travel"),
            ("ola", "Travel"),
            ("rapido", "Travel"),
            ("metro", "Travel"),
            ("irctc", "Travel"),
            ("makemytrip", "Travel"),
            ("goibibo", "Travel"),
            ("cleartrip", "Travel"),
            ("redbus", "Travel"),
            ("petrol pump", "Travel"),
            ("shell", "Travel"),
            ("indian oil", "Travel"),
            ("bharat petroleum", "Travel"),
            // Shopping; amazon is a manual special case with its own label
            ("amazon", "Amazon"),
            ("flipkart", "Shopping"),
            ("myntra", "Shopping"),
            ("ajio", "Shopping"),
            ("nykaa", "Shopping"),
            ("reliance", "Shopping"),
            ("big bazaar", "Shopping"),
            ("dmart", "Shopping"),
            ("lifestyle", "Shopping"),
            ("pantaloons", "Shopping"),
            ("westside", "Shopping"),
            // Entertainment
            ("netflix", "Entertainment"),
            ("amazon prime", "Entertainment"),
            ("disney hotstar", "Entertainment"),
            ("sony liv", "Entertainment"),
            ("zee5", "Entertainment"),
            ("bookmyshow", "Entertainment"),
            ("paytm movies", "Entertainment"),
            ("pvr", "Entertainment"),
            ("inox", "Entertainment"),
            // Utilities
            ("electricity", "Bills"),
            ("broadband", "Bills"),
            ("jio", "Bills"),
            ("airtel", "Bills"),
            ("vodafone", "Bills"),
            ("bsnl", "Bills"),
            ("wifi", "Bills"),
            // Healthcare
            ("apollo", "Healthcare"),
            ("fortis", "Healthcare"),
            ("manipal", "Healthcare"),
            ("pharmeasy", "Healthcare"),
            ("netmeds", "Healthcare"),
            ("1mg", "Healthcare"),
            ("medplus", "Healthcare"),
            // Finance
            ("sip", "Other"),
            ("mutual fund", "Other"),
            ("insurance", "Bills"),
            ("lic", "Bills"),
            ("hdfc life", "Bills"),
            ("icici prudential", "Bills"),
            ("bescom", "Bills"),
        ]
        .into_iter()
        .map(|(v, c)| (v.to_string(), c.to_string()))
        .collect();
        Self { entries }
    }

    /// Build a table from explicit entries. Keys are lowercased.
    pub fn from_entries<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let entries = entries
            .into_iter()
            .map(|(k, v)| (k.into().to_lowercase(), v.into()))
            .collect();
        Self { entries }
    }

    /// An empty table (categorization falls straight through to the cache).
    pub fn empty() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    /// Exact match on an already-lowercased vendor.
    pub fn exact(&self, vendor_lower: &str) -> Option<&str> {
        self.entries.get(vendor_lower).map(String::as_str)
    }

    /// Substring match in either direction: the vendor contains a table key,
    /// or a table key contains the vendor. First hit in iteration order wins.
    pub fn partial(&self, vendor_lower: &str) -> Option<&str> {
        for (key, category) in &self.entries {
            if vendor_lower.contains(key.as_str()) || key.contains(vendor_lower) {
                return Some(category);
            }
        }
        None
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for VendorTable {
    fn default() -> Self {
        Self::builtin()
    }
}
