//! Vendor categorization: an ordered fallback chain with a write-back cache.
//!
//! Resolution order, first hit wins: empty-vendor short-circuit, exact table
//! match, substring table match, persistent cache, AI classifier (result
//! cached before returning), "Other". The chain is total — it always returns
//! a category, and classifier or cache failures only push resolution to the
//! next step.

use anyhow::Result;
use chrono::Utc;
use tracing::{debug, warn};

use outlay_core::{
    CategoryMapping, ExpenseStore, MappingSource, VendorTable, AI_CATEGORIES, CATEGORY_OTHER,
};

/// External classifier constrained to the closed category set.
pub trait VendorClassifier {
    fn classify_vendor(&self, vendor: &str) -> Result<String>;
}

/// Coerce a classifier answer into the closed set; anything else is "Other".
fn coerce_to_closed_set(raw: &str) -> String {
    let candidate = raw.trim();
    if AI_CATEGORIES.contains(&candidate) {
        candidate.to_string()
    } else {
        CATEGORY_OTHER.to_string()
    }
}

pub struct Categorizer<'a> {
    table: &'a VendorTable,
    store: Option<&'a dyn ExpenseStore>,
    classifier: Option<&'a dyn VendorClassifier>,
}

impl<'a> Categorizer<'a> {
    pub fn new(table: &'a VendorTable) -> Self {
        Self {
            table,
            store: None,
            classifier: None,
        }
    }

    pub fn with_store(mut self, store: &'a dyn ExpenseStore) -> Self {
        self.store = Some(store);
        self
    }

    pub fn with_classifier(mut self, classifier: &'a dyn VendorClassifier) -> Self {
        self.classifier = Some(classifier);
        self
    }

    /// Resolve a vendor to a category. Total: never fails, "Other" at worst.
    pub fn categorize(&self, vendor: &str) -> String {
        if vendor.is_empty() {
            return CATEGORY_OTHER.to_string();
        }
        let key = vendor.to_lowercase();

        // The chain as data: reordering the fallback is an edit here, not a
        // control-flow rewrite.
        let steps: [fn(&Self, &str, &str) -> Option<String>; 4] = [
            Self::table_exact,
            Self::table_partial,
            Self::cached,
            Self::classify,
        ];
        for step in steps {
            if let Some(category) = step(self, vendor, &key) {
                return category;
            }
        }
        CATEGORY_OTHER.to_string()
    }

    fn table_exact(&self, _vendor: &str, key: &str) -> Option<String> {
        self.table.exact(key).map(str::to_string)
    }

    fn table_partial(&self, _vendor: &str, key: &str) -> Option<String> {
        self.table.partial(key).map(str::to_string)
    }

    fn cached(&self, _vendor: &str, key: &str) -> Option<String> {
        let store = self.store?;
        match store.get_category_mapping(key) {
            Ok(found) => found.map(|m| m.category),
            Err(e) => {
                // cache unavailable is a miss, not a failure
                warn!("category cache lookup failed for '{key}': {e:#}");
                None
            }
        }
    }

    fn classify(&self, vendor: &str, key: &str) -> Option<String> {
        let classifier = self.classifier?;
        match classifier.classify_vendor(vendor) {
            Ok(raw) => {
                let category = coerce_to_closed_set(&raw);
                debug!("classified vendor '{vendor}' as '{category}'");
                if let Some(store) = self.store {
                    let mapping = CategoryMapping {
                        vendor: key.to_string(),
                        category: category.clone(),
                        source: MappingSource::Ai,
                        created: Utc::now(),
                    };
                    if let Err(e) = store.save_category_mapping(&mapping) {
                        warn!("failed to cache category for '{key}': {e:#}");
                    }
                }
                Some(category)
            }
            Err(e) => {
                warn!("vendor classification failed for '{vendor}': {e:#}");
                None
            }
        }
    }
}
