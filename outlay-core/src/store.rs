//! Persistence capability.
//!
//! The pipeline treats storage as an append-only sink for transactions and a
//! full-scan source for queries; there is no query-by-range, and the vendor
//! cache is a plain upsert keyed by lowercased vendor. Backends are selected
//! at composition time by handing the right implementation to the pipeline.

use std::collections::HashMap;
use std::sync::Mutex;

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::model::{CategoryMapping, Transaction};

/// An email body that matched no extractor, kept for later inspection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnparsedEmail {
    pub body: String,
    #[serde(default)]
    pub headers: HashMap<String, String>,
}

pub trait ExpenseStore: Send + Sync {
    fn save_transaction(&self, tx: &Transaction) -> Result<()>;

    fn fetch_all_transactions(&self) -> Result<Vec<Transaction>>;

    fn save_unparsed_email(&self, body: &str, headers: &HashMap<String, String>) -> Result<()>;

    /// Lookup by vendor; the key is lowercased before the read.
    fn get_category_mapping(&self, vendor: &str) -> Result<Option<CategoryMapping>>;

    /// Upsert by lowercased vendor: at most one mapping per vendor survives.
    fn save_category_mapping(&self, mapping: &CategoryMapping) -> Result<()>;
}

#[derive(Default)]
struct MemoryInner {
    transactions: Vec<Transaction>,
    mappings: HashMap<String, CategoryMapping>,
    unparsed: Vec<UnparsedEmail>,
}

/// In-memory store used in tests and anywhere a durable backend is not
/// wired up.
#[derive(Default)]
pub struct MemoryStore {
    inner: Mutex<MemoryInner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Unparsed bodies captured so far (test/debug accessor).
    pub fn unparsed(&self) -> Vec<UnparsedEmail> {
        self.inner.lock().expect("store lock").unparsed.clone()
    }
}

impl ExpenseStore for MemoryStore {
    fn save_transaction(&self, tx: &Transaction) -> Result<()> {
        self.inner
            .lock()
            .expect("store lock")
            .transactions
            .push(tx.clone());
        Ok(())
    }

    fn fetch_all_transactions(&self) -> Result<Vec<Transaction>> {
        Ok(self.inner.lock().expect("store lock").transactions.clone())
    }

    fn save_unparsed_email(&self, body: &str, headers: &HashMap<String, String>) -> Result<()> {
        self.inner
            .lock()
            .expect("store lock")
            .unparsed
            .push(UnparsedEmail {
                body: body.to_string(),
                headers: headers.clone(),
            });
        Ok(())
    }

    fn get_category_mapping(&self, vendor: &str) -> Result<Option<CategoryMapping>> {
        let key = vendor.to_lowercase();
        Ok(self
            .inner
            .lock()
            .expect("store lock")
            .mappings
            .get(&key)
            .cloned())
    }

    fn save_category_mapping(&self, mapping: &CategoryMapping) -> Result<()> {
        let key = mapping.vendor.to_lowercase();
        self.inner
            .lock()
            .expect("store lock")
            .mappings
            .insert(key, mapping.clone());
        Ok(())
    }
}
