//! JSON-file-backed ledger store under ~/.outlay.
//!
//! Good enough for a single user's mailbox: the whole ledger loads at open
//! and is rewritten after every mutation. The store contract only asks for
//! append + full scan, which this satisfies trivially.

use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use std::sync::Mutex;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use outlay_core::{CategoryMapping, ExpenseStore, Transaction, UnparsedEmail};

pub fn outlay_home() -> Result<PathBuf> {
    let home = std::env::var("HOME").context("HOME is not set")?;
    Ok(PathBuf::from(home).join(".outlay"))
}

pub fn default_ledger_path() -> Result<PathBuf> {
    let dir = outlay_home()?;
    fs::create_dir_all(&dir).with_context(|| format!("create {}", dir.display()))?;
    Ok(dir.join("ledger.json"))
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct LedgerFile {
    #[serde(default)]
    transactions: Vec<Transaction>,
    #[serde(default)]
    mappings: HashMap<String, CategoryMapping>,
    #[serde(default)]
    unparsed: Vec<UnparsedEmail>,
}

pub struct JsonLedger {
    path: PathBuf,
    inner: Mutex<LedgerFile>,
}

impl JsonLedger {
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let inner = if path.exists() {
            let s =
                fs::read_to_string(&path).with_context(|| format!("read {}", path.display()))?;
            serde_json::from_str(&s).with_context(|| format!("parse {}", path.display()))?
        } else {
            LedgerFile::default()
        };
        Ok(Self {
            path,
            inner: Mutex::new(inner),
        })
    }

    fn persist(&self, inner: &LedgerFile) -> Result<()> {
        let json = serde_json::to_string_pretty(inner)?;
        fs::write(&self.path, json).with_context(|| format!("write {}", self.path.display()))?;
        Ok(())
    }
}

impl ExpenseStore for JsonLedger {
    fn save_transaction(&self, tx: &Transaction) -> Result<()> {
        let mut inner = self.inner.lock().expect("ledger lock");
        inner.transactions.push(tx.clone());
        self.persist(&inner)
    }

    fn fetch_all_transactions(&self) -> Result<Vec<Transaction>> {
        Ok(self.inner.lock().expect("ledger lock").transactions.clone())
    }

    fn save_unparsed_email(&self, body: &str, headers: &HashMap<String, String>) -> Result<()> {
        let mut inner = self.inner.lock().expect("ledger lock");
        inner.unparsed.push(UnparsedEmail {
            body: body.to_string(),
            headers: headers.clone(),
        });
        self.persist(&inner)
    }

    fn get_category_mapping(&self, vendor: &str) -> Result<Option<CategoryMapping>> {
        let key = vendor.to_lowercase();
        Ok(self
            .inner
            .lock()
            .expect("ledger lock")
            .mappings
            .get(&key)
            .cloned())
    }

    fn save_category_mapping(&self, mapping: &CategoryMapping) -> Result<()> {
        let mut inner = self.inner.lock().expect("ledger lock");
        inner
            .mappings
            .insert(mapping.vendor.to_lowercase(), mapping.clone());
        self.persist(&inner)
    }
}
