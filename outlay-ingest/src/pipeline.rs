//! Ingestion pipeline: run the extractor chain over one decoded email body,
//! categorize, and persist.
//!
//! Parse failure is the common case, not an error: bodies no extractor
//! claims go to the store's unparsed sink and the pipeline reports
//! [`IngestOutcome::Unparsed`].

use std::collections::HashMap;

use anyhow::Result;
use chrono::{DateTime, Utc};
use tracing::debug;

use outlay_classify::Categorizer;
use outlay_core::{ExpenseStore, Transaction};

use crate::extract::{self, Extraction};

/// What became of one email body.
#[derive(Debug, Clone, PartialEq)]
pub enum IngestOutcome {
    Saved(Transaction),
    Unparsed,
}

pub struct IngestPipeline<'a> {
    store: &'a dyn ExpenseStore,
    categorizer: Categorizer<'a>,
}

impl<'a> IngestPipeline<'a> {
    pub fn new(store: &'a dyn ExpenseStore, categorizer: Categorizer<'a>) -> Self {
        Self { store, categorizer }
    }

    pub fn process(&self, body: &str, headers: &HashMap<String, String>) -> Result<IngestOutcome> {
        self.process_at(body, headers, Utc::now())
    }

    /// Process one body with an explicit ingestion timestamp (stamps the
    /// formats whose grammar carries no date).
    pub fn process_at(
        &self,
        body: &str,
        headers: &HashMap<String, String>,
        received: DateTime<Utc>,
    ) -> Result<IngestOutcome> {
        let Some(extraction) = extract::extract_transaction(body, received) else {
            debug!("no known notification format matched; storing as unparsed");
            self.store.save_unparsed_email(body, headers)?;
            return Ok(IngestOutcome::Unparsed);
        };

        let tx = self.categorize(extraction);
        self.store.save_transaction(&tx)?;
        Ok(IngestOutcome::Saved(tx))
    }

    fn categorize(&self, ex: Extraction) -> Transaction {
        let category = match ex.fixed_category {
            Some(fixed) => fixed.to_string(),
            None => self.categorizer.categorize(&ex.vendor),
        };
        Transaction {
            kind: ex.kind,
            card_ending: ex.card_ending,
            debited_account: ex.debited_account,
            credited_account: ex.credited_account,
            amount: ex.amount,
            vendor: ex.vendor,
            date_time: ex.date_time,
            category,
        }
    }
}
