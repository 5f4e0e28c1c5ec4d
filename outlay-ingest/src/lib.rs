//! outlay-ingest: bank-notification extractors and the ingestion pipeline.

pub mod extract;
pub mod pipeline;

pub use extract::{extract_transaction, Extraction};
pub use pipeline::{IngestOutcome, IngestPipeline};
