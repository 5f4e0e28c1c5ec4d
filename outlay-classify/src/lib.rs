//! outlay-classify: vendor categorization fallback chain and the LLM client
//! used for vendor and intent classification.

pub mod categorizer;
pub mod llm;

pub use categorizer::{Categorizer, VendorClassifier};
pub use llm::{classify_intent, LlmClient, Provider};
