//! outlay-core: record types, period resolution, persistence capability, and
//! the built-in vendor table.

pub mod error;
pub mod intent;
pub mod model;
pub mod period;
pub mod store;
pub mod vendors;

pub use error::QueryError;
pub use intent::{ExpenseIntent, IntentType};
pub use model::{
    CategoryMapping, MappingSource, Transaction, TransactionKind, AI_CATEGORIES, CATEGORY_OTHER,
    CATEGORY_TRANSFER, INTENT_CATEGORIES,
};
pub use period::Period;
pub use store::{ExpenseStore, MemoryStore, UnparsedEmail};
pub use vendors::VendorTable;
