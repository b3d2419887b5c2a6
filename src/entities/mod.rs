//! Entity module - Contains the SeaORM entity definitions for the database.
//! The storefront keeps all durable state as blobs in a single key-value table.

/// Key-value blob table
pub mod kv_entry;

pub use kv_entry::{Column as KvEntryColumn, Entity as KvEntry, Model as KvEntryModel};
