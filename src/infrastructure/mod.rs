//! Adapters implementing the domain ports: in-memory stores for tests and
//! the CLI, a sandbox gateway stand-in, the two-tier read policy, and an
//! optional RocksDB-backed payment store.

pub mod in_memory;
#[cfg(feature = "storage-rocksdb")]
pub mod rocksdb;
pub mod sandbox;
pub mod tiered;
