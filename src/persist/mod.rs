//! Layout persistence orchestrator.
//!
//! The gateway is the only component that touches the durable store. The
//! key-value abstraction, its in-memory and file-backed implementations,
//! and the gateway itself live in the private `core` module.

mod core;

pub use core::{FileStore, KvStore, LayoutGateway, MemoryStore, LAYOUT_KEY};
