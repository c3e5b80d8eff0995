//! The durable audit trail.
//!
//! This module provides:
//! - `LogRecord`: the structured, uncolored encoding of one log call
//! - `AuditWriter`: the append-only JSONL file writer
//!
//! Every log call produces a record, whether or not it passed the
//! interactive threshold, so the trail is a strict superset of what was
//! ever shown on the terminal.

mod record;
mod writer;

pub use record::LogRecord;
pub use writer::AuditWriter;
