//! Activity logging: bounded-channel logger thread and the JSONL sink.

pub mod activity;
pub mod jsonl;
