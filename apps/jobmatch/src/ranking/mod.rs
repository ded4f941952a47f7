//! Ranking — turns the model's free-form scoring replies into a sorted report.
//!
//! Flow: split corpus into chunks → score each chunk → parse replies →
//!       dedup by normalized label → stable sort by score → render.

pub mod chunking;
pub mod dedup;
pub mod parser;
pub mod prompts;
pub mod ranker;
