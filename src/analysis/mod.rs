//! Result aggregation
//!
//! - Per-utterance score results and rating bands
//! - Session summaries over several results

pub mod result;
pub mod summary;
