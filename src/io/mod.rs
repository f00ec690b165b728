//! Utterance buffering and chunking

pub mod chunker;

pub use chunker::{chunk_utterance, AudioChunk, Chunks};
