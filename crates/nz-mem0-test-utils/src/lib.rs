//! Test helpers shared across nz-mem0 crates.

pub mod embedder;
pub mod index;

pub use embedder::StubEmbedder;
pub use index::{FailingIndex, StubIndex};
