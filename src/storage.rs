//! Storage abstraction for model blobs.
//!
//! The classifier only needs to read and write named byte blobs. Where those
//! bytes live is pluggable: a directory on disk or an in-memory map.

pub mod file;
pub mod memory;
pub mod traits;

pub use file::*;
pub use memory::*;
pub use traits::*;
