//! Reference stages illustrating the composition core.
//!
//! These are example consumers of [`crate::Stage`]/[`crate::PipePair`],
//! not part of the core's public contract; a real deployment brings its
//! own stages. Kept here so the composition algebra has something
//! concrete to exercise in tests and in the demo binary (`src/main.rs`).

pub mod framer;
pub mod tick;

pub use framer::LengthPrefixFramer;
pub use tick::TickStage;
