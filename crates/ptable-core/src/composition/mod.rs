//! Chemical formula parsing and per-element counting.

mod counting;
mod formula;

pub use counting::{CountInput, CountMode, CountOptions, ElementCounts, count_elements};
pub use formula::Composition;
