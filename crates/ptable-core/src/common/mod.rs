pub mod elements;

pub use elements::{Element, ElementRegistry, MAX_ATOMIC_NUMBER};
