pub mod common;
pub mod composition;
pub mod data;
pub mod domain;
pub mod heat;
pub mod serialization;

pub use common::{Element, ElementRegistry};
pub use data::{HeatInput, HeatTable, MissingStrategy, NormalizeOptions};
pub use domain::{PtableError, PtableErrorCategory, PtableResult};
