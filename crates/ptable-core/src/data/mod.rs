//! Data normalizer: turns mappings, series and frames into a canonical
//! [`HeatTable`], repairing NaN and infinite values on the way.

mod anomaly;
mod input;
mod options;
mod table;

pub use anomaly::{AnomalyKind, AnomalyRecord, AnomalyWarning};
pub use input::{ElementFrame, ElementSeries, FrameOrientation, HeatInput, SUPPORTED_SHAPES};
pub use options::{MissingStrategy, NormalizeOptions};
pub use table::{HeatRow, HeatSummary, HeatTable};
