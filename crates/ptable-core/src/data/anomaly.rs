//! NaN and infinity detection for canonical rows.
//!
//! Repair is all-or-nothing: every replacement row is computed first and only
//! written back once the whole table has been validated.

use super::options::{MissingStrategy, NormalizeOptions};
use super::table::HeatRow;
use crate::domain::{HeatValues, PtableError, PtableResult};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::fmt::{Display, Formatter};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AnomalyKind {
    Inf,
    Nan,
}

impl AnomalyKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Inf => "inf",
            Self::Nan => "nan",
        }
    }
}

impl Display for AnomalyKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str((*self).as_str())
    }
}

pub type AnomalyRecord = BTreeMap<&'static str, BTreeSet<AnomalyKind>>;

/// One consolidated, non-fatal notice per anomaly kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AnomalyWarning {
    pub kind: AnomalyKind,
    pub elements: Vec<&'static str>,
    pub message: String,
}

impl AnomalyWarning {
    /// Removes `dropped` from the listed elements, message included.
    pub(crate) fn forget(&mut self, dropped: &HashSet<&str>) {
        let listed = format!("[{}]", self.elements.join(", "));
        self.elements.retain(|symbol| !dropped.contains(symbol));
        let remaining = format!("[{}]", self.elements.join(", "));
        self.message = self.message.replacen(&listed, &remaining, 1);
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) struct RepairOutcome {
    pub(crate) anomalies: AnomalyRecord,
    pub(crate) warnings: Vec<AnomalyWarning>,
}

pub(crate) fn check_and_repair(
    rows: &mut [HeatRow],
    options: &NormalizeOptions,
) -> PtableResult<RepairOutcome> {
    if !options.repair_requested() {
        return Ok(RepairOutcome::default());
    }

    if let Some(row) = rows.iter().find(|row| row.values.nest_level() > 1) {
        return Err(PtableError::computation(
            "DATA.UNSUPPORTED_NESTING",
            format!(
                "Unable to replace NaN and inf for nest_level>1 (element {})",
                row.element.symbol
            ),
        ));
    }

    let mut outcome = RepairOutcome::default();
    let mut nan_elements = Vec::new();
    let mut inf_elements = Vec::new();
    let mut replacements = Vec::new();

    for (position, row) in rows.iter().enumerate() {
        let Some(values) = row.values.as_flat() else {
            continue;
        };
        let symbol = row.element.symbol;
        let has_nan = options.check_missing && values.iter().any(|value| value.is_nan());
        let has_inf = options.check_infinity && values.iter().any(|value| value.is_infinite());
        if !has_nan && !has_inf {
            continue;
        }

        let mut repaired = values.to_vec();
        let kinds = outcome.anomalies.entry(symbol).or_default();
        if has_inf {
            kinds.insert(AnomalyKind::Inf);
            inf_elements.push(symbol);
            clip_infinities(symbol, &mut repaired)?;
        }
        if has_nan {
            kinds.insert(AnomalyKind::Nan);
            nan_elements.push(symbol);
            fill_missing(symbol, &mut repaired, options.missing_strategy)?;
        }
        replacements.push((position, repaired));
    }

    for (position, repaired) in replacements {
        rows[position].values = HeatValues::Flat(repaired);
    }

    if !nan_elements.is_empty() {
        outcome.warnings.push(AnomalyWarning {
            kind: AnomalyKind::Nan,
            message: format!(
                "NaN found in data for elements [{}], replaced using '{}' strategy",
                nan_elements.join(", "),
                options.missing_strategy
            ),
            elements: nan_elements,
        });
    }
    if !inf_elements.is_empty() {
        outcome.warnings.push(AnomalyWarning {
            kind: AnomalyKind::Inf,
            message: format!(
                "Infinity found in data for elements [{}], clipped to each row's finite range",
                inf_elements.join(", ")
            ),
            elements: inf_elements,
        });
    }

    Ok(outcome)
}

fn finite_range(values: &[f64]) -> Option<(f64, f64)> {
    values
        .iter()
        .copied()
        .filter(|value| value.is_finite())
        .fold(None, |range, value| match range {
            None => Some((value, value)),
            Some((low, high)) => Some((low.min(value), high.max(value))),
        })
}

fn clip_infinities(symbol: &str, values: &mut [f64]) -> PtableResult<()> {
    let (low, high) = finite_range(values).ok_or_else(|| no_finite_values(symbol, "infinity"))?;
    for value in values.iter_mut() {
        if *value == f64::INFINITY {
            *value = high;
        } else if *value == f64::NEG_INFINITY {
            *value = low;
        }
    }
    Ok(())
}

fn fill_missing(symbol: &str, values: &mut [f64], strategy: MissingStrategy) -> PtableResult<()> {
    let replacement = match strategy {
        MissingStrategy::Zero => 0.0,
        MissingStrategy::Mean => {
            let (sum, count) = values
                .iter()
                .filter(|value| value.is_finite())
                .fold((0.0_f64, 0_usize), |(sum, count), value| (sum + value, count + 1));
            if count == 0 {
                return Err(no_finite_values(symbol, "NaN"));
            }
            sum / count as f64
        }
    };
    values
        .iter_mut()
        .filter(|value| value.is_nan())
        .for_each(|value| *value = replacement);
    Ok(())
}

fn no_finite_values(symbol: &str, anomaly: &str) -> PtableError {
    PtableError::computation(
        "DATA.NO_FINITE_VALUES",
        format!("cannot replace {anomaly} for {symbol}: row has no finite values"),
    )
}
