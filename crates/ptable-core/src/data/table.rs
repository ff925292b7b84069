use super::anomaly::{AnomalyRecord, AnomalyWarning, check_and_repair};
use super::input::HeatInput;
use super::options::NormalizeOptions;
use crate::common::{Element, ElementRegistry};
use crate::domain::{HeatValues, PtableResult};
use crate::heat::{ColorBounds, HeatMode};
use serde::Serialize;
use std::collections::HashSet;
use tracing::{debug, warn};

#[derive(Debug, Clone, PartialEq)]
pub struct HeatRow {
    pub element: Element,
    pub values: HeatValues,
}

/// Statistics over every finite value in the table.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct HeatSummary {
    pub vmin: f64,
    pub mean: f64,
    pub vmax: f64,
    pub count: usize,
}

impl HeatSummary {
    pub fn from_values<I>(values: I) -> Option<Self>
    where
        I: IntoIterator<Item = f64>,
    {
        let mut summary: Option<Self> = None;
        let mut total = 0.0;
        for value in values.into_iter().filter(|value| value.is_finite()) {
            total += value;
            summary = Some(match summary {
                None => Self {
                    vmin: value,
                    mean: 0.0,
                    vmax: value,
                    count: 1,
                },
                Some(current) => Self {
                    vmin: current.vmin.min(value),
                    vmax: current.vmax.max(value),
                    count: current.count + 1,
                    ..current
                },
            });
        }
        summary.map(|summary| Self {
            mean: total / summary.count as f64,
            ..summary
        })
    }
}

/// Canonical per-element table of heat values.
///
/// Rows keep the caller's element order. The summary is recomputed after
/// every mutation, so `vmin`/`mean`/`vmax` always describe the current rows.
#[derive(Debug, Clone, PartialEq)]
pub struct HeatTable {
    name: Option<String>,
    rows: Vec<HeatRow>,
    anomalies: AnomalyRecord,
    warnings: Vec<AnomalyWarning>,
    summary: Option<HeatSummary>,
}

impl HeatTable {
    pub fn new(input: impl Into<HeatInput>, options: &NormalizeOptions) -> PtableResult<Self> {
        Self::from_input(input, ElementRegistry::standard(), options)
    }

    pub fn from_input(
        input: impl Into<HeatInput>,
        registry: &ElementRegistry,
        options: &NormalizeOptions,
    ) -> PtableResult<Self> {
        let input = input.into();
        let shape = input.shape_name();
        let canonical = input.into_canonical(registry)?;
        debug!(shape, rows = canonical.rows.len(), "coerced heat input");

        let mut rows: Vec<HeatRow> = canonical
            .rows
            .into_iter()
            .map(|(element, values)| HeatRow { element, values })
            .collect();

        let outcome = check_and_repair(&mut rows, options)?;
        for warning in &outcome.warnings {
            warn!(kind = %warning.kind, elements = ?warning.elements, "{}", warning.message);
        }

        let mut table = Self {
            name: canonical.name,
            rows,
            anomalies: outcome.anomalies,
            warnings: outcome.warnings,
            summary: None,
        };
        table.refresh_summary();

        if options.normalize {
            table.normalize()?;
        }

        Ok(table)
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn rows(&self) -> &[HeatRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn symbols(&self) -> Vec<&'static str> {
        self.rows.iter().map(|row| row.element.symbol).collect()
    }

    pub fn get(&self, symbol: &str) -> Option<&HeatValues> {
        self.rows
            .iter()
            .find(|row| row.element.symbol == symbol)
            .map(|row| &row.values)
    }

    pub fn anomalies(&self) -> &AnomalyRecord {
        &self.anomalies
    }

    pub fn warnings(&self) -> &[AnomalyWarning] {
        &self.warnings
    }

    pub fn summary(&self) -> Option<HeatSummary> {
        self.summary
    }

    pub fn vmin(&self) -> Option<f64> {
        self.summary.map(|summary| summary.vmin)
    }

    pub fn vmax(&self) -> Option<f64> {
        self.summary.map(|summary| summary.vmax)
    }

    pub fn mean(&self) -> Option<f64> {
        self.summary.map(|summary| summary.mean)
    }

    /// Every value in row order, nested rows flattened.
    pub fn values(&self) -> impl Iterator<Item = f64> + '_ {
        self.rows.iter().flat_map(|row| row.values.iter())
    }

    /// Remove rows by symbol. Symbols that are not present are ignored.
    pub fn drop_elements<S>(&mut self, symbols: &[S])
    where
        S: AsRef<str>,
    {
        let dropped: HashSet<&str> = symbols.iter().map(|symbol| symbol.as_ref()).collect();
        let before = self.rows.len();
        self.rows.retain(|row| !dropped.contains(row.element.symbol));
        self.anomalies.retain(|symbol, _| !dropped.contains(symbol));
        for warning in &mut self.warnings {
            warning.forget(&dropped);
        }
        self.warnings.retain(|warning| !warning.elements.is_empty());
        debug!(removed = before - self.rows.len(), "dropped elements");
        self.refresh_summary();
    }

    pub fn apply<F>(&mut self, mut function: F)
    where
        F: FnMut(f64) -> f64,
    {
        for row in &mut self.rows {
            row.values.map_in_place(&mut function);
        }
        self.refresh_summary();
    }

    /// Fallible variant of [`HeatTable::apply`]. The first error is returned
    /// unchanged and the table is left as it was.
    pub fn try_apply<F, E>(&mut self, mut function: F) -> Result<(), E>
    where
        F: FnMut(f64) -> Result<f64, E>,
    {
        let mut rows = self.rows.clone();
        for row in &mut rows {
            let mut failure = None;
            row.values.map_in_place(|value| {
                if failure.is_some() {
                    return value;
                }
                match function(value) {
                    Ok(mapped) => mapped,
                    Err(error) => {
                        failure = Some(error);
                        value
                    }
                }
            });
            if let Some(error) = failure {
                return Err(error);
            }
        }
        self.rows = rows;
        self.refresh_summary();
        Ok(())
    }

    /// Divide every value by the total of finite values so the table sums to 1.
    pub fn normalize(&mut self) -> PtableResult<()> {
        self.apply_heat_mode(HeatMode::Fraction)
    }

    pub fn apply_heat_mode(&mut self, mode: HeatMode) -> PtableResult<()> {
        if mode == HeatMode::Value {
            return Ok(());
        }
        let factor = mode.scale_factor(self.values())?;
        self.apply(|value| value * factor);
        Ok(())
    }

    pub fn color_bounds(&self, log: bool) -> PtableResult<ColorBounds> {
        ColorBounds::resolve(self.values(), HeatMode::Value, log, (None, None))
    }

    fn refresh_summary(&mut self) {
        self.summary = HeatSummary::from_values(self.values());
    }
}
