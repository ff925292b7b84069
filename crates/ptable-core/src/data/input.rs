use crate::common::{Element, ElementRegistry};
use crate::domain::{ElementKey, HeatValues, PtableError, PtableResult, RawHeatValue};
use std::collections::HashSet;
use std::fmt::{Display, Formatter};
use tracing::debug;

pub const SUPPORTED_SHAPES: &str = "mapping of element -> number | list | list of lists, \
named series {name, index, data}, frame {index, columns, data} with elements on either axis";

/// Every input shape accepted by [`crate::data::HeatTable`].
#[derive(Debug, Clone, PartialEq)]
pub enum HeatInput {
    Mapping(Vec<(ElementKey, RawHeatValue)>),
    Series(ElementSeries),
    Frame(ElementFrame),
}

impl HeatInput {
    pub fn mapping<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<ElementKey>,
        V: Into<RawHeatValue>,
    {
        Self::Mapping(
            entries
                .into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
        )
    }

    pub const fn shape_name(&self) -> &'static str {
        match self {
            Self::Mapping(_) => "mapping",
            Self::Series(_) => "series",
            Self::Frame(_) => "frame",
        }
    }

    pub(crate) fn into_canonical(self, registry: &ElementRegistry) -> PtableResult<CanonicalInput> {
        match self {
            Self::Mapping(entries) => CanonicalInput::from_entries(None, entries, registry),
            Self::Series(series) => {
                CanonicalInput::from_entries(series.name, series.entries, registry)
            }
            Self::Frame(frame) => frame.into_canonical(registry),
        }
    }
}

impl From<ElementSeries> for HeatInput {
    fn from(value: ElementSeries) -> Self {
        Self::Series(value)
    }
}

impl From<ElementFrame> for HeatInput {
    fn from(value: ElementFrame) -> Self {
        Self::Frame(value)
    }
}

/// Ordered element -> value pairs with an optional name.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ElementSeries {
    pub name: Option<String>,
    pub entries: Vec<(ElementKey, RawHeatValue)>,
}

impl ElementSeries {
    pub fn new<I, K, V>(name: Option<&str>, entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<ElementKey>,
        V: Into<RawHeatValue>,
    {
        Self {
            name: name.map(str::to_string),
            entries: entries
                .into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameOrientation {
    ElementsAsRows,
    ElementsAsColumns,
}

/// Labelled two-dimensional table. `cells[row][column]`.
#[derive(Debug, Clone, PartialEq)]
pub struct ElementFrame {
    name: Option<String>,
    index: Vec<String>,
    columns: Vec<String>,
    cells: Vec<Vec<RawHeatValue>>,
}

impl ElementFrame {
    pub fn new(
        index: Vec<String>,
        columns: Vec<String>,
        cells: Vec<Vec<RawHeatValue>>,
    ) -> PtableResult<Self> {
        if cells.len() != index.len() {
            return Err(PtableError::input_validation(
                "INPUT.FRAME_SHAPE",
                format!(
                    "frame has {} index labels but {} data rows",
                    index.len(),
                    cells.len()
                ),
            ));
        }
        if let Some((row, width)) = cells
            .iter()
            .map(Vec::len)
            .enumerate()
            .find(|(_, width)| *width != columns.len())
        {
            return Err(PtableError::input_validation(
                "INPUT.FRAME_SHAPE",
                format!(
                    "frame row {row} has {width} cells but {} columns are labelled",
                    columns.len()
                ),
            ));
        }

        Ok(Self {
            name: None,
            index,
            columns,
            cells,
        })
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn index(&self) -> &[String] {
        &self.index
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn cells(&self) -> &[Vec<RawHeatValue>] {
        &self.cells
    }

    pub fn transpose(&self) -> Self {
        let cells = (0..self.columns.len())
            .map(|column| self.cells.iter().map(|row| row[column].clone()).collect())
            .collect();
        Self {
            name: self.name.clone(),
            index: self.columns.clone(),
            columns: self.index.clone(),
            cells,
        }
    }

    /// Rows win when both axes are made of element symbols.
    pub fn orientation(&self, registry: &ElementRegistry) -> PtableResult<FrameOrientation> {
        let all_symbols = |labels: &[String]| labels.iter().all(|label| registry.is_symbol(label));

        if all_symbols(&self.index) {
            Ok(FrameOrientation::ElementsAsRows)
        } else if all_symbols(&self.columns) {
            Ok(FrameOrientation::ElementsAsColumns)
        } else {
            Err(PtableError::input_validation(
                "INPUT.FRAME_ORIENTATION",
                format!(
                    "Cannot handle dataframe={self}: neither the index nor the columns are all element symbols"
                ),
            ))
        }
    }

    fn into_canonical(self, registry: &ElementRegistry) -> PtableResult<CanonicalInput> {
        let orientation = self.orientation(registry)?;
        debug!(frame = %self, ?orientation, "resolved frame orientation");

        let entries = match orientation {
            FrameOrientation::ElementsAsRows => self
                .index
                .iter()
                .zip(&self.cells)
                .map(|(label, row)| -> PtableResult<(ElementKey, RawHeatValue)> {
                    Ok((ElementKey::Symbol(label.clone()), collapse(label, row)?))
                })
                .collect::<PtableResult<Vec<_>>>()?,
            FrameOrientation::ElementsAsColumns => self
                .columns
                .iter()
                .enumerate()
                .map(|(column, label)| -> PtableResult<(ElementKey, RawHeatValue)> {
                    let cells: Vec<RawHeatValue> =
                        self.cells.iter().map(|row| row[column].clone()).collect();
                    Ok((ElementKey::Symbol(label.clone()), collapse(label, &cells)?))
                })
                .collect::<PtableResult<Vec<_>>>()?,
        };

        CanonicalInput::from_entries(self.name, entries, registry)
    }
}

impl Display for ElementFrame {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        if let Some(name) = &self.name {
            write!(f, "'{name}' ")?;
        }
        write!(
            f,
            "(index=[{}], columns=[{}])",
            self.index.join(", "),
            self.columns.join(", ")
        )
    }
}

// A single cell keeps its own shape; several cells must be scalars and form a list.
fn collapse(label: &str, cells: &[RawHeatValue]) -> PtableResult<RawHeatValue> {
    if let [single] = cells {
        return Ok(single.clone());
    }
    cells
        .iter()
        .map(|cell| {
            cell.scalar().ok_or_else(|| {
                PtableError::input_validation(
                    "INPUT.UNSUPPORTED_SHAPE",
                    format!(
                        "frame cells for '{label}' must be scalars when spanning several cells"
                    ),
                )
            })
        })
        .collect::<PtableResult<Vec<f64>>>()
        .map(RawHeatValue::List)
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct CanonicalInput {
    pub(crate) name: Option<String>,
    pub(crate) rows: Vec<(Element, HeatValues)>,
}

impl CanonicalInput {
    fn from_entries(
        name: Option<String>,
        entries: Vec<(ElementKey, RawHeatValue)>,
        registry: &ElementRegistry,
    ) -> PtableResult<Self> {
        let elements = registry.resolve_all(entries.iter().map(|(key, _)| key))?;

        let mut seen = HashSet::with_capacity(elements.len());
        let mut rows = Vec::with_capacity(elements.len());
        for (element, (key, value)) in elements.into_iter().zip(entries) {
            if !seen.insert(element.atomic_number) {
                return Err(PtableError::input_validation(
                    "INPUT.DUPLICATE_ELEMENT",
                    format!("key '{key}' resolves to {} which is already present", element.symbol),
                ));
            }
            rows.push((element, HeatValues::from(value)));
        }

        Ok(Self { name, rows })
    }
}
