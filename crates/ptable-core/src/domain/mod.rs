pub mod errors;

pub use errors::{PtableError, PtableErrorCategory, PtableResult};

use std::fmt::{Display, Formatter};

/// Identifier of an element as supplied by a caller: either a symbol such as
/// `"Fe"` or an atomic number such as `26`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ElementKey {
    Symbol(String),
    AtomicNumber(i64),
}

impl ElementKey {
    /// Numeric strings (`"26"`, `" -1 "`) become atomic numbers, everything
    /// else is kept as a symbol.
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        match trimmed.parse::<i64>() {
            Ok(number) => Self::AtomicNumber(number),
            Err(_) => Self::Symbol(trimmed.to_string()),
        }
    }

    pub const fn is_numeric(&self) -> bool {
        matches!(self, Self::AtomicNumber(_))
    }
}

impl Display for ElementKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Symbol(symbol) => f.write_str(symbol),
            Self::AtomicNumber(number) => write!(f, "{number}"),
        }
    }
}

impl From<&str> for ElementKey {
    fn from(value: &str) -> Self {
        Self::parse(value)
    }
}

impl From<String> for ElementKey {
    fn from(value: String) -> Self {
        Self::parse(&value)
    }
}

impl From<i64> for ElementKey {
    fn from(value: i64) -> Self {
        Self::AtomicNumber(value)
    }
}

impl From<i32> for ElementKey {
    fn from(value: i32) -> Self {
        Self::AtomicNumber(i64::from(value))
    }
}

/// Heat value exactly as it arrives from the caller, before coercion.
#[derive(Debug, Clone, PartialEq)]
pub enum RawHeatValue {
    Scalar(f64),
    List(Vec<f64>),
    Nested(Vec<Vec<f64>>),
}

impl RawHeatValue {
    pub fn scalar(&self) -> Option<f64> {
        match self {
            Self::Scalar(value) => Some(*value),
            _ => None,
        }
    }
}

impl From<f64> for RawHeatValue {
    fn from(value: f64) -> Self {
        Self::Scalar(value)
    }
}

impl From<i32> for RawHeatValue {
    fn from(value: i32) -> Self {
        Self::Scalar(f64::from(value))
    }
}

impl From<Vec<f64>> for RawHeatValue {
    fn from(value: Vec<f64>) -> Self {
        Self::List(value)
    }
}

impl From<&[f64]> for RawHeatValue {
    fn from(value: &[f64]) -> Self {
        Self::List(value.to_vec())
    }
}

impl<const N: usize> From<[f64; N]> for RawHeatValue {
    fn from(value: [f64; N]) -> Self {
        Self::List(value.to_vec())
    }
}

impl From<Vec<Vec<f64>>> for RawHeatValue {
    fn from(value: Vec<Vec<f64>>) -> Self {
        Self::Nested(value)
    }
}

/// Canonical row of a heat table. Scalars are stored as one-element `Flat`
/// rows.
#[derive(Debug, Clone, PartialEq)]
pub enum HeatValues {
    Flat(Vec<f64>),
    Nested(Vec<Vec<f64>>),
}

impl HeatValues {
    pub const fn nest_level(&self) -> usize {
        match self {
            Self::Flat(_) => 1,
            Self::Nested(_) => 2,
        }
    }

    pub fn as_flat(&self) -> Option<&[f64]> {
        match self {
            Self::Flat(values) => Some(values),
            Self::Nested(_) => None,
        }
    }

    /// Every value in the row, nested rows flattened in order.
    pub fn iter(&self) -> Box<dyn Iterator<Item = f64> + '_> {
        match self {
            Self::Flat(values) => Box::new(values.iter().copied()),
            Self::Nested(rows) => Box::new(rows.iter().flatten().copied()),
        }
    }

    pub fn finite_values(&self) -> impl Iterator<Item = f64> + '_ {
        self.iter().filter(|value| value.is_finite())
    }

    pub fn len(&self) -> usize {
        match self {
            Self::Flat(values) => values.len(),
            Self::Nested(rows) => rows.iter().map(Vec::len).sum(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn map_in_place<F>(&mut self, mut function: F)
    where
        F: FnMut(f64) -> f64,
    {
        match self {
            Self::Flat(values) => values.iter_mut().for_each(|value| *value = function(*value)),
            Self::Nested(rows) => rows
                .iter_mut()
                .flatten()
                .for_each(|value| *value = function(*value)),
        }
    }
}

impl From<RawHeatValue> for HeatValues {
    fn from(value: RawHeatValue) -> Self {
        match value {
            RawHeatValue::Scalar(value) => Self::Flat(vec![value]),
            RawHeatValue::List(values) => Self::Flat(values),
            RawHeatValue::Nested(rows) => Self::Nested(rows),
        }
    }
}
