use super::formula::Composition;
use crate::common::{Element, ElementRegistry};
use crate::data::HeatInput;
use crate::domain::{ElementKey, PtableError, PtableResult, RawHeatValue};
use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use std::str::FromStr;
use tracing::debug;

/// How each formula contributes to the element counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CountMode {
    #[default]
    ElementComposition,
    FractionalComposition,
    ReducedComposition,
}

impl CountMode {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ElementComposition => "element_composition",
            Self::FractionalComposition => "fractional_composition",
            Self::ReducedComposition => "reduced_composition",
        }
    }

    fn weigh(self, composition: &Composition) -> Composition {
        match self {
            Self::ElementComposition => composition.clone(),
            Self::FractionalComposition => composition.fractional(),
            Self::ReducedComposition => composition.reduced(),
        }
    }
}

impl FromStr for CountMode {
    type Err = PtableError;

    fn from_str(value: &str) -> PtableResult<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "element" | "element_composition" => Ok(Self::ElementComposition),
            "fractional" | "fractional_composition" => Ok(Self::FractionalComposition),
            "reduced" | "reduced_composition" => Ok(Self::ReducedComposition),
            other => Err(PtableError::input_validation(
                "INPUT.COUNT_MODE",
                format!(
                    "unknown count mode '{other}', choose from element_composition, fractional_composition, reduced_composition"
                ),
            )),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum CountInput {
    Formulas(Vec<String>),
    /// Per-element amounts that are already counts; the count mode does not
    /// apply to them.
    Amounts(Vec<(ElementKey, f64)>),
}

impl CountInput {
    pub fn formulas<I, S>(formulas: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Formulas(formulas.into_iter().map(Into::into).collect())
    }

    pub fn amounts<I, K>(amounts: I) -> Self
    where
        I: IntoIterator<Item = (K, f64)>,
        K: Into<ElementKey>,
    {
        Self::Amounts(
            amounts
                .into_iter()
                .map(|(key, amount)| (key.into(), amount))
                .collect(),
        )
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CountOptions {
    pub mode: CountMode,
    pub exclude: Vec<String>,
    /// Value for elements that never occur; `None` leaves them out.
    pub fill_value: Option<f64>,
}

impl Default for CountOptions {
    fn default() -> Self {
        Self {
            mode: CountMode::default(),
            exclude: Vec::new(),
            fill_value: Some(0.0),
        }
    }
}

/// Element counts in atomic-number order.
#[derive(Debug, Clone, PartialEq)]
pub struct ElementCounts {
    entries: Vec<(Element, f64)>,
}

impl ElementCounts {
    pub fn get(&self, symbol: &str) -> Option<f64> {
        self.entries
            .iter()
            .find(|(element, _)| element.symbol == symbol)
            .map(|(_, count)| *count)
    }

    pub fn entries(&self) -> &[(Element, f64)] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn total(&self) -> f64 {
        self.entries
            .iter()
            .map(|(_, count)| *count)
            .filter(|count| count.is_finite())
            .sum()
    }

    /// Only the elements with a non-zero count.
    pub fn nonzero(&self) -> impl Iterator<Item = (&'static str, f64)> + '_ {
        self.entries
            .iter()
            .filter(|(_, count)| *count != 0.0)
            .map(|(element, count)| (element.symbol, *count))
    }

    pub fn to_heat_input(&self) -> HeatInput {
        HeatInput::mapping(
            self.entries
                .iter()
                .map(|(element, count)| (element.symbol, RawHeatValue::Scalar(*count))),
        )
    }
}

impl Serialize for ElementCounts {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (element, count) in &self.entries {
            map.serialize_entry(element.symbol, count)?;
        }
        map.end()
    }
}

pub fn count_elements(
    input: &CountInput,
    options: &CountOptions,
    registry: &ElementRegistry,
) -> PtableResult<ElementCounts> {
    check_exclude(&options.exclude, registry)?;

    let mut totals: Vec<Option<f64>> = vec![None; registry.len()];
    let mut add = |element: Element, amount: f64| {
        let slot = &mut totals[element.atomic_number - 1];
        *slot = Some(slot.unwrap_or(0.0) + amount);
    };

    match input {
        CountInput::Formulas(formulas) => {
            for formula in formulas {
                let composition = Composition::parse_with(formula, registry)?;
                for (element, amount) in options.mode.weigh(&composition).amounts() {
                    add(*element, *amount);
                }
            }
            debug!(
                formulas = formulas.len(),
                mode = options.mode.as_str(),
                "counted formulas"
            );
        }
        CountInput::Amounts(amounts) => {
            let elements = registry.resolve_all(amounts.iter().map(|(key, _)| key))?;
            for (element, (_, amount)) in elements.into_iter().zip(amounts) {
                add(element, *amount);
            }
        }
    }

    let entries = registry
        .iter()
        .zip(totals)
        .filter(|(element, _)| !options.exclude.iter().any(|symbol| symbol == element.symbol))
        .filter_map(|(element, total)| total.or(options.fill_value).map(|count| (element, count)))
        .collect();

    Ok(ElementCounts { entries })
}

fn check_exclude(exclude: &[String], registry: &ElementRegistry) -> PtableResult<()> {
    let unknown = exclude
        .iter()
        .filter(|symbol| !registry.is_symbol(symbol))
        .map(String::as_str)
        .collect::<Vec<_>>();
    if unknown.is_empty() {
        return Ok(());
    }
    Err(PtableError::input_validation(
        "INPUT.EXCLUDE_ELEMENTS",
        format!(
            "Unexpected symbol(s) {} in exclude_elements, expected element symbols",
            unknown.join(", ")
        ),
    ))
}
