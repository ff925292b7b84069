use crate::domain::{PtableError, PtableResult};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// How heat values are scaled before display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HeatMode {
    #[default]
    Value,
    Fraction,
    Percent,
}

impl HeatMode {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Value => "value",
            Self::Fraction => "fraction",
            Self::Percent => "percent",
        }
    }

    /// Multiplier that turns raw values into this mode. Non-finite values are
    /// left out of the total.
    pub fn scale_factor<I>(self, values: I) -> PtableResult<f64>
    where
        I: IntoIterator<Item = f64>,
    {
        match self {
            Self::Value => Ok(1.0),
            Self::Fraction => Ok(1.0 / finite_total(values)?),
            Self::Percent => Ok(100.0 / finite_total(values)?),
        }
    }
}

impl Display for HeatMode {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str((*self).as_str())
    }
}

impl FromStr for HeatMode {
    type Err = PtableError;

    fn from_str(value: &str) -> PtableResult<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "value" => Ok(Self::Value),
            "fraction" => Ok(Self::Fraction),
            "percent" => Ok(Self::Percent),
            other => Err(PtableError::input_validation(
                "INPUT.HEAT_MODE",
                format!(
                    "unknown heat mode '{other}', choose from 'value', 'fraction' or 'percent'"
                ),
            )),
        }
    }
}

pub(crate) fn finite_total<I>(values: I) -> PtableResult<f64>
where
    I: IntoIterator<Item = f64>,
{
    let total: f64 = values.into_iter().filter(|value| value.is_finite()).sum();
    if total == 0.0 || !total.is_finite() {
        return Err(PtableError::computation(
            "DATA.NORMALIZE_ZERO_SUM",
            format!("cannot normalize heat values: total of finite values is {total}"),
        ));
    }
    Ok(total)
}

/// Lower and upper end of a colour scale. With `log` set, bounds are already
/// in `log10` space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ColorBounds {
    pub lower: f64,
    pub upper: f64,
    pub log: bool,
}

impl ColorBounds {
    pub fn resolve<I>(
        values: I,
        mode: HeatMode,
        log: bool,
        range: (Option<f64>, Option<f64>),
    ) -> PtableResult<Self>
    where
        I: IntoIterator<Item = f64>,
    {
        if log && mode != HeatMode::Value {
            return Err(PtableError::input_validation(
                "INPUT.LOG_HEAT_MODE",
                "Combining log color scale and heat_mode='fraction'/'percent' unsupported",
            ));
        }

        let observed = values
            .into_iter()
            .filter(|value| value.is_finite())
            .map(|value| color_value(value, log))
            .fold(None, |range: Option<(f64, f64)>, value| match range {
                None => Some((value, value)),
                Some((low, high)) => Some((low.min(value), high.max(value))),
            });

        let lower = range.0.or(observed.map(|(low, _)| low));
        let upper = range.1.or(observed.map(|(_, high)| high));
        let (Some(lower), Some(upper)) = (lower, upper) else {
            return Err(PtableError::input_validation(
                "INPUT.EMPTY_COLOR_RANGE",
                "no finite values to derive color scale bounds from",
            ));
        };
        if lower > upper {
            return Err(PtableError::input_validation(
                "INPUT.COLOR_RANGE",
                format!("color scale lower bound {lower} exceeds upper bound {upper}"),
            ));
        }

        Ok(Self { lower, upper, log })
    }

    /// Position of `value` on the scale in `[0, 1]`; NaN stays NaN.
    pub fn position(&self, value: f64) -> f64 {
        let value = color_value(value, self.log);
        if value.is_nan() {
            return f64::NAN;
        }
        let span = self.upper - self.lower;
        if span == 0.0 {
            return 0.5;
        }
        ((value - self.lower) / span).clamp(0.0, 1.0)
    }
}

// Only positive values move to log space; the rest stay linear.
fn color_value(value: f64, log: bool) -> f64 {
    if log && value > 0.0 {
        value.log10()
    } else {
        value
    }
}
