use crate::domain::{PtableError, PtableResult};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// Replacement policy for NaN heat values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MissingStrategy {
    Zero,
    #[default]
    Mean,
}

impl MissingStrategy {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Zero => "zero",
            Self::Mean => "mean",
        }
    }
}

impl Display for MissingStrategy {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str((*self).as_str())
    }
}

impl FromStr for MissingStrategy {
    type Err = PtableError;

    fn from_str(value: &str) -> PtableResult<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "zero" => Ok(Self::Zero),
            "mean" => Ok(Self::Mean),
            other => Err(PtableError::input_validation(
                "INPUT.MISSING_STRATEGY",
                format!("unknown missing strategy '{other}', choose from 'zero' or 'mean'"),
            )),
        }
    }
}

/// Construction flags for [`crate::data::HeatTable`]. Deserializes from a
/// JSON object where every field is optional.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct NormalizeOptions {
    pub check_missing: bool,
    pub check_infinity: bool,
    pub missing_strategy: MissingStrategy,
    pub normalize: bool,
}

impl Default for NormalizeOptions {
    fn default() -> Self {
        Self {
            check_missing: true,
            check_infinity: true,
            missing_strategy: MissingStrategy::Mean,
            normalize: false,
        }
    }
}

impl NormalizeOptions {
    /// No anomaly scanning at all; values are taken as given.
    pub fn unchecked() -> Self {
        Self {
            check_missing: false,
            check_infinity: false,
            ..Self::default()
        }
    }

    pub fn with_missing_strategy(mut self, strategy: MissingStrategy) -> Self {
        self.missing_strategy = strategy;
        self
    }

    pub fn with_normalize(mut self, normalize: bool) -> Self {
        self.normalize = normalize;
        self
    }

    pub const fn repair_requested(&self) -> bool {
        self.check_missing || self.check_infinity
    }
}

#[cfg(test)]
mod tests {
    use super::{MissingStrategy, NormalizeOptions};

    #[test]
    fn defaults_scan_everything_and_fill_with_row_mean() {
        let options = NormalizeOptions::default();
        assert!(options.check_missing);
        assert!(options.check_infinity);
        assert_eq!(options.missing_strategy, MissingStrategy::Mean);
        assert!(!options.normalize);
        assert!(!NormalizeOptions::unchecked().repair_requested());
    }

    #[test]
    fn partial_json_config_keeps_defaults() {
        let options: NormalizeOptions =
            serde_json::from_str(r#"{ "missing_strategy": "zero", "normalize": true }"#)
                .expect("config should parse");
        assert_eq!(options.missing_strategy, MissingStrategy::Zero);
        assert!(options.normalize);
        assert!(options.check_missing);
    }

    #[test]
    fn unknown_config_fields_are_rejected() {
        let result = serde_json::from_str::<NormalizeOptions>(r#"{ "check_nan": false }"#);
        assert!(result.is_err());
    }

    #[test]
    fn missing_strategy_parses_case_insensitively() {
        assert_eq!("Zero".parse::<MissingStrategy>(), Ok(MissingStrategy::Zero));
        let error = "median"
            .parse::<MissingStrategy>()
            .expect_err("unknown strategy should fail");
        assert_eq!(error.placeholder(), "INPUT.MISSING_STRATEGY");
    }
}
