//! JSON adapters for heat inputs and table reports.
//!
//! Accepted documents mirror the pandas JSON layouts: a plain object for a
//! mapping, `{name, index, data}` for a series and `{index, columns, data}`
//! (`orient="split"`) for a frame. JSON has no NaN or infinity, so numeric
//! positions also accept `null` and the strings `"NaN"`, `"inf"`, `"-inf"`.

use crate::data::{
    AnomalyRecord, AnomalyWarning, ElementFrame, ElementSeries, HeatInput, HeatSummary, HeatTable,
    SUPPORTED_SHAPES,
};
use crate::domain::{ElementKey, HeatValues, PtableError, PtableResult, RawHeatValue};
use crate::heat::ColorBounds;
use serde::Serialize;
use serde_json::{Map, Value};
use std::fs;
use std::path::Path;

pub fn parse_heat_input(source: &str) -> PtableResult<HeatInput> {
    let value: Value = serde_json::from_str(source).map_err(|error| {
        PtableError::input_validation("INPUT.JSON", format!("invalid JSON heat input: {error}"))
    })?;
    heat_input_from_value(value)
}

pub fn read_heat_input(path: &Path) -> PtableResult<HeatInput> {
    let source = fs::read_to_string(path).map_err(|error| {
        PtableError::io_system(
            "IO.INPUT_READ",
            format!("failed to read '{}': {error}", path.display()),
        )
    })?;
    parse_heat_input(&source)
}

pub fn heat_input_from_value(value: Value) -> PtableResult<HeatInput> {
    let object = match value {
        Value::Object(object) => object,
        other => {
            return Err(PtableError::input_validation(
                "INPUT.UNSUPPORTED_SHAPE",
                format!(
                    "{} unsupported, choose from {SUPPORTED_SHAPES}",
                    json_type_name(&other)
                ),
            ));
        }
    };

    let has = |key: &str| object.contains_key(key);
    if has("index") && has("data") && has("columns") {
        frame_from_object(object).map(HeatInput::Frame)
    } else if has("index")
        && has("data")
        && object
            .keys()
            .all(|key| matches!(key.as_str(), "name" | "index" | "data"))
    {
        series_from_object(object).map(HeatInput::Series)
    } else {
        object
            .into_iter()
            .map(|(key, value)| -> PtableResult<(ElementKey, RawHeatValue)> {
                Ok((ElementKey::parse(&key), raw_value(&key, &value)?))
            })
            .collect::<PtableResult<Vec<_>>>()
            .map(HeatInput::Mapping)
    }
}

fn series_from_object(mut object: Map<String, Value>) -> PtableResult<ElementSeries> {
    let name = match object.remove("name") {
        Some(Value::String(name)) => Some(name),
        Some(Value::Null) | None => None,
        Some(other) => Some(other.to_string()),
    };
    let index = array_field(&mut object, "index")?;
    let data = array_field(&mut object, "data")?;
    if index.len() != data.len() {
        return Err(PtableError::input_validation(
            "INPUT.SERIES_SHAPE",
            format!(
                "series has {} index labels but {} values",
                index.len(),
                data.len()
            ),
        ));
    }

    let entries = index
        .iter()
        .zip(&data)
        .map(|(label, value)| -> PtableResult<(ElementKey, RawHeatValue)> {
            let label = label_text(label)?;
            let raw = raw_value(&label, value)?;
            Ok((ElementKey::parse(&label), raw))
        })
        .collect::<PtableResult<Vec<_>>>()?;

    Ok(ElementSeries { name, entries })
}

fn frame_from_object(mut object: Map<String, Value>) -> PtableResult<ElementFrame> {
    let name = object
        .remove("name")
        .and_then(|name| name.as_str().map(str::to_string));
    let index = array_field(&mut object, "index")?
        .iter()
        .map(label_text)
        .collect::<PtableResult<Vec<_>>>()?;
    let columns = array_field(&mut object, "columns")?
        .iter()
        .map(label_text)
        .collect::<PtableResult<Vec<_>>>()?;
    let cells = array_field(&mut object, "data")?
        .iter()
        .enumerate()
        .map(|(row, cells)| {
            let Value::Array(cells) = cells else {
                return Err(PtableError::input_validation(
                    "INPUT.FRAME_SHAPE",
                    format!("frame data row {row} is not an array"),
                ));
            };
            cells
                .iter()
                .map(|cell| raw_value(&format!("row {row}"), cell))
                .collect::<PtableResult<Vec<_>>>()
        })
        .collect::<PtableResult<Vec<_>>>()?;

    let frame = ElementFrame::new(index, columns, cells)?;
    Ok(match name {
        Some(name) => frame.with_name(name),
        None => frame,
    })
}

fn array_field(object: &mut Map<String, Value>, field: &str) -> PtableResult<Vec<Value>> {
    match object.remove(field) {
        Some(Value::Array(values)) => Ok(values),
        _ => Err(PtableError::input_validation(
            "INPUT.UNSUPPORTED_SHAPE",
            format!("field '{field}' must be an array"),
        )),
    }
}

fn label_text(label: &Value) -> PtableResult<String> {
    match label {
        Value::String(text) => Ok(text.clone()),
        Value::Number(number) => Ok(number.to_string()),
        other => Err(PtableError::input_validation(
            "INPUT.UNSUPPORTED_SHAPE",
            format!("labels must be strings or numbers, got {}", json_type_name(other)),
        )),
    }
}

fn raw_value(context: &str, value: &Value) -> PtableResult<RawHeatValue> {
    let Value::Array(items) = value else {
        return number(context, value).map(RawHeatValue::Scalar);
    };

    if items.iter().all(|item| !item.is_array()) {
        return items
            .iter()
            .map(|item| number(context, item))
            .collect::<PtableResult<Vec<_>>>()
            .map(RawHeatValue::List);
    }

    items
        .iter()
        .map(|item| match item {
            Value::Array(inner) if inner.iter().all(|value| !value.is_array()) => inner
                .iter()
                .map(|value| number(context, value))
                .collect::<PtableResult<Vec<_>>>(),
            _ => Err(PtableError::input_validation(
                "INPUT.NESTING_DEPTH",
                format!(
                    "values for '{context}' mix scalars and lists or nest deeper than lists of lists"
                ),
            )),
        })
        .collect::<PtableResult<Vec<_>>>()
        .map(RawHeatValue::Nested)
}

fn number(context: &str, value: &Value) -> PtableResult<f64> {
    let parsed = match value {
        Value::Number(number) => number.as_f64(),
        Value::Null => Some(f64::NAN),
        Value::String(text) => match text.trim().to_ascii_lowercase().as_str() {
            "nan" => Some(f64::NAN),
            "inf" | "+inf" | "infinity" | "+infinity" => Some(f64::INFINITY),
            "-inf" | "-infinity" => Some(f64::NEG_INFINITY),
            other => other.parse::<f64>().ok(),
        },
        _ => None,
    };
    parsed.ok_or_else(|| {
        PtableError::input_validation(
            "INPUT.UNSUPPORTED_SHAPE",
            format!("value {value} for '{context}' is not numeric"),
        )
    })
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportRow {
    pub element: &'static str,
    pub atomic_number: usize,
    /// Non-finite values serialize as `null`.
    pub values: Value,
}

/// JSON view of a [`HeatTable`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableReport {
    pub name: Option<String>,
    pub rows: Vec<ReportRow>,
    pub summary: Option<HeatSummary>,
    pub anomalies: AnomalyRecord,
    pub warnings: Vec<AnomalyWarning>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color_bounds: Option<ColorBounds>,
}

impl TableReport {
    pub fn from_table(table: &HeatTable) -> Self {
        Self {
            name: table.name().map(str::to_string),
            rows: table
                .rows()
                .iter()
                .map(|row| ReportRow {
                    element: row.element.symbol,
                    atomic_number: row.element.atomic_number,
                    values: values_json(&row.values),
                })
                .collect(),
            summary: table.summary(),
            anomalies: table.anomalies().clone(),
            warnings: table.warnings().to_vec(),
            color_bounds: None,
        }
    }

    pub fn with_color_bounds(mut self, bounds: ColorBounds) -> Self {
        self.color_bounds = Some(bounds);
        self
    }

    pub fn to_json_pretty(&self) -> PtableResult<String> {
        serde_json::to_string_pretty(self).map_err(|error| {
            PtableError::internal(
                "SYS.REPORT_SERIALIZE",
                format!("failed to serialize report: {error}"),
            )
        })
    }

    pub fn write(&self, path: &Path) -> PtableResult<()> {
        let content = self.to_json_pretty()?;
        if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|error| write_error(parent, &error))?;
        }
        fs::write(path, format!("{content}\n")).map_err(|error| write_error(path, &error))
    }
}

fn write_error(path: &Path, error: &std::io::Error) -> PtableError {
    PtableError::io_system(
        "IO.REPORT_WRITE",
        format!("failed to write '{}': {error}", path.display()),
    )
}

fn values_json(values: &HeatValues) -> Value {
    match values {
        HeatValues::Flat(values) => Value::from(values.clone()),
        HeatValues::Nested(rows) => {
            Value::Array(rows.iter().map(|row| Value::from(row.clone())).collect())
        }
    }
}

pub fn render_human_summary(table: &HeatTable) -> String {
    let mut lines = Vec::new();
    if let Some(name) = table.name() {
        lines.push(format!("Table: {name}"));
    }
    lines.push(format!("Elements: {}", table.len()));
    match table.summary() {
        Some(summary) => lines.push(format!(
            "vmin={} mean={} vmax={} (finite values: {})",
            summary.vmin, summary.mean, summary.vmax, summary.count
        )),
        None => lines.push("no finite values".to_string()),
    }
    for (symbol, kinds) in table.anomalies() {
        let kinds = kinds
            .iter()
            .map(|kind| kind.as_str())
            .collect::<Vec<_>>()
            .join(", ");
        lines.push(format!("Anomalies {symbol}: {kinds}"));
    }
    for row in table.rows() {
        let values = row
            .values
            .iter()
            .map(|value| value.to_string())
            .collect::<Vec<_>>()
            .join(" ");
        lines.push(format!("{:<3} {values}", row.element.symbol));
    }
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::{TableReport, parse_heat_input};
    use crate::data::{HeatInput, HeatTable, NormalizeOptions};
    use crate::domain::{ElementKey, RawHeatValue};
    use serde_json::{Value, json};
    use tempfile::TempDir;

    #[test]
    fn plain_objects_become_mappings() {
        let input = parse_heat_input(r#"{ "H": 1, "He": [2.0, "NaN"], "26": null }"#)
            .expect("mapping should parse");
        let HeatInput::Mapping(entries) = input else {
            panic!("expected mapping, got {input:?}");
        };
        assert_eq!(entries[0], (ElementKey::parse("H"), RawHeatValue::Scalar(1.0)));
        assert_eq!(entries[2].0, ElementKey::AtomicNumber(26));
        let RawHeatValue::List(values) = &entries[1].1 else {
            panic!("expected list");
        };
        assert!(values[1].is_nan());
    }

    #[test]
    fn split_orientation_becomes_frame() {
        let input = parse_heat_input(
            r#"{ "index": [0, 1], "columns": ["He", "Li"], "data": [[2, 6], [4, 8]] }"#,
        )
        .expect("frame should parse");
        assert_eq!(input.shape_name(), "frame");
    }

    #[test]
    fn top_level_arrays_list_supported_shapes() {
        for source in ["[0, 1, 2]", "\"test\"", "null", "5"] {
            let error = parse_heat_input(source).expect_err("non-object should fail");
            assert_eq!(error.placeholder(), "INPUT.UNSUPPORTED_SHAPE");
            assert!(error.message().contains("unsupported, choose from"));
        }
    }

    #[test]
    fn triple_nesting_is_rejected_at_the_boundary() {
        let error = parse_heat_input(r#"{ "Fe": [[[1]]] }"#).expect_err("deep nesting should fail");
        assert_eq!(error.placeholder(), "INPUT.NESTING_DEPTH");
    }

    #[test]
    fn report_writes_nulls_for_non_finite_values() {
        let table = HeatTable::new(
            HeatInput::mapping([("Fe", vec![1.0, f64::INFINITY])]),
            &NormalizeOptions::unchecked(),
        )
        .expect("table should build");
        let temp = TempDir::new().expect("tempdir should be created");
        let path = temp.path().join("reports/table.json");

        TableReport::from_table(&table)
            .write(&path)
            .expect("report should be written");

        let parsed: Value = serde_json::from_str(
            &std::fs::read_to_string(&path).expect("report should be readable"),
        )
        .expect("report should parse");
        assert_eq!(parsed["rows"][0]["values"], json!([1.0, null]));
        assert_eq!(parsed["summary"]["vmax"], json!(1.0));
    }
}
