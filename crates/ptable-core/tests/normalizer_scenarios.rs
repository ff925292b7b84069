use ptable_core::data::{AnomalyKind, ElementFrame, ElementSeries, HeatInput, HeatTable};
use ptable_core::domain::{HeatValues, RawHeatValue};
use ptable_core::serialization::parse_heat_input;
use ptable_core::{MissingStrategy, NormalizeOptions, PtableErrorCategory};

fn build(input: impl Into<HeatInput>) -> HeatTable {
    HeatTable::new(input, &NormalizeOptions::default()).expect("table should build")
}

fn labels(items: &[&str]) -> Vec<String> {
    items.iter().map(|item| item.to_string()).collect()
}

fn flat(values: &[f64]) -> HeatValues {
    HeatValues::Flat(values.to_vec())
}

#[test]
fn every_input_shape_yields_the_same_table() {
    let mapping = build(HeatInput::mapping([
        ("H", vec![1.0, 2.0]),
        ("He", vec![3.0, 4.0]),
        ("Li", vec![5.0, 6.0]),
    ]));

    let series = build(ElementSeries::new(
        None,
        [("H", vec![1.0, 2.0]), ("He", vec![3.0, 4.0]), ("Li", vec![5.0, 6.0])],
    ));

    let cells = vec![
        vec![RawHeatValue::from(1.0), RawHeatValue::from(2.0)],
        vec![RawHeatValue::from(3.0), RawHeatValue::from(4.0)],
        vec![RawHeatValue::from(5.0), RawHeatValue::from(6.0)],
    ];
    let frame = ElementFrame::new(labels(&["H", "He", "Li"]), labels(&["a", "b"]), cells)
        .expect("frame should be rectangular");
    let rows = build(frame.clone());
    let columns = build(frame.transpose());

    for table in [&series, &rows, &columns] {
        assert_eq!(table.rows(), mapping.rows());
        assert_eq!(table.summary(), mapping.summary());
    }
}

#[test]
fn mixed_scalars_and_lists_summarize_exactly() {
    let table = build(HeatInput::mapping([
        ("H", RawHeatValue::from(1)),
        ("He", RawHeatValue::from(vec![2.0, 4.0])),
        ("Na", RawHeatValue::from(11.0)),
    ]));

    assert_eq!(table.vmin(), Some(1.0));
    assert_eq!(table.vmax(), Some(11.0));
    assert_eq!(table.mean(), Some(4.5));
    assert_eq!(table.symbols(), vec!["H", "He", "Na"]);
}

#[test]
fn nan_is_filled_with_row_mean_and_reported() {
    let table = build(HeatInput::mapping([
        ("Fe", vec![1.0, 2.0, f64::NAN]),
        ("O", vec![4.0, 5.0, 6.0]),
    ]));

    assert_eq!(table.get("Fe"), Some(&flat(&[1.0, 2.0, 1.5])));
    assert_eq!(table.get("O"), Some(&flat(&[4.0, 5.0, 6.0])));
    assert_eq!(table.warnings().len(), 1);
    assert!(table.warnings()[0].message.contains("Fe"));
    assert!(table.anomalies()["Fe"].contains(&AnomalyKind::Nan));
    assert!(!table.anomalies().contains_key("O"));
}

#[test]
fn zero_strategy_fills_nan_with_zero() {
    let options = NormalizeOptions::default().with_missing_strategy(MissingStrategy::Zero);
    let table = HeatTable::new(
        HeatInput::mapping([("Fe", vec![1.0, f64::NAN])]),
        &options,
    )
    .expect("table should build");
    assert_eq!(table.get("Fe"), Some(&flat(&[1.0, 0.0])));
}

#[test]
fn infinities_are_clipped_to_row_range() {
    let table = build(HeatInput::mapping([
        ("Fe", vec![1.0, 2.0, f64::INFINITY]),
        ("O", vec![4.0, 5.0, f64::NEG_INFINITY]),
    ]));

    assert_eq!(table.get("Fe"), Some(&flat(&[1.0, 2.0, 2.0])));
    assert_eq!(table.get("O"), Some(&flat(&[4.0, 5.0, 4.0])));
    assert!(table.anomalies()["O"].contains(&AnomalyKind::Inf));
}

#[test]
fn atomic_numbers_outside_the_table_are_rejected() {
    for key in [-1_i64, 0, 119, 200] {
        let error = HeatTable::new(
            HeatInput::mapping([(key, 0.0)]),
            &NormalizeOptions::default(),
        )
        .expect_err("out-of-range atomic number should fail");
        assert_eq!(error.placeholder(), "INPUT.ATOMIC_NUMBER_RANGE");
        assert_eq!(error.category(), PtableErrorCategory::InputValidationError);
        assert!(error.message().contains(&key.to_string()));
    }
}

#[test]
fn atomic_number_strings_resolve_like_integers() {
    let by_string = build(HeatInput::mapping([("26", 1.0), ("8", 2.0)]));
    let by_number = build(HeatInput::mapping([(26, 1.0), (8, 2.0)]));
    assert_eq!(by_string, by_number);
    assert_eq!(by_number.symbols(), vec!["Fe", "O"]);
}

#[test]
fn normalized_scalars_sum_to_one() {
    let options = NormalizeOptions::default().with_normalize(true);
    let table = HeatTable::new(
        HeatInput::mapping([("H", 1.0), ("C", 3.0), ("O", 4.0)]),
        &options,
    )
    .expect("table should build");

    let total: f64 = table.values().sum();
    assert!((total - 1.0).abs() < 1.0e-12);
    assert_eq!(table.get("O"), Some(&flat(&[0.5])));
}

#[test]
fn dropping_an_absent_symbol_changes_nothing() {
    let mut table = build(HeatInput::mapping([("H", 1.0), ("He", 2.0)]));
    let before = table.clone();
    table.drop_elements(&["Og"]);
    assert_eq!(table, before);

    table.drop_elements(&["H", "Og"]);
    assert_eq!(table.symbols(), vec!["He"]);
    assert_eq!(table.vmin(), Some(2.0));
}

#[test]
fn nested_rows_summarize_when_unchecked_and_fail_when_checked() {
    let nested = || {
        HeatInput::mapping([
            ("H", vec![vec![1.0, 2.0], vec![3.0]]),
            ("He", vec![vec![14.0]]),
        ])
    };

    let table = HeatTable::new(nested(), &NormalizeOptions::unchecked())
        .expect("unchecked nested table should build");
    assert_eq!(table.mean(), Some(5.0));
    assert_eq!(table.vmax(), Some(14.0));

    let error = HeatTable::new(nested(), &NormalizeOptions::default())
        .expect_err("checked nested table should fail");
    assert_eq!(error.placeholder(), "DATA.UNSUPPORTED_NESTING");
    assert_eq!(error.exit_code(), 4);
}

#[test]
fn json_documents_cover_every_shape() {
    let mapping = parse_heat_input(r#"{ "Fe": [1, 2, "NaN"], "O": [4, 5, 6] }"#)
        .expect("mapping should parse");
    let table = build(mapping);
    assert_eq!(table.get("Fe"), Some(&flat(&[1.0, 2.0, 1.5])));

    let series = parse_heat_input(r#"{ "name": "density", "index": ["H", "He"], "data": [1, 2] }"#)
        .expect("series should parse");
    let table = build(series);
    assert_eq!(table.name(), Some("density"));
    assert_eq!(table.symbols(), vec!["H", "He"]);

    let frame = parse_heat_input(
        r#"{ "index": ["x", "y"], "columns": ["H", "He"], "data": [[1, 3], [2, 4]] }"#,
    )
    .expect("frame should parse");
    let table = build(frame);
    assert_eq!(table.get("He"), Some(&flat(&[3.0, 4.0])));

    let error = parse_heat_input("[1, 2, 3]").expect_err("arrays are not a supported shape");
    assert_eq!(error.placeholder(), "INPUT.UNSUPPORTED_SHAPE");
}

#[test]
fn json_mapping_keeps_document_key_order() {
    let mapping = parse_heat_input(r#"{ "Na": 11, "H": 1, "26": 3 }"#)
        .expect("mapping should parse");
    let table = build(mapping);
    assert_eq!(table.symbols(), vec!["Na", "H", "Fe"]);
    assert_eq!(table.get("Fe"), Some(&flat(&[3.0])));
}
