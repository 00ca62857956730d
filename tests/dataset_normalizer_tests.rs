use brush_chart::ChartError;
use brush_chart::core::{Dataset, SeriesKind, Visibility};

fn chart_json(columns: &str, types: &str, colors: &str) -> String {
    format!(r#"{{"columns": {columns}, "types": {types}, "colors": {colors}}}"#)
}

fn validation_error(input: &str) -> String {
    match Dataset::from_json_str(input) {
        Err(ChartError::Validation(message)) => message,
        other => panic!("expected validation error, got {other:?}"),
    }
}

#[test]
fn axis_alias_and_ordering_are_kept() {
    let input = chart_json(
        r#"[["y1", 3, 4], ["t", 10, 20], ["y0", 1, 2]]"#,
        r#"{"t": "axis", "y0": "line", "y1": "line"}"#,
        r##"{"y0": "#fff", "y1": "#000"}"##,
    );
    let dataset = Dataset::from_json_str(&input).expect("valid dataset");

    assert_eq!(dataset.axis().id, "t");
    assert_eq!(dataset.axis().kind, SeriesKind::Axis);
    let ids: Vec<_> = dataset.lines().map(|s| s.id.as_str()).collect();
    assert_eq!(ids, vec!["y1", "y0"]);

    let mut visibility = Visibility::default();
    visibility.toggle("y1");
    let visible: Vec<_> = dataset
        .visible_lines(&visibility)
        .map(|s| s.id.as_str())
        .collect();
    assert_eq!(visible, vec!["y0"]);
}

#[test]
fn unknown_type_is_rejected() {
    let input = chart_json(
        r#"[["x", 1, 2], ["y0", 1, 2]]"#,
        r#"{"x": "x", "y0": "bar"}"#,
        r##"{"y0": "#fff"}"##,
    );
    assert!(validation_error(&input).contains("bar"));
}

#[test]
fn non_numeric_value_is_rejected() {
    let input = chart_json(
        r#"[["x", 1, 2], ["y0", 1, "two"]]"#,
        r#"{"x": "x", "y0": "line"}"#,
        r##"{"y0": "#fff"}"##,
    );
    assert!(validation_error(&input).contains("y0"));
}

#[test]
fn malformed_color_is_rejected() {
    let input = chart_json(
        r#"[["x", 1, 2], ["y0", 1, 2]]"#,
        r#"{"x": "x", "y0": "line"}"#,
        r#"{"y0": "green"}"#,
    );
    assert!(validation_error(&input).contains("invalid color"));
}

#[test]
fn single_sample_domain_is_rejected() {
    let input = chart_json(
        r#"[["x", 1], ["y0", 1]]"#,
        r#"{"x": "x", "y0": "line"}"#,
        r##"{"y0": "#fff"}"##,
    );
    assert!(validation_error(&input).contains("at least 2"));
}

#[test]
fn axis_length_must_match_lines() {
    let input = chart_json(
        r#"[["x", 1, 2, 3], ["y0", 1, 2]]"#,
        r#"{"x": "x", "y0": "line"}"#,
        r##"{"y0": "#fff"}"##,
    );
    assert!(validation_error(&input).contains("axis series"));
}

#[test]
fn second_axis_is_rejected() {
    let input = chart_json(
        r#"[["x", 1, 2], ["t", 1, 2], ["y0", 1, 2]]"#,
        r#"{"x": "x", "t": "x", "y0": "line"}"#,
        r##"{"y0": "#fff"}"##,
    );
    assert!(validation_error(&input).contains("two axis"));
}

#[test]
fn unparsable_json_is_a_validation_error() {
    assert!(validation_error("{not json").contains("failed to parse"));
}

#[test]
fn plus_signed_hex_color_is_rejected() {
    let input = chart_json(
        r#"[["x", 1, 2], ["y0", 1, 2]]"#,
        r#"{"x": "x", "y0": "line"}"#,
        r##"{"y0": "#+f+f+f"}"##,
    );
    assert!(validation_error(&input).contains("invalid color"));
}

#[test]
fn serialized_dataset_without_axis_is_rejected() {
    let err = serde_json::from_str::<Dataset>(r#"{"axis_id":"x","series":{},"sample_count":0}"#)
        .expect_err("invariants are checked on deserialize");
    assert!(err.to_string().contains("dataset validation failed"));
}
