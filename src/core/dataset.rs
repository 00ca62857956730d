use indexmap::{IndexMap, IndexSet};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::error::{ChartError, ChartResult};
use crate::render::Color;

/// Role of one column in the chart input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SeriesKind {
    /// Plotted values.
    Line,
    /// Shared index domain, usually unix timestamps in milliseconds.
    Axis,
}

impl SeriesKind {
    fn parse(raw: &str) -> Option<Self> {
        match raw {
            "line" => Some(Self::Line),
            "x" | "axis" => Some(Self::Axis),
            _ => None,
        }
    }
}

/// One typed column of the dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Series {
    pub id: String,
    pub kind: SeriesKind,
    pub values: Vec<f64>,
    /// Always present for line series.
    pub color: Option<Color>,
    pub display_name: String,
}

impl Series {
    #[must_use]
    pub fn line(
        id: impl Into<String>,
        display_name: impl Into<String>,
        color: Color,
        values: Vec<f64>,
    ) -> Self {
        Self {
            id: id.into(),
            kind: SeriesKind::Line,
            values,
            color: Some(color),
            display_name: display_name.into(),
        }
    }

    #[must_use]
    pub fn axis(id: impl Into<String>, values: Vec<f64>) -> Self {
        let id = id.into();
        Self {
            display_name: id.clone(),
            id,
            kind: SeriesKind::Axis,
            values,
            color: None,
        }
    }

    #[must_use]
    pub fn is_line(&self) -> bool {
        self.kind == SeriesKind::Line
    }
}

/// Raw columnar chart input.
///
/// Mirrors the common JSON layout where every column starts with its id:
/// `{"columns": [["x", 1542412800000, ...], ["y0", 37, ...]], "types": {...},
/// "names": {...}, "colors": {...}}`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawChartData {
    pub columns: Vec<Vec<Value>>,
    #[serde(default)]
    pub types: IndexMap<String, String>,
    #[serde(default)]
    pub names: IndexMap<String, String>,
    #[serde(default)]
    pub colors: IndexMap<String, String>,
}

impl RawChartData {
    pub fn from_json_str(input: &str) -> ChartResult<Self> {
        serde_json::from_str(input)
            .map_err(|e| ChartError::Validation(format!("failed to parse chart json: {e}")))
    }
}

/// Immutable, validated set of series sharing one index domain.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "DatasetRecord")]
pub struct Dataset {
    axis_id: String,
    series: IndexMap<String, Series>,
    sample_count: usize,
}

impl Dataset {
    /// Normalizes raw columns into typed series.
    pub fn normalize(raw: &RawChartData) -> ChartResult<Self> {
        let mut series = Vec::with_capacity(raw.columns.len());

        for (position, column) in raw.columns.iter().enumerate() {
            let (head, tail) = column.split_first().ok_or_else(|| {
                ChartError::Validation(format!("column #{position} is empty and has no id"))
            })?;
            let id = head.as_str().ok_or_else(|| {
                ChartError::Validation(format!("column #{position} must start with a string id"))
            })?;

            let kind_raw = raw
                .types
                .get(id)
                .ok_or_else(|| ChartError::Validation(format!("series `{id}` has no type")))?;
            let kind = SeriesKind::parse(kind_raw).ok_or_else(|| {
                ChartError::Validation(format!("series `{id}` has unknown type `{kind_raw}`"))
            })?;

            let values = tail
                .iter()
                .map(|value| {
                    value
                        .as_f64()
                        .filter(|v| v.is_finite())
                        .ok_or_else(|| {
                            ChartError::Validation(format!(
                                "series `{id}` contains a non-numeric value: {value}"
                            ))
                        })
                })
                .collect::<ChartResult<Vec<f64>>>()?;

            let next = match kind {
                SeriesKind::Axis => Series::axis(id, values),
                SeriesKind::Line => {
                    let color_raw = raw.colors.get(id).ok_or_else(|| {
                        ChartError::Validation(format!("series `{id}` has no color"))
                    })?;
                    let color = Color::from_hex(color_raw).map_err(|e| {
                        ChartError::Validation(format!("series `{id}` has an invalid color: {e}"))
                    })?;
                    let name = raw.names.get(id).map_or(id, String::as_str);
                    Series::line(id, name, color, values)
                }
            };
            series.push(next);
        }

        Self::from_series(series)
    }

    pub fn from_json_str(input: &str) -> ChartResult<Self> {
        Self::normalize(&RawChartData::from_json_str(input)?)
    }

    /// Builds a dataset from already typed series and checks every invariant.
    pub fn from_series(series: Vec<Series>) -> ChartResult<Self> {
        let mut axis_id: Option<String> = None;
        let mut line_len: Option<usize> = None;
        let mut by_id = IndexMap::with_capacity(series.len());

        for item in series {
            match item.kind {
                SeriesKind::Axis => {
                    if let Some(existing) = &axis_id {
                        return Err(ChartError::Validation(format!(
                            "dataset has two axis series: `{existing}` and `{}`",
                            item.id
                        )));
                    }
                    axis_id = Some(item.id.clone());
                }
                SeriesKind::Line => {
                    if item.color.is_none() {
                        return Err(ChartError::Validation(format!(
                            "series `{}` has no color",
                            item.id
                        )));
                    }
                    match line_len {
                        Some(len) if len != item.values.len() => {
                            return Err(ChartError::Validation(format!(
                                "series `{}` has {} samples, expected {len}",
                                item.id,
                                item.values.len()
                            )));
                        }
                        _ => line_len = Some(item.values.len()),
                    }
                }
            }
            if item.values.iter().any(|v| !v.is_finite()) {
                return Err(ChartError::Validation(format!(
                    "series `{}` contains non-finite values",
                    item.id
                )));
            }
            let id = item.id.clone();
            if by_id.insert(id.clone(), item).is_some() {
                return Err(ChartError::Validation(format!("duplicate series id `{id}`")));
            }
        }

        let axis_id = axis_id
            .ok_or_else(|| ChartError::Validation("dataset has no axis series".to_owned()))?;
        let axis_len = by_id[&axis_id].values.len();
        let sample_count = line_len.unwrap_or(axis_len);
        if axis_len != sample_count {
            return Err(ChartError::Validation(format!(
                "axis series has {axis_len} samples, line series have {sample_count}"
            )));
        }
        if sample_count < 2 {
            return Err(ChartError::Validation(
                "dataset needs at least 2 samples".to_owned(),
            ));
        }

        debug!(
            series = by_id.len(),
            sample_count, "normalized chart dataset"
        );
        Ok(Self {
            axis_id,
            series: by_id,
            sample_count,
        })
    }

    #[must_use]
    pub fn axis(&self) -> &Series {
        &self.series[&self.axis_id]
    }

    #[must_use]
    pub fn series(&self, id: &str) -> Option<&Series> {
        self.series.get(id)
    }

    /// All line series in input order.
    pub fn lines(&self) -> impl Iterator<Item = &Series> {
        self.series.values().filter(|s| s.is_line())
    }

    /// Line series not hidden by `visibility`, in input order.
    pub fn visible_lines<'a>(
        &'a self,
        visibility: &'a Visibility,
    ) -> impl Iterator<Item = &'a Series> + 'a {
        self.lines().filter(|s| visibility.is_visible(&s.id))
    }

    #[must_use]
    pub fn sample_count(&self) -> usize {
        self.sample_count
    }

    /// Last valid sample index; at least 1.
    #[must_use]
    pub fn last_index(&self) -> usize {
        self.sample_count - 1
    }
}

/// Serialized shape of [`Dataset`]; re-validated before a dataset is built from it.
#[derive(Deserialize)]
struct DatasetRecord {
    axis_id: String,
    series: IndexMap<String, Series>,
    sample_count: usize,
}

impl TryFrom<DatasetRecord> for Dataset {
    type Error = ChartError;

    fn try_from(record: DatasetRecord) -> ChartResult<Self> {
        if let Some((key, series)) = record.series.iter().find(|(key, s)| **key != s.id) {
            return Err(ChartError::Validation(format!(
                "series keyed `{key}` carries id `{}`",
                series.id
            )));
        }
        let dataset = Self::from_series(record.series.into_values().collect())?;
        if dataset.axis_id != record.axis_id || dataset.sample_count != record.sample_count {
            return Err(ChartError::Validation(format!(
                "stored axis `{}` with {} samples does not match series data",
                record.axis_id, record.sample_count
            )));
        }
        Ok(dataset)
    }
}

/// Hidden line ids. Kept apart from [`Dataset`] so toggles never touch input data.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Visibility {
    hidden: IndexSet<String>,
}

impl Visibility {
    #[must_use]
    pub fn is_visible(&self, id: &str) -> bool {
        !self.hidden.contains(id)
    }

    /// Flips one id and returns whether it is visible afterwards.
    pub fn toggle(&mut self, id: &str) -> bool {
        if self.hidden.shift_remove(id) {
            true
        } else {
            self.hidden.insert(id.to_owned());
            false
        }
    }

    pub fn hidden(&self) -> impl Iterator<Item = &str> {
        self.hidden.iter().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::{Dataset, RawChartData, Visibility};
    use crate::error::ChartError;

    const SAMPLE: &str = r##"{
        "columns": [
            ["x", 1542412800000, 1542499200000, 1542585600000],
            ["y0", 37, 20, 32],
            ["y1", 22, 12, 30]
        ],
        "types": {"y0": "line", "y1": "line", "x": "x"},
        "names": {"y0": "#0"},
        "colors": {"y0": "#3DC23F", "y1": "#F34C44"}
    }"##;

    #[test]
    fn normalizes_columns_with_leading_ids() {
        let dataset = Dataset::from_json_str(SAMPLE).expect("valid dataset");
        assert_eq!(dataset.sample_count(), 3);
        assert_eq!(dataset.last_index(), 2);
        assert_eq!(dataset.axis().id, "x");
        assert_eq!(dataset.axis().values[1], 1_542_499_200_000.0);

        let lines: Vec<_> = dataset.lines().map(|s| s.id.as_str()).collect();
        assert_eq!(lines, vec!["y0", "y1"]);
        assert_eq!(dataset.series("y0").expect("y0").display_name, "#0");
        assert_eq!(dataset.series("y1").expect("y1").display_name, "y1");
    }

    #[test]
    fn rejects_mismatched_line_lengths() {
        let mut raw = RawChartData::from_json_str(SAMPLE).expect("raw");
        raw.columns[2].pop();
        let err = Dataset::normalize(&raw).expect_err("length mismatch");
        assert!(matches!(err, ChartError::Validation(_)));
    }

    #[test]
    fn rejects_line_without_color() {
        let mut raw = RawChartData::from_json_str(SAMPLE).expect("raw");
        raw.colors.shift_remove("y1");
        let err = Dataset::normalize(&raw).expect_err("missing color");
        assert!(err.to_string().contains("y1"));
    }

    #[test]
    fn rejects_missing_axis() {
        let mut raw = RawChartData::from_json_str(SAMPLE).expect("raw");
        raw.columns.remove(0);
        assert!(Dataset::normalize(&raw).is_err());
    }

    #[test]
    fn serialized_dataset_is_revalidated() {
        let err = serde_json::from_str::<Dataset>(
            r#"{"axis_id":"x","series":{},"sample_count":0}"#,
        )
        .expect_err("empty dataset");
        assert!(err.to_string().contains("no axis series"));

        let dataset = Dataset::from_json_str(SAMPLE).expect("valid dataset");
        let json = serde_json::to_string(&dataset).expect("serialize");
        let restored: Dataset = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(restored, dataset);

        let tampered = json.replace("\"sample_count\":3", "\"sample_count\":2");
        assert!(serde_json::from_str::<Dataset>(&tampered).is_err());
    }

    #[test]
    fn visibility_toggle_round_trips() {
        let mut visibility = Visibility::default();
        assert!(visibility.is_visible("y0"));
        assert!(!visibility.toggle("y0"));
        assert!(!visibility.is_visible("y0"));
        assert!(visibility.toggle("y0"));
        assert!(visibility.is_visible("y0"));
    }
}
