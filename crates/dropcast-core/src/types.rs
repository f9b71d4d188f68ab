//! Tabular frames and the accepted model input shapes

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

use crate::error::{Error, Result};
use crate::record::FeatureRecord;

/// A small row-major table with named columns.
///
/// Every row has exactly one value per column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawFrame", into = "RawFrame")]
pub struct FeatureFrame {
    columns: Vec<String>,
    rows: Vec<Vec<f64>>,
}

/// Wire form of a frame, the same layout as a pandas `split` orientation
#[derive(Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawFrame {
    columns: Vec<String>,
    data: Vec<Vec<f64>>,
}

impl TryFrom<RawFrame> for FeatureFrame {
    type Error = Error;

    fn try_from(raw: RawFrame) -> Result<Self> {
        Self::new(raw.columns, raw.data)
    }
}

impl From<FeatureFrame> for RawFrame {
    fn from(frame: FeatureFrame) -> Self {
        Self {
            columns: frame.columns,
            data: frame.rows,
        }
    }
}

impl FeatureFrame {
    /// Create a frame, rejecting rows whose width differs from the column count
    pub fn new(columns: Vec<String>, rows: Vec<Vec<f64>>) -> Result<Self> {
        if let Some((idx, row)) = rows
            .iter()
            .enumerate()
            .find(|(_, row)| row.len() != columns.len())
        {
            return Err(Error::inference(format!(
                "row {} has {} values but the frame has {} columns",
                idx,
                row.len(),
                columns.len()
            )));
        }

        Ok(Self { columns, rows })
    }

    /// Build a one-row frame by zipping values against column names
    pub fn from_values(columns: &[String], values: Vec<f64>) -> Result<Self> {
        Self::new(columns.to_vec(), vec![values])
    }

    /// One-row frame from `(column, value)` pairs, in the given order
    pub fn from_pairs(pairs: impl IntoIterator<Item = (String, f64)>) -> Self {
        let (columns, values): (Vec<String>, Vec<f64>) = pairs.into_iter().unzip();
        Self {
            columns,
            rows: vec![values],
        }
    }

    /// Column names in order
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// All rows
    pub fn rows(&self) -> &[Vec<f64>] {
        &self.rows
    }

    /// A single row by index
    pub fn row(&self, idx: usize) -> Option<&[f64]> {
        self.rows.get(idx).map(Vec::as_slice)
    }

    pub fn num_rows(&self) -> usize {
        self.rows.len()
    }

    pub fn num_columns(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// One record in any of the shapes the inference adapter accepts
#[derive(Debug, Clone, PartialEq)]
pub enum ModelInput {
    /// Already tabular; columns must match the model schema exactly
    Table(FeatureFrame),

    /// Flat values in trained column order
    Sequence(Vec<f64>),

    /// Values keyed by trained column name
    Mapping(HashMap<String, f64>),
}

impl ModelInput {
    /// Name of the shape, for logs and error messages
    pub fn shape(&self) -> &'static str {
        match self {
            Self::Table(_) => "table",
            Self::Sequence(_) => "sequence",
            Self::Mapping(_) => "mapping",
        }
    }
}

impl From<FeatureFrame> for ModelInput {
    fn from(frame: FeatureFrame) -> Self {
        Self::Table(frame)
    }
}

impl From<Vec<f64>> for ModelInput {
    fn from(values: Vec<f64>) -> Self {
        Self::Sequence(values)
    }
}

impl From<HashMap<String, f64>> for ModelInput {
    fn from(mapping: HashMap<String, f64>) -> Self {
        Self::Mapping(mapping)
    }
}

impl From<&FeatureRecord> for ModelInput {
    fn from(record: &FeatureRecord) -> Self {
        Self::Mapping(record.to_mapping())
    }
}

impl TryFrom<Value> for ModelInput {
    type Error = Error;

    /// Classify a JSON document into one of the accepted shapes.
    ///
    /// An object holding exactly a `columns` array of strings and a `data`
    /// array of rows is a table, any other all-numeric object is a mapping,
    /// and an all-numeric array is a sequence. Nothing else is coerced. A
    /// table whose rows do not match its columns is an inference error.
    fn try_from(value: Value) -> Result<Self> {
        match value {
            Value::Object(object) if is_split_frame(&object) => {
                table_from(&object).map(Self::Table)
            }
            Value::Object(object) => {
                let mut mapping = HashMap::with_capacity(object.len());
                for (name, value) in object {
                    let number = value.as_f64().ok_or_else(|| {
                        Error::unsupported_input(format!(
                            "field '{}' is {}, expected a number",
                            name,
                            json_kind(&value)
                        ))
                    })?;
                    mapping.insert(name, number);
                }
                Ok(Self::Mapping(mapping))
            }
            Value::Array(items) => items
                .iter()
                .enumerate()
                .map(|(idx, item)| {
                    item.as_f64().ok_or_else(|| {
                        Error::unsupported_input(format!(
                            "element {} is {}, expected a number",
                            idx,
                            json_kind(item)
                        ))
                    })
                })
                .collect::<Result<Vec<_>>>()
                .map(Self::Sequence),
            other => Err(Error::unsupported_input(format!(
                "expected a table, a sequence, or a mapping, got {}",
                json_kind(&other)
            ))),
        }
    }
}

/// `columns` is an array of strings and `data` an array of arrays, nothing else
fn is_split_frame(object: &serde_json::Map<String, Value>) -> bool {
    let columns = object.get("columns").and_then(Value::as_array);
    let data = object.get("data").and_then(Value::as_array);

    object.len() == 2
        && columns.is_some_and(|columns| columns.iter().all(Value::is_string))
        && data.is_some_and(|rows| rows.iter().all(Value::is_array))
}

/// Build a frame from a split-shaped object. Width mismatches are left to
/// `FeatureFrame::new`.
fn table_from(object: &serde_json::Map<String, Value>) -> Result<FeatureFrame> {
    let columns: Vec<String> = object
        .get("columns")
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(|item| item.as_str().map(str::to_string))
                .collect()
        })
        .unwrap_or_default();

    let mut rows = Vec::new();
    let data = object.get("data").and_then(Value::as_array);
    for (row_idx, row) in data.into_iter().flatten().enumerate() {
        let cells = row.as_array().map(Vec::as_slice).unwrap_or_default();
        let values = cells
            .iter()
            .enumerate()
            .map(|(idx, cell)| {
                cell.as_f64().ok_or_else(|| {
                    Error::unsupported_input(format!(
                        "table cell ({}, {}) is {}, expected a number",
                        row_idx,
                        idx,
                        json_kind(cell)
                    ))
                })
            })
            .collect::<Result<Vec<_>>>()?;
        rows.push(values);
    }

    FeatureFrame::new(columns, rows)
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_frame_rejects_ragged_rows() {
        let columns = vec!["a".to_string(), "b".to_string()];
        let err = FeatureFrame::new(columns, vec![vec![1.0, 2.0], vec![3.0]]).unwrap_err();
        assert!(matches!(err, Error::Inference(_)));
    }

    #[test]
    fn test_from_values_length_mismatch() {
        let columns = vec!["a".to_string(), "b".to_string()];
        assert!(FeatureFrame::from_values(&columns, vec![1.0, 2.0]).is_ok());
        assert!(matches!(
            FeatureFrame::from_values(&columns, vec![1.0]),
            Err(Error::Inference(_))
        ));
    }

    #[test]
    fn test_from_pairs_keeps_order() {
        let frame = FeatureFrame::from_pairs(vec![("b".to_string(), 2.0), ("a".to_string(), 1.0)]);
        assert_eq!(frame.columns(), &["b".to_string(), "a".to_string()]);
        assert_eq!(frame.row(0), Some(&[2.0, 1.0][..]));
    }

    #[test]
    fn test_json_array_is_sequence() {
        let input = ModelInput::try_from(json!([1, 2.5, 0])).unwrap();
        assert_eq!(input, ModelInput::Sequence(vec![1.0, 2.5, 0.0]));
        assert_eq!(input.shape(), "sequence");
    }

    #[test]
    fn test_json_object_is_mapping() {
        let input = ModelInput::try_from(json!({"Debtor": 1, "GDP": 1.74})).unwrap();
        match input {
            ModelInput::Mapping(mapping) => {
                assert_eq!(mapping.len(), 2);
                assert_eq!(mapping["GDP"], 1.74);
            }
            other => panic!("expected mapping, got {:?}", other),
        }
    }

    #[test]
    fn test_json_split_object_is_table() {
        let input = ModelInput::try_from(json!({
            "columns": ["Debtor", "GDP"],
            "data": [[0, 1.74]]
        }))
        .unwrap();
        match input {
            ModelInput::Table(frame) => {
                assert_eq!(frame.columns(), &["Debtor".to_string(), "GDP".to_string()]);
                assert_eq!(frame.row(0), Some(&[0.0, 1.74][..]));
            }
            other => panic!("expected table, got {:?}", other),
        }
    }

    #[test]
    fn test_json_scalars_are_unsupported() {
        for value in [json!(3), json!("3"), json!(null), json!(true)] {
            let err = ModelInput::try_from(value).unwrap_err();
            assert!(matches!(err, Error::UnsupportedInput(_)), "{}", err);
        }
    }

    #[test]
    fn test_json_non_numeric_values_are_not_coerced() {
        assert!(matches!(
            ModelInput::try_from(json!({"Debtor": "1"})),
            Err(Error::UnsupportedInput(_))
        ));
        assert!(matches!(
            ModelInput::try_from(json!([1, "2"])),
            Err(Error::UnsupportedInput(_))
        ));
        assert!(matches!(
            ModelInput::try_from(json!([[1, 2]])),
            Err(Error::UnsupportedInput(_))
        ));
    }

    #[test]
    fn test_json_ragged_table_is_inference_error() {
        let err =
            ModelInput::try_from(json!({"columns": ["a", "b"], "data": [[1.0]]})).unwrap_err();
        assert!(matches!(err, Error::Inference(_)), "{}", err);
        assert!(err.to_string().contains("row 0 has 1 values"));
    }

    #[test]
    fn test_json_numeric_columns_and_data_is_mapping() {
        let input = ModelInput::try_from(json!({"columns": 1, "data": 2})).unwrap();
        match input {
            ModelInput::Mapping(mapping) => {
                assert_eq!(mapping["columns"], 1.0);
                assert_eq!(mapping["data"], 2.0);
            }
            other => panic!("expected mapping, got {:?}", other),
        }
    }

    #[test]
    fn test_json_table_cells_are_not_coerced() {
        let err = ModelInput::try_from(json!({"columns": ["a"], "data": [["1"]]})).unwrap_err();
        assert!(matches!(err, Error::UnsupportedInput(_)), "{}", err);
    }

    #[test]
    fn test_json_malformed_table() {
        let err = ModelInput::try_from(json!({"columns": "Debtor", "data": [[1]]})).unwrap_err();
        assert!(matches!(err, Error::UnsupportedInput(_)));
    }
}
