use serde_json::Value as JsonValue;

use super::model::{CodeValue, CodedItem, CodingTable};
use crate::error::{AgreementError, Result};

// ---------------------------------------------------------------------------
// Records-oriented JSON
// ---------------------------------------------------------------------------

impl CodingTable {
    /// Build a table from an already-parsed records array
    /// (the default `df.to_json(orient='records')` layout):
    ///
    /// ```json
    /// [
    ///   { "doc": "d1", "theme_ann": "X", "theme_bob": "X" },
    ///   { "doc": "d2", "theme_ann": "Y", "theme_bob": null }
    /// ]
    /// ```
    ///
    /// Nested arrays and objects are kept as their JSON text.
    pub fn from_json_records(root: &JsonValue) -> Result<Self> {
        let records = root
            .as_array()
            .ok_or_else(|| AgreementError::InvalidRecords("expected a JSON array".to_string()))?;

        let mut items = Vec::with_capacity(records.len());
        for (i, rec) in records.iter().enumerate() {
            let obj = rec.as_object().ok_or_else(|| {
                AgreementError::InvalidRecords(format!("row {i} is not a JSON object"))
            })?;
            items.push(
                obj.iter()
                    .map(|(key, val)| (key.clone(), CodeValue::from(val)))
                    .collect::<CodedItem>(),
            );
        }

        Ok(CodingTable::from_items(items))
    }
}

impl From<&JsonValue> for CodeValue {
    fn from(val: &JsonValue) -> Self {
        match val {
            JsonValue::String(s) => CodeValue::String(s.clone()),
            JsonValue::Number(n) => {
                if let Some(i) = n.as_i64() {
                    CodeValue::Integer(i)
                } else if let Some(f) = n.as_f64() {
                    CodeValue::Float(f)
                } else {
                    CodeValue::String(n.to_string())
                }
            }
            JsonValue::Bool(b) => CodeValue::Bool(*b),
            JsonValue::Null => CodeValue::Null,
            other => CodeValue::String(other.to_string()),
        }
    }
}

// ---------------------------------------------------------------------------
// Raw text cells
// ---------------------------------------------------------------------------

impl CodeValue {
    /// Guess the type of a raw text cell, e.g. one read from a CSV field.
    ///
    /// Empty text, `NA` and `NaN` are missing.
    pub fn from_cell_text(s: &str) -> CodeValue {
        let s = s.trim();
        if s.is_empty() || s == "NA" || s == "NaN" || s == "nan" {
            return CodeValue::Null;
        }
        if let Ok(i) = s.parse::<i64>() {
            return CodeValue::Integer(i);
        }
        if let Ok(f) = s.parse::<f64>() {
            return CodeValue::Float(f);
        }
        if s == "true" || s == "false" {
            return CodeValue::Bool(s == "true");
        }
        CodeValue::String(s.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_from_json_records() {
        let root = json!([
            { "doc": "d1", "theme_ann": "X", "theme_bob": 3 },
            { "doc": "d2", "theme_ann": null, "theme_bob": 2.5, "flag": true }
        ]);
        let table = CodingTable::from_json_records(&root).unwrap();

        assert_eq!(table.len(), 2);
        assert!(table.has_column("flag"));
        assert_eq!(table.cell(0, "theme_bob"), &CodeValue::Integer(3));
        assert_eq!(table.cell(1, "theme_bob"), &CodeValue::Float(2.5));
        assert!(table.cell(1, "theme_ann").is_missing());
        assert!(table.cell(0, "flag").is_missing());
    }

    #[test]
    fn test_from_json_records_rejects_non_records() {
        let err = CodingTable::from_json_records(&json!({ "doc": "d1" })).unwrap_err();
        assert!(matches!(err, AgreementError::InvalidRecords(_)));

        let err = CodingTable::from_json_records(&json!([1, 2])).unwrap_err();
        assert_eq!(
            err,
            AgreementError::InvalidRecords("row 0 is not a JSON object".to_string())
        );
    }

    #[test]
    fn test_from_cell_text() {
        assert_eq!(CodeValue::from_cell_text(""), CodeValue::Null);
        assert_eq!(CodeValue::from_cell_text("NaN"), CodeValue::Null);
        assert_eq!(CodeValue::from_cell_text("12"), CodeValue::Integer(12));
        assert_eq!(CodeValue::from_cell_text("1.5"), CodeValue::Float(1.5));
        assert_eq!(CodeValue::from_cell_text("false"), CodeValue::Bool(false));
        assert_eq!(
            CodeValue::from_cell_text(" praise "),
            CodeValue::from("praise")
        );
    }
}
