//! Fixed feature schema and validated feature rows.
//!
//! A [`FeatureRow`] can only be built through a [`FeatureSchema`], so every row
//! that reaches the model has exactly the schema's columns in the schema's order.

use std::collections::{BTreeMap, HashSet};
use std::ops::RangeInclusive;

use serde::Serialize;

use crate::error::{RatecastError, Result};

/// One batch input record: feature name -> value.
pub type Record = BTreeMap<String, f64>;

/// Ordered list of the feature names a model was trained on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FeatureSchema {
    names: Vec<String>,
}

impl FeatureSchema {
    /// Schema whose columns are consecutive year labels, e.g. `"1980"`..`"2023"`.
    pub fn years(range: RangeInclusive<i32>) -> Self {
        Self {
            names: range.map(|year| year.to_string()).collect(),
        }
    }

    pub fn from_names<I, S>(names: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let names: Vec<String> = names.into_iter().map(Into::into).collect();
        if names.is_empty() {
            return Err(RatecastError::SchemaMismatch(
                "schema must have at least one feature".to_string(),
            ));
        }
        let mut seen = HashSet::new();
        for name in &names {
            if !seen.insert(name.as_str()) {
                return Err(RatecastError::SchemaMismatch(format!(
                    "duplicate feature name {name:?}"
                )));
            }
        }
        Ok(Self { names })
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Check that a model-declared column list is exactly this schema.
    pub fn ensure_matches(&self, declared: &[String]) -> Result<()> {
        if declared == self.names.as_slice() {
            return Ok(());
        }

        let expected: HashSet<&str> = self.names.iter().map(String::as_str).collect();
        let got: HashSet<&str> = declared.iter().map(String::as_str).collect();

        let missing: Vec<&str> = self
            .names
            .iter()
            .map(String::as_str)
            .filter(|n| !got.contains(n))
            .collect();
        let unexpected: Vec<&str> = declared
            .iter()
            .map(String::as_str)
            .filter(|n| !expected.contains(n))
            .collect();

        if missing.is_empty() && unexpected.is_empty() {
            return Err(RatecastError::SchemaMismatch(
                "model feature names are in a different order than the schema".to_string(),
            ));
        }
        Err(mismatch(&missing, &unexpected))
    }

    /// Build a row from an unordered record. The record must carry exactly the
    /// schema's names; values are laid out in schema order.
    pub fn row_from_record(&self, record: &Record) -> Result<FeatureRow> {
        let missing: Vec<&str> = self
            .names
            .iter()
            .map(String::as_str)
            .filter(|n| !record.contains_key(*n))
            .collect();
        let unexpected: Vec<&str> = record
            .keys()
            .map(String::as_str)
            .filter(|k| !self.names.iter().any(|n| n == k))
            .collect();

        if !missing.is_empty() || !unexpected.is_empty() {
            return Err(mismatch(&missing, &unexpected));
        }

        let values = self.names.iter().map(|n| record[n]).collect();
        Ok(FeatureRow { values })
    }

    /// Build a row from ordered `(name, value)` pairs. Names and order must
    /// both match the schema.
    pub fn row_from_pairs<S: AsRef<str>>(&self, pairs: &[(S, f64)]) -> Result<FeatureRow> {
        if pairs.len() != self.names.len() {
            let names: Vec<String> = pairs.iter().map(|(n, _)| n.as_ref().to_string()).collect();
            self.ensure_matches(&names)?;
            return Err(RatecastError::SchemaMismatch(format!(
                "expected {} columns, got {}",
                self.names.len(),
                pairs.len()
            )));
        }

        for (idx, ((name, _), expected)) in pairs.iter().zip(&self.names).enumerate() {
            if name.as_ref() != expected {
                return Err(RatecastError::SchemaMismatch(format!(
                    "column {idx} is {:?}, expected {expected:?}",
                    name.as_ref()
                )));
            }
        }

        Ok(FeatureRow {
            values: pairs.iter().map(|(_, v)| *v).collect(),
        })
    }

    /// Build a row from positional values (one per schema column).
    pub fn row_from_values(&self, values: Vec<f64>) -> Result<FeatureRow> {
        if values.len() != self.names.len() {
            return Err(RatecastError::SchemaMismatch(format!(
                "expected {} columns, got {}",
                self.names.len(),
                values.len()
            )));
        }
        Ok(FeatureRow { values })
    }
}

fn mismatch(missing: &[&str], unexpected: &[&str]) -> RatecastError {
    let mut parts = Vec::new();
    if !missing.is_empty() {
        parts.push(format!("missing columns [{}]", missing.join(", ")));
    }
    if !unexpected.is_empty() {
        parts.push(format!("unexpected columns [{}]", unexpected.join(", ")));
    }
    RatecastError::SchemaMismatch(parts.join(", "))
}

/// One validated input row, values in schema order.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureRow {
    values: Vec<f64>,
}

impl FeatureRow {
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(schema: &FeatureSchema, value: f64) -> Record {
        schema.names().iter().map(|n| (n.clone(), value)).collect()
    }

    #[test]
    fn year_schema_has_44_columns() {
        let schema = FeatureSchema::years(1980..=2023);
        assert_eq!(schema.len(), 44);
        assert_eq!(schema.names().first().map(String::as_str), Some("1980"));
        assert_eq!(schema.names().last().map(String::as_str), Some("2023"));
    }

    #[test]
    fn row_from_record_uses_schema_order() {
        let schema = FeatureSchema::from_names(["b", "a", "c"]).unwrap();
        let rec: Record = [("a".to_string(), 1.0), ("b".to_string(), 2.0), ("c".to_string(), 3.0)]
            .into_iter()
            .collect();
        let row = schema.row_from_record(&rec).unwrap();
        assert_eq!(row.values(), &[2.0, 1.0, 3.0]);
    }

    #[test]
    fn missing_column_is_schema_mismatch() {
        let schema = FeatureSchema::years(1980..=2023);
        let mut rec = record(&schema, 1.5);
        rec.remove("1980");

        let err = schema.row_from_record(&rec).unwrap_err();
        assert!(matches!(err, RatecastError::SchemaMismatch(_)));
        assert!(err.to_string().contains("missing columns [1980]"));
    }

    #[test]
    fn extra_column_is_schema_mismatch() {
        let schema = FeatureSchema::years(1980..=1982);
        let mut rec = record(&schema, 0.0);
        rec.insert("2024".to_string(), 9.0);

        let err = schema.row_from_record(&rec).unwrap_err();
        assert!(err.to_string().contains("unexpected columns [2024]"));
    }

    #[test]
    fn pairs_out_of_order_are_rejected() {
        let schema = FeatureSchema::years(1980..=1981);
        let err = schema
            .row_from_pairs(&[("1981", 1.0), ("1980", 2.0)])
            .unwrap_err();
        assert!(err.to_string().contains("column 0"));

        let row = schema.row_from_pairs(&[("1980", 2.0), ("1981", 1.0)]).unwrap();
        assert_eq!(row.values(), &[2.0, 1.0]);
    }

    #[test]
    fn pairs_with_missing_name_report_the_name() {
        let schema = FeatureSchema::years(1980..=1982);
        let err = schema
            .row_from_pairs(&[("1981", 1.0), ("1982", 2.0)])
            .unwrap_err();
        assert!(err.to_string().contains("1980"));
    }

    #[test]
    fn ensure_matches_detects_reordering() {
        let schema = FeatureSchema::from_names(["x", "y"]).unwrap();
        assert!(schema.ensure_matches(&["x".into(), "y".into()]).is_ok());
        let err = schema.ensure_matches(&["y".into(), "x".into()]).unwrap_err();
        assert!(err.to_string().contains("different order"));
    }

    #[test]
    fn duplicate_names_are_rejected() {
        assert!(FeatureSchema::from_names(["a", "a"]).is_err());
        assert!(FeatureSchema::from_names(Vec::<String>::new()).is_err());
    }

    #[test]
    fn positional_width_is_checked() {
        let schema = FeatureSchema::years(1980..=1982);
        assert!(schema.row_from_values(vec![1.0, 2.0]).is_err());
        assert_eq!(schema.row_from_values(vec![1.0, 2.0, 3.0]).unwrap().len(), 3);
    }
}
