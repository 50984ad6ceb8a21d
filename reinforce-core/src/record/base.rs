//! Base implementation of records.
use crate::error::ReinforceError;
use chrono::prelude::{DateTime, Local};
use std::collections::HashMap;

/// Represents possible types of values in a [`Record`].
#[derive(Debug, Clone, PartialEq)]
pub enum RecordValue {
    /// A scalar, e.g., an iteration count or a gradient norm.
    Scalar(f32),

    /// A timestamp with local timezone.
    DateTime(DateTime<Local>),

    /// A 1-dimensional array, e.g., the returns of evaluation episodes.
    Array1(Vec<f32>),
}

/// A container of named values.
///
/// If a record is merged into another and both contain the same key, the
/// value of the merged record wins.
#[derive(Debug, Clone, Default)]
pub struct Record(HashMap<String, RecordValue>);

impl Record {
    /// Creates an empty record.
    pub fn empty() -> Self {
        Self(HashMap::new())
    }

    /// Creates a record containing a single scalar value.
    pub fn from_scalar(name: impl Into<String>, value: f32) -> Self {
        Self(HashMap::from([(name.into(), RecordValue::Scalar(value))]))
    }

    /// Creates a record from a slice of key-value pairs.
    pub fn from_slice<K: Into<String> + Clone>(s: &[(K, RecordValue)]) -> Self {
        Self(
            s.iter()
                .map(|(k, v)| (k.clone().into(), v.clone()))
                .collect(),
        )
    }

    /// Inserts a key-value pair into the record.
    pub fn insert(&mut self, k: impl Into<String>, v: RecordValue) {
        self.0.insert(k.into(), v);
    }

    /// Gets a reference to the value associated with the given key.
    pub fn get(&self, k: &str) -> Option<&RecordValue> {
        self.0.get(k)
    }

    /// Merges another record into this one in place.
    pub fn merge_inplace(&mut self, record: Record) {
        self.0.extend(record.0);
    }

    /// Gets a scalar value from the record.
    pub fn get_scalar(&self, k: &str) -> Result<f32, ReinforceError> {
        match self.0.get(k) {
            Some(RecordValue::Scalar(v)) => Ok(*v),
            Some(_) => Err(ReinforceError::RecordValueTypeError("Scalar".to_string())),
            None => Err(ReinforceError::RecordKeyError(k.to_string())),
        }
    }

    /// Gets a 1-dimensional array from the record.
    pub fn get_array1(&self, k: &str) -> Result<Vec<f32>, ReinforceError> {
        match self.0.get(k) {
            Some(RecordValue::Array1(v)) => Ok(v.clone()),
            Some(_) => Err(ReinforceError::RecordValueTypeError("Array1".to_string())),
            None => Err(ReinforceError::RecordKeyError(k.to_string())),
        }
    }

    /// Gets a timestamp from the record.
    pub fn get_datetime(&self, k: &str) -> Result<DateTime<Local>, ReinforceError> {
        match self.0.get(k) {
            Some(RecordValue::DateTime(t)) => Ok(*t),
            Some(_) => Err(ReinforceError::RecordValueTypeError("DateTime".to_string())),
            None => Err(ReinforceError::RecordKeyError(k.to_string())),
        }
    }

    /// Returns `true` if the record contains no values.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The number of values in the record.
    pub fn len(&self) -> usize {
        self.0.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merge_prefers_merged() {
        let mut r = Record::from_slice(&[
            ("a", RecordValue::Scalar(1.0)),
            ("b", RecordValue::Array1(vec![0.5])),
        ]);
        r.merge_inplace(Record::from_scalar("a", 2.0));

        assert_eq!(r.len(), 2);
        assert_eq!(r.get_scalar("a").unwrap(), 2.0);
        assert_eq!(r.get_array1("b").unwrap(), vec![0.5]);
    }

    #[test]
    fn test_typed_getters_report_errors() {
        let mut r = Record::empty();
        r.insert("rewards", RecordValue::Array1(vec![1.0, 2.0]));
        let now = Local::now();
        r.insert("time", RecordValue::DateTime(now));

        assert_eq!(r.get_array1("rewards").unwrap(), vec![1.0, 2.0]);
        assert_eq!(r.get_datetime("time").unwrap(), now);
        assert_eq!(
            r.get_scalar("rewards"),
            Err(ReinforceError::RecordValueTypeError("Scalar".to_string()))
        );
        assert_eq!(
            r.get_datetime("rewards"),
            Err(ReinforceError::RecordValueTypeError("DateTime".to_string()))
        );
        assert_eq!(
            r.get_scalar("missing"),
            Err(ReinforceError::RecordKeyError("missing".to_string()))
        );
    }
}
