use serde::Serialize;
use serde_json::{Map, Value};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ReportError {
    #[error("Report field already present: {0}")]
    DuplicateField(String),
    #[error("Report field is not an object: {0}")]
    NotAnObject(String),
    #[error("Failed to serialize report field: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// The structured output shared by every node of a collector tree.
///
/// Fields are append-only: [`Report::insert`] refuses to overwrite an
/// existing key, so two collectors can only clobber each other through an
/// explicit [`Report::replace`]. Keys keep their insertion order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Report {
    fields: Map<String, Value>,
}

/// A nested object inside a [`Report`]
#[derive(Debug)]
pub struct Section<'a> {
    fields: &'a mut Map<String, Value>,
}

impl Report {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert<V: Serialize>(&mut self, key: impl Into<String>, value: V) -> Result<(), ReportError> {
        insert_field(&mut self.fields, key.into(), value)
    }

    pub fn replace<V: Serialize>(
        &mut self,
        key: impl Into<String>,
        value: V,
    ) -> Result<Option<Value>, ReportError> {
        Ok(self.fields.insert(key.into(), serde_json::to_value(value)?))
    }

    /// Obtain the object stored under `key`, creating an empty one if absent
    pub fn section(&mut self, key: impl Into<String>) -> Result<Section<'_>, ReportError> {
        section_of(&mut self.fields, key.into())
    }

    /// Append every field of `other`. Objects present on both sides are
    /// merged recursively, any other collision is a duplicate field.
    pub fn merge(&mut self, other: Report) -> Result<(), ReportError> {
        merge_fields(&mut self.fields, other.fields)
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &String> {
        self.fields.keys()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn into_value(self) -> Value {
        Value::Object(self.fields)
    }

    pub fn to_json_string(&self) -> Result<String, ReportError> {
        Ok(serde_json::to_string(&self.fields)?)
    }

    pub fn to_json_string_pretty(&self) -> Result<String, ReportError> {
        Ok(serde_json::to_string_pretty(&self.fields)?)
    }
}

impl Serialize for Report {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.fields.serialize(serializer)
    }
}

impl Section<'_> {
    pub fn insert<V: Serialize>(&mut self, key: impl Into<String>, value: V) -> Result<(), ReportError> {
        insert_field(self.fields, key.into(), value)
    }

    pub fn replace<V: Serialize>(
        &mut self,
        key: impl Into<String>,
        value: V,
    ) -> Result<Option<Value>, ReportError> {
        Ok(self.fields.insert(key.into(), serde_json::to_value(value)?))
    }

    pub fn section(&mut self, key: impl Into<String>) -> Result<Section<'_>, ReportError> {
        section_of(self.fields, key.into())
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }
}

fn insert_field<V: Serialize>(
    fields: &mut Map<String, Value>,
    key: String,
    value: V,
) -> Result<(), ReportError> {
    if fields.contains_key(&key) {
        return Err(ReportError::DuplicateField(key));
    }
    let value = serde_json::to_value(value)?;
    fields.insert(key, value);
    Ok(())
}

fn section_of(fields: &mut Map<String, Value>, key: String) -> Result<Section<'_>, ReportError> {
    match fields
        .entry(key.clone())
        .or_insert_with(|| Value::Object(Map::new()))
    {
        Value::Object(fields) => Ok(Section { fields }),
        _ => Err(ReportError::NotAnObject(key)),
    }
}

fn merge_fields(into: &mut Map<String, Value>, from: Map<String, Value>) -> Result<(), ReportError> {
    for (key, value) in from {
        match (into.get_mut(&key), value) {
            (None, value) => {
                into.insert(key, value);
            }
            (Some(Value::Object(existing)), Value::Object(incoming)) => {
                merge_fields(existing, incoming)?;
            }
            (Some(_), _) => return Err(ReportError::DuplicateField(key)),
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_insert_refuses_overwrite() {
        let mut report = Report::new();
        report.insert("total_reads", 10).unwrap();
        let err = report.insert("total_reads", 11).unwrap_err();
        assert!(matches!(err, ReportError::DuplicateField(ref k) if k == "total_reads"));
        assert_eq!(report.get("total_reads"), Some(&json!(10)));
    }

    #[test]
    fn test_replace_is_explicit_overwrite() {
        let mut report = Report::new();
        report.insert("count", 1).unwrap();
        let previous = report.replace("count", 2).unwrap();
        assert_eq!(previous, Some(json!(1)));
        assert_eq!(report.get("count"), Some(&json!(2)));
    }

    #[test]
    fn test_sections_are_shared_between_writers() {
        let mut report = Report::new();
        report.section("basic").unwrap().insert("mapped", 3).unwrap();
        report.section("basic").unwrap().insert("unmapped", 1).unwrap();
        assert_eq!(report.into_value(), json!({"basic": {"mapped": 3, "unmapped": 1}}));
    }

    #[test]
    fn test_section_over_scalar_fails() {
        let mut report = Report::new();
        report.insert("basic", 1).unwrap();
        assert!(matches!(report.section("basic"), Err(ReportError::NotAnObject(_))));
    }

    #[test]
    fn test_merge_combines_objects() {
        let mut left = Report::new();
        left.section("mapq").unwrap().insert("mean", 40.0).unwrap();
        let mut right = Report::new();
        right.section("mapq").unwrap().insert("count", 7).unwrap();
        right.insert("extra", true).unwrap();

        left.merge(right).unwrap();
        assert_eq!(
            left.into_value(),
            json!({"mapq": {"mean": 40.0, "count": 7}, "extra": true})
        );
    }

    #[test]
    fn test_merge_scalar_conflict() {
        let mut left = Report::new();
        left.insert("count", 1).unwrap();
        let mut right = Report::new();
        right.insert("count", 1).unwrap();
        assert!(matches!(left.merge(right), Err(ReportError::DuplicateField(_))));
    }

    #[test]
    fn test_keys_keep_insertion_order() {
        let mut report = Report::new();
        for key in ["zeta", "alpha", "mid"] {
            report.insert(key, 0).unwrap();
        }
        let keys: Vec<_> = report.keys().cloned().collect();
        assert_eq!(keys, vec!["zeta", "alpha", "mid"]);
    }
}
