//! Path-tracking field access over an untyped JSON object.

use serde_json::{Map, Value};

use super::coerce::{coerce_number, coerce_text, describe, expect_string};
use super::{ValidationError, ValidationReason};
use crate::models::{Collection, Extra};

/// Read access to one JSON object, remembering where it sits in the document
/// so failures can name the offending field.
pub(crate) struct ObjectReader<'a> {
    path: String,
    fields: &'a Map<String, Value>,
}

impl<'a> ObjectReader<'a> {
    pub fn new(value: &'a Value, path: String) -> Result<Self, ValidationError> {
        match value {
            Value::Object(fields) => Ok(Self { path, fields }),
            other => Err(ValidationError::new(
                path,
                ValidationReason::ExpectedObject(describe(other)),
            )),
        }
    }

    pub fn child_path(&self, key: &str) -> String {
        if self.path.is_empty() {
            key.to_string()
        } else {
            format!("{}.{}", self.path, key)
        }
    }

    /// Field value, treating an explicit null as absent.
    fn field(&self, key: &str) -> Option<&'a Value> {
        self.fields.get(key).filter(|v| !v.is_null())
    }

    fn required(&self, key: &str) -> Result<&'a Value, ValidationError> {
        self.field(key)
            .ok_or_else(|| ValidationError::new(self.child_path(key), ValidationReason::Missing))
    }

    fn at<T>(
        &self,
        key: &str,
        result: Result<T, ValidationReason>,
    ) -> Result<T, ValidationError> {
        result.map_err(|reason| ValidationError::new(self.child_path(key), reason))
    }

    pub fn number(&self, key: &str) -> Result<f64, ValidationError> {
        let value = self.required(key)?;
        self.at(key, coerce_number(value))
    }

    pub fn number_or(&self, key: &str, default: f64) -> Result<f64, ValidationError> {
        Ok(self.optional_number(key)?.unwrap_or(default))
    }

    pub fn optional_number(&self, key: &str) -> Result<Option<f64>, ValidationError> {
        self.field(key)
            .map(|value| self.at(key, coerce_number(value)))
            .transpose()
    }

    pub fn string(&self, key: &str) -> Result<String, ValidationError> {
        let value = self.required(key)?;
        self.at(key, expect_string(value))
    }

    pub fn optional_string(&self, key: &str) -> Result<Option<String>, ValidationError> {
        self.field(key)
            .map(|value| self.at(key, expect_string(value)))
            .transpose()
    }

    /// String or number, stored as text.
    pub fn text(&self, key: &str) -> Result<String, ValidationError> {
        let value = self.required(key)?;
        self.at(key, coerce_text(value))
    }

    pub fn object(&self, key: &str) -> Result<ObjectReader<'a>, ValidationError> {
        let value = self.required(key)?;
        ObjectReader::new(value, self.child_path(key))
    }

    pub fn optional_object(&self, key: &str) -> Result<Option<ObjectReader<'a>>, ValidationError> {
        self.field(key)
            .map(|value| ObjectReader::new(value, self.child_path(key)))
            .transpose()
    }

    /// Map of id to entry, in document order.
    pub fn collection<T, F>(&self, key: &str, parse: F) -> Result<Collection<T>, ValidationError>
    where
        F: Fn(&ObjectReader<'a>) -> Result<T, ValidationError>,
    {
        self.object(key)?.entries(parse)
    }

    /// Like [`collection`](Self::collection), defaulting to empty when absent.
    pub fn optional_collection<T, F>(
        &self,
        key: &str,
        parse: F,
    ) -> Result<Collection<T>, ValidationError>
    where
        F: Fn(&ObjectReader<'a>) -> Result<T, ValidationError>,
    {
        match self.optional_object(key)? {
            Some(reader) => reader.entries(parse),
            None => Ok(Collection::new()),
        }
    }

    /// Every field of this object parsed as a nested object.
    pub fn entries<T, F>(&self, parse: F) -> Result<Collection<T>, ValidationError>
    where
        F: Fn(&ObjectReader<'a>) -> Result<T, ValidationError>,
    {
        let mut collection = Collection::new();
        for (id, value) in self.fields {
            let entry = ObjectReader::new(value, self.child_path(id))?;
            collection.insert(id.clone(), parse(&entry)?);
        }
        Ok(collection)
    }

    /// Every field of this object coerced to a number.
    pub fn numeric_entries(&self) -> Result<Collection<f64>, ValidationError> {
        let mut collection = Collection::new();
        for (id, value) in self.fields {
            collection.insert(id.clone(), self.at(id, coerce_number(value))?);
        }
        Ok(collection)
    }

    /// Optional array of objects, defaulting to empty when absent.
    pub fn optional_array<T, F>(&self, key: &str, parse: F) -> Result<Vec<T>, ValidationError>
    where
        F: Fn(&ObjectReader<'a>) -> Result<T, ValidationError>,
    {
        let items = match self.field(key) {
            None => return Ok(Vec::new()),
            Some(Value::Array(items)) => items,
            Some(other) => {
                return Err(ValidationError::new(
                    self.child_path(key),
                    ValidationReason::ExpectedArray(describe(other)),
                ))
            }
        };

        let base = self.child_path(key);
        items
            .iter()
            .enumerate()
            .map(|(i, item)| {
                let entry = ObjectReader::new(item, format!("{}.{}", base, i))?;
                parse(&entry)
            })
            .collect()
    }

    /// Fields not listed in `known`, copied verbatim.
    pub fn extra(&self, known: &[&str]) -> Extra {
        self.fields
            .iter()
            .filter(|(key, _)| !known.contains(&key.as_str()))
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect()
    }
}
