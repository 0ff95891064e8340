use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::error::{Error, Result};

/// Field name of the profile owner's display name.
pub const FIELD_NAME: &str = "name";
/// Field name of the free-text bio.
pub const FIELD_BIO: &str = "bio";
/// Field name of the optional favourite colour.
pub const FIELD_FAVOURITE_COLOUR: &str = "favouriteColour";
/// Field name of the optional favourite food.
pub const FIELD_FAVOURITE_FOOD: &str = "favouriteFood";

/// A stored user profile: a flat mapping from field name to string value.
///
/// The profile id is not a field; it is the key the record is stored
/// under. Which field names are allowed is decided by
/// [`FieldSchema`](crate::schema::FieldSchema) at the write boundary, so
/// a profile read back from the store carries all required fields and
/// nothing unrecognized.
///
/// Fields are kept in a `BTreeMap` so serialized profiles have a stable
/// field order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Profile {
    fields: BTreeMap<String, String>,
}

impl Profile {
    /// Create an empty profile.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a profile from a JSON value.
    ///
    /// The value must be an object and every field value must be a
    /// string; anything else is rejected rather than coerced.
    pub fn from_value(value: &serde_json::Value) -> Result<Self> {
        let object = value.as_object().ok_or_else(|| {
            Error::Serialization("profile body must be a JSON object".to_string())
        })?;

        let mut fields = BTreeMap::new();
        for (name, value) in object {
            let value = value
                .as_str()
                .ok_or_else(|| Error::InvalidFieldValue(name.clone()))?;
            fields.insert(name.clone(), value.to_string());
        }
        Ok(Self { fields })
    }

    /// Serialize to a JSON object value.
    #[must_use]
    pub fn to_value(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or(serde_json::Value::Null)
    }

    /// Get a field value, `None` if the field is absent.
    #[must_use]
    pub fn get(&self, field: &str) -> Option<&str> {
        self.fields.get(field).map(String::as_str)
    }

    /// Set a field value.
    pub fn set(&mut self, field: impl Into<String>, value: impl Into<String>) {
        self.fields.insert(field.into(), value.into());
    }

    /// The profile's display name. Every stored profile has one; a
    /// missing name is a data-integrity violation.
    pub fn name(&self) -> Result<&str> {
        self.require(FIELD_NAME)
    }

    /// The profile's bio. Required like [`name`](Self::name).
    pub fn bio(&self) -> Result<&str> {
        self.require(FIELD_BIO)
    }

    /// Optional favourite colour.
    #[must_use]
    pub fn favourite_colour(&self) -> Option<&str> {
        self.get(FIELD_FAVOURITE_COLOUR)
    }

    /// Optional favourite food.
    #[must_use]
    pub fn favourite_food(&self) -> Option<&str> {
        self.get(FIELD_FAVOURITE_FOOD)
    }

    /// Iterate over field names.
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    /// Number of fields present.
    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Merge a patch into this profile, overwriting overlapping fields.
    ///
    /// The patch must already be validated against the field schema;
    /// this is a plain merge.
    pub fn apply(&mut self, patch: &Profile) {
        for (field, value) in &patch.fields {
            self.fields.insert(field.clone(), value.clone());
        }
    }

    fn require(&self, field: &str) -> Result<&str> {
        self.get(field)
            .ok_or_else(|| Error::MissingField(field.to_string()))
    }
}

impl From<BTreeMap<String, String>> for Profile {
    fn from(fields: BTreeMap<String, String>) -> Self {
        Self { fields }
    }
}

impl<const N: usize> From<[(&str, &str); N]> for Profile {
    fn from(entries: [(&str, &str); N]) -> Self {
        Self {
            fields: entries
                .into_iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        }
    }
}
