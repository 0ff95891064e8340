//! Profile field schema
//!
//! Defines which fields a profile record may carry. Validation happens
//! at the write boundary (create and patch), so everything downstream
//! of the store can assume well-formed profiles.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::profile::{Profile, FIELD_BIO, FIELD_FAVOURITE_COLOUR, FIELD_FAVOURITE_FOOD, FIELD_NAME};

/// The allowed field set for profile records.
///
/// Required fields must be present and non-empty when a profile is
/// created; optional fields may be absent. Any field name outside both
/// lists is rejected.
///
/// Deployments with a different field set can load their own schema
/// from JSON, e.g.
///
/// ```json
/// { "required": ["name", "bio"], "optional": ["favouriteColour"] }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldSchema {
    pub required: Vec<String>,
    pub optional: Vec<String>,
}

impl Default for FieldSchema {
    fn default() -> Self {
        Self {
            required: vec![FIELD_NAME.to_string(), FIELD_BIO.to_string()],
            optional: vec![
                FIELD_FAVOURITE_COLOUR.to_string(),
                FIELD_FAVOURITE_FOOD.to_string(),
            ],
        }
    }
}

impl FieldSchema {
    /// Create a schema from explicit field lists.
    pub fn new(
        required: impl IntoIterator<Item = String>,
        optional: impl IntoIterator<Item = String>,
    ) -> Self {
        Self {
            required: required.into_iter().collect(),
            optional: optional.into_iter().collect(),
        }
    }

    /// Is `field` a recognized field name?
    #[must_use]
    pub fn is_allowed(&self, field: &str) -> bool {
        self.required.iter().any(|f| f == field) || self.optional.iter().any(|f| f == field)
    }

    /// Validate a complete profile as supplied on creation.
    ///
    /// Every required field must be present and non-empty, and no
    /// unrecognized field may appear.
    pub fn validate_create(&self, profile: &Profile) -> Result<()> {
        for field in &self.required {
            match profile.get(field) {
                Some(value) if !value.is_empty() => {}
                _ => return Err(Error::MissingField(field.clone())),
            }
        }
        self.validate_patch(profile)
    }

    /// Validate a partial update: only recognized field names may appear.
    pub fn validate_patch(&self, patch: &Profile) -> Result<()> {
        for field in patch.field_names() {
            if !self.is_allowed(field) {
                return Err(Error::UnknownField(field.to_string()));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_schema_accepts_a_full_profile() {
        let schema = FieldSchema::default();
        let profile = Profile::from([
            ("name", "Alice"),
            ("bio", "I love hiking"),
            ("favouriteColour", "blue"),
            ("favouriteFood", "pasta"),
        ]);
        assert!(schema.validate_create(&profile).is_ok());
    }

    #[test]
    fn missing_required_field_is_rejected() {
        let schema = FieldSchema::default();
        let profile = Profile::from([("name", "Alice")]);
        assert!(matches!(
            schema.validate_create(&profile),
            Err(Error::MissingField(field)) if field == "bio"
        ));
    }

    #[test]
    fn empty_required_field_is_rejected() {
        let schema = FieldSchema::default();
        let profile = Profile::from([("name", "Alice"), ("bio", "")]);
        assert!(matches!(
            schema.validate_create(&profile),
            Err(Error::MissingField(field)) if field == "bio"
        ));
    }

    #[test]
    fn unrecognized_field_is_rejected() {
        let schema = FieldSchema::default();
        let profile = Profile::from([
            ("name", "Alice"),
            ("bio", "hi"),
            ("favouriteMovie", "Alien"),
        ]);
        assert!(matches!(
            schema.validate_create(&profile),
            Err(Error::UnknownField(field)) if field == "favouriteMovie"
        ));
    }

    #[test]
    fn patch_may_omit_required_fields() {
        let schema = FieldSchema::default();
        let patch = Profile::from([("favouriteColour", "green")]);
        assert!(schema.validate_patch(&patch).is_ok());
    }

    #[test]
    fn patch_with_unknown_field_is_rejected() {
        let schema = FieldSchema::default();
        let patch = Profile::from([("shoeSize", "43")]);
        assert!(matches!(
            schema.validate_patch(&patch),
            Err(Error::UnknownField(field)) if field == "shoeSize"
        ));
    }

    #[test]
    fn schema_loads_from_json() {
        let json = r#"{ "required": ["name"], "optional": ["nickname"] }"#;
        let schema: FieldSchema = serde_json::from_str(json).unwrap();

        assert!(schema.is_allowed("nickname"));
        assert!(!schema.is_allowed("bio"));

        let profile = Profile::from([("name", "Ada"), ("nickname", "ada")]);
        assert!(schema.validate_create(&profile).is_ok());
    }
}
