//! Per-entity field-name resolution
//!
//! A [`FieldMap`] translates the logical property names callers put in
//! filters into the serialized names stored by the search cluster. Maps are
//! validated once, when they are built, so compiling a query only needs a
//! lookup.

use crate::search::error::{SearchError, SearchResult};
use std::collections::{HashMap, HashSet};

/// Logical name -> serialized name table for one entity type
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldMap {
    entity: String,
    fields: HashMap<String, String>,
}

impl FieldMap {
    /// Build and validate a table
    ///
    /// Names must be non-empty and each logical and serialized name may occur
    /// only once.
    pub fn new<I, L, S>(entity: impl Into<String>, fields: I) -> SearchResult<Self>
    where
        I: IntoIterator<Item = (L, S)>,
        L: Into<String>,
        S: Into<String>,
    {
        let entity = entity.into();
        let mut map = HashMap::new();
        let mut serialized_names = HashSet::new();

        for (logical, serialized) in fields {
            let logical = logical.into();
            let serialized = serialized.into();

            if logical.trim().is_empty() || serialized.trim().is_empty() {
                return Err(SearchError::Configuration(format!(
                    "field map for {} contains an empty field name",
                    entity
                )));
            }
            if !serialized_names.insert(serialized.clone()) {
                return Err(SearchError::Configuration(format!(
                    "field map for {} maps more than one field to '{}'",
                    entity, serialized
                )));
            }
            if map.insert(logical.clone(), serialized).is_some() {
                return Err(SearchError::Configuration(format!(
                    "field map for {} declares '{}' twice",
                    entity, logical
                )));
            }
        }

        Ok(Self {
            entity,
            fields: map,
        })
    }

    /// Table where every logical name is its own serialized name
    pub fn identity<I, S>(entity: impl Into<String>, names: I) -> SearchResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(
            entity,
            names.into_iter().map(|n| {
                let n = n.into();
                (n.clone(), n)
            }),
        )
    }

    pub fn entity(&self) -> &str {
        &self.entity
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Serialized name for a logical name
    pub fn resolve(&self, logical: &str) -> SearchResult<&str> {
        self.fields
            .get(logical)
            .map(String::as_str)
            .ok_or_else(|| SearchError::UnknownField {
                entity: self.entity.clone(),
                field: logical.to_string(),
            })
    }
}
