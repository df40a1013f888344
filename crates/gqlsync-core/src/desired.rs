//! Desired resolver state, validated at the boundary.

use std::collections::{BTreeMap, BTreeSet};

use serde_json::Value;

use crate::error::{CoreError, Result};
use crate::resolver::ResolverSpec;
use crate::root_type::RootType;

/// Desired resolvers keyed by type name, then field name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DesiredState {
    types: BTreeMap<String, BTreeMap<String, ResolverSpec>>,
}

impl DesiredState {
    /// Validate and classify a raw `resolvers` value.
    ///
    /// The value must be an object of objects of objects
    /// (`{type: {field: definition}}`). Errors name the offending path.
    pub fn from_value(value: &Value) -> Result<Self> {
        let Some(types) = value.as_object() else {
            return Err(CoreError::invalid_shape(
                "resolvers",
                "an object keyed by type name",
            ));
        };

        let mut state = DesiredState::default();
        for (type_name, fields) in types {
            let type_path = format!("resolvers.{type_name}");
            validate_name(&type_path, type_name)?;

            let Some(fields) = fields.as_object() else {
                return Err(CoreError::invalid_shape(
                    type_path,
                    "an object keyed by field name",
                ));
            };

            for (field_name, def) in fields {
                let field_path = format!("{type_path}.{field_name}");
                validate_name(&field_path, field_name)?;

                let Some(def) = def.as_object() else {
                    return Err(CoreError::invalid_shape(
                        field_path,
                        "a resolver definition object",
                    ));
                };

                state.insert(ResolverSpec::from_definition(type_name, field_name, def)?);
            }
        }

        Ok(state)
    }

    pub fn insert(&mut self, spec: ResolverSpec) {
        self.types
            .entry(spec.type_name.clone())
            .or_default()
            .insert(spec.field_name.clone(), spec);
    }

    pub fn get(&self, type_name: &str, field_name: &str) -> Option<&ResolverSpec> {
        self.types.get(type_name)?.get(field_name)
    }

    pub fn contains(&self, type_name: &str, field_name: &str) -> bool {
        self.get(type_name, field_name).is_some()
    }

    /// All resolver specs, ordered by type then field.
    pub fn iter(&self) -> impl Iterator<Item = &ResolverSpec> {
        self.types.values().flat_map(|fields| fields.values())
    }

    pub fn len(&self) -> usize {
        self.types.values().map(BTreeMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Names of every data source referenced by a desired resolver.
    pub fn data_source_names(&self) -> BTreeSet<String> {
        self.iter().map(ResolverSpec::data_source_name).collect()
    }

    /// Type names that are not managed root types.
    ///
    /// Resolvers on these types are upserted but never deleted.
    pub fn unmanaged_types(&self) -> Vec<&str> {
        self.types
            .keys()
            .map(String::as_str)
            .filter(|t| !RootType::is_root(t))
            .collect()
    }
}

/// GraphQL names: `[_A-Za-z][_0-9A-Za-z]*`.
fn validate_name(path: &str, name: &str) -> Result<()> {
    let mut chars = name.chars();
    let valid = match chars.next() {
        Some(first) => {
            (first == '_' || first.is_ascii_alphabetic())
                && chars.all(|c| c == '_' || c.is_ascii_alphanumeric())
        }
        None => false,
    };

    if valid {
        Ok(())
    } else {
        Err(CoreError::invalid_field(
            path,
            format!("'{name}' is not a valid GraphQL name"),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data_source::DataSourceKind;
    use serde_json::json;

    #[test]
    fn test_from_value() {
        let state = DesiredState::from_value(&json!({
            "Query": {
                "getUser": {"lambdaName": "usersFn"},
                "listPosts": {"tableName": "Posts"}
            },
            "Mutation": {
                "putUser": {"lambdaName": "usersFn", "request": "custom"}
            }
        }))
        .unwrap();

        assert_eq!(state.len(), 3);
        assert!(state.contains("Mutation", "putUser"));
        assert_eq!(
            state.get("Query", "listPosts").unwrap().data_source.kind(),
            DataSourceKind::AmazonDynamodb
        );
        let names: Vec<_> = state.data_source_names().into_iter().collect();
        assert_eq!(names, vec!["Posts".to_string(), "usersFn".to_string()]);
        assert!(state.unmanaged_types().is_empty());
    }

    #[test]
    fn test_empty_is_valid() {
        let state = DesiredState::from_value(&json!({})).unwrap();
        assert!(state.is_empty());
        assert!(state.data_source_names().is_empty());
    }

    #[test]
    fn test_rejects_non_object_root() {
        let err = DesiredState::from_value(&json!([1, 2])).unwrap_err();
        assert_eq!(err.path().as_deref(), Some("resolvers"));
    }

    #[test]
    fn test_rejects_non_object_type() {
        let err = DesiredState::from_value(&json!({"Query": "nope"})).unwrap_err();
        assert_eq!(err.path().as_deref(), Some("resolvers.Query"));
    }

    #[test]
    fn test_rejects_non_object_field() {
        let err = DesiredState::from_value(&json!({"Query": {"getUser": true}})).unwrap_err();
        assert_eq!(err.path().as_deref(), Some("resolvers.Query.getUser"));
    }

    #[test]
    fn test_rejects_invalid_field_name() {
        let err =
            DesiredState::from_value(&json!({"Query": {"get-user": {"lambdaName": "fn"}}}))
                .unwrap_err();
        assert_eq!(err.path().as_deref(), Some("resolvers.Query.get-user"));
    }

    #[test]
    fn test_unmanaged_types() {
        let state = DesiredState::from_value(&json!({
            "Subscription": {"onUser": {"lambdaName": "fn"}}
        }))
        .unwrap();
        assert_eq!(state.unmanaged_types(), vec!["Subscription"]);
    }
}
