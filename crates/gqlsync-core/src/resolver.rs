use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::data_source::DataSourceSpec;
use crate::error::{CoreError, Result};

/// Request template used when a resolver supplies none: invoke the data
/// source with the whole resolver context.
pub const DEFAULT_REQUEST_TEMPLATE: &str =
    r#"{"version": "2017-02-28", "operation": "Invoke", "payload": $util.toJson($context)}"#;

/// Response template used when a resolver supplies none: pass the result through.
pub const DEFAULT_RESPONSE_TEMPLATE: &str = "$util.toJson($context.result)";

/// One desired resolver binding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolverSpec {
    pub type_name: String,
    pub field_name: String,
    pub request: Option<String>,
    pub response: Option<String>,
    pub data_source: DataSourceSpec,
}

impl ResolverSpec {
    /// Build a spec from one raw `resolvers.<type>.<field>` object.
    pub fn from_definition(
        type_name: &str,
        field_name: &str,
        def: &Map<String, Value>,
    ) -> Result<Self> {
        let data_source = DataSourceSpec::classify(type_name, field_name, def)?;
        Ok(Self {
            type_name: type_name.to_string(),
            field_name: field_name.to_string(),
            request: template(type_name, field_name, def, "request")?,
            response: template(type_name, field_name, def, "response")?,
            data_source,
        })
    }

    pub fn request_template(&self) -> &str {
        self.request.as_deref().unwrap_or(DEFAULT_REQUEST_TEMPLATE)
    }

    pub fn response_template(&self) -> &str {
        self.response.as_deref().unwrap_or(DEFAULT_RESPONSE_TEMPLATE)
    }

    pub fn data_source_name(&self) -> String {
        self.data_source.name()
    }
}

fn template(
    type_name: &str,
    field_name: &str,
    def: &Map<String, Value>,
    key: &str,
) -> Result<Option<String>> {
    match def.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(_) => Err(CoreError::invalid_shape(
            format!("resolvers.{type_name}.{field_name}.{key}"),
            "a mapping template string",
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn definition(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_default_templates() {
        let spec =
            ResolverSpec::from_definition("Query", "getUser", &definition(json!({"lambdaName": "usersFn"})))
                .unwrap();
        assert_eq!(spec.request_template(), DEFAULT_REQUEST_TEMPLATE);
        assert_eq!(spec.response_template(), DEFAULT_RESPONSE_TEMPLATE);
        assert_eq!(spec.data_source_name(), "usersFn");
    }

    #[test]
    fn test_custom_templates() {
        let spec = ResolverSpec::from_definition(
            "Mutation",
            "putUser",
            &definition(json!({"tableName": "Users", "request": "req", "response": "res"})),
        )
        .unwrap();
        assert_eq!(spec.request_template(), "req");
        assert_eq!(spec.response_template(), "res");
    }

    #[test]
    fn test_non_string_template_rejected() {
        let err = ResolverSpec::from_definition(
            "Query",
            "getUser",
            &definition(json!({"lambdaName": "fn", "request": 42})),
        )
        .unwrap_err();
        assert_eq!(err.path().as_deref(), Some("resolvers.Query.getUser.request"));
    }
}
