use gqlsync_core::{CoreError, DesiredState};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Input of one reconciliation run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReconcileRequest {
    #[serde(default)]
    pub api_id: String,
    #[serde(default)]
    pub role_name: String,
    #[serde(default)]
    pub resolvers: Value,
}

impl ReconcileRequest {
    pub fn new(api_id: impl Into<String>, role_name: impl Into<String>, resolvers: Value) -> Self {
        Self {
            api_id: api_id.into(),
            role_name: role_name.into(),
            resolvers,
        }
    }

    /// Check required fields and classify the desired resolvers.
    pub fn validate(&self) -> Result<DesiredState, CoreError> {
        if self.api_id.trim().is_empty() {
            return Err(CoreError::missing_field("apiId"));
        }
        if self.role_name.trim().is_empty() {
            return Err(CoreError::missing_field("roleName"));
        }
        if self.resolvers.is_null() {
            return Err(CoreError::missing_field("resolvers"));
        }
        DesiredState::from_value(&self.resolvers)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_missing_api_id() {
        let request = ReconcileRequest::new("", "role", json!({}));
        assert_eq!(
            request.validate().unwrap_err(),
            CoreError::missing_field("apiId")
        );
    }

    #[test]
    fn test_missing_role_name() {
        let request = ReconcileRequest::new("api", "  ", json!({}));
        assert_eq!(
            request.validate().unwrap_err(),
            CoreError::missing_field("roleName")
        );
    }

    #[test]
    fn test_missing_resolvers() {
        let request: ReconcileRequest =
            serde_json::from_value(json!({"apiId": "api", "roleName": "role"})).unwrap();
        assert_eq!(
            request.validate().unwrap_err(),
            CoreError::missing_field("resolvers")
        );
    }

    #[test]
    fn test_valid_request() {
        let request: ReconcileRequest = serde_json::from_value(json!({
            "apiId": "api",
            "roleName": "role",
            "resolvers": {"Query": {"getUser": {"lambdaName": "usersFn"}}}
        }))
        .unwrap();
        let desired = request.validate().unwrap();
        assert_eq!(desired.len(), 1);
    }
}
