use std::collections::HashSet;

use async_trait::async_trait;
use gqlsync_service::{FunctionResolver, RoleResolver, ServiceError};

/// Builds role and function ARNs from a fixed account and region instead of
/// looking them up.
///
/// Names listed with [`StaticArnResolver::with_missing`] fail with
/// `NotFound`, like a lookup of a role or function that does not exist.
#[derive(Debug, Clone)]
pub struct StaticArnResolver {
    account_id: String,
    region: String,
    missing: HashSet<String>,
}

impl StaticArnResolver {
    pub fn new(account_id: impl Into<String>, region: impl Into<String>) -> Self {
        Self {
            account_id: account_id.into(),
            region: region.into(),
            missing: HashSet::new(),
        }
    }

    /// Marks `name` as unknown to both resolvers.
    pub fn with_missing(mut self, name: impl Into<String>) -> Self {
        self.missing.insert(name.into());
        self
    }

    fn check(&self, kind: &str, name: &str) -> Result<(), ServiceError> {
        if self.missing.contains(name) {
            Err(ServiceError::not_found(kind, name))
        } else {
            Ok(())
        }
    }
}

impl Default for StaticArnResolver {
    fn default() -> Self {
        Self::new("000000000000", "us-east-1")
    }
}

#[async_trait]
impl RoleResolver for StaticArnResolver {
    async fn role_arn(&self, role_name: &str) -> Result<String, ServiceError> {
        self.check("role", role_name)?;
        Ok(format!("arn:aws:iam::{}:role/{role_name}", self.account_id))
    }
}

#[async_trait]
impl FunctionResolver for StaticArnResolver {
    async fn function_arn(&self, function_name: &str) -> Result<String, ServiceError> {
        self.check("function", function_name)?;
        Ok(format!(
            "arn:aws:lambda:{}:{}:function:{function_name}",
            self.region, self.account_id
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_static_arns() {
        let resolver = StaticArnResolver::new("123456789012", "eu-west-1");
        assert_eq!(
            resolver.role_arn("appsync-role").await.unwrap(),
            "arn:aws:iam::123456789012:role/appsync-role"
        );
        assert_eq!(
            resolver.function_arn("usersFn").await.unwrap(),
            "arn:aws:lambda:eu-west-1:123456789012:function:usersFn"
        );
    }

    #[tokio::test]
    async fn test_missing_name() {
        let resolver = StaticArnResolver::default().with_missing("ghost");
        assert!(resolver.function_arn("ghost").await.unwrap_err().is_not_found());
    }
}
