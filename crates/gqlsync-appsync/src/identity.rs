//! IAM role and Lambda function ARN lookups.

use async_trait::async_trait;
use gqlsync_service::{FunctionResolver, RoleResolver, ServiceError};

use crate::config::{AppSyncConfig, client_from_config};
use crate::error::{Target, classify};

/// Resolves role names through IAM `GetRole`.
#[derive(Debug, Clone)]
pub struct IamRoleResolver {
    client: aws_sdk_iam::Client,
}

impl IamRoleResolver {
    pub fn new(sdk_config: &aws_config::SdkConfig, config: &AppSyncConfig) -> Self {
        Self {
            client: client_from_config!(aws_sdk_iam, sdk_config, config),
        }
    }

    pub fn from_client(client: aws_sdk_iam::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl RoleResolver for IamRoleResolver {
    async fn role_arn(&self, role_name: &str) -> Result<String, ServiceError> {
        let output = self
            .client
            .get_role()
            .role_name(role_name)
            .send()
            .await
            .map_err(|e| classify(e, Target::Role(role_name)))?;

        let arn = output
            .role()
            .map(|role| role.arn().to_string())
            .ok_or_else(|| ServiceError::not_found("role", role_name))?;
        tracing::debug!(role_name = %role_name, arn = %arn, "Resolved role ARN");
        Ok(arn)
    }
}

/// Resolves function names through Lambda `GetFunction`.
#[derive(Debug, Clone)]
pub struct LambdaFunctionResolver {
    client: aws_sdk_lambda::Client,
}

impl LambdaFunctionResolver {
    pub fn new(sdk_config: &aws_config::SdkConfig, config: &AppSyncConfig) -> Self {
        Self {
            client: client_from_config!(aws_sdk_lambda, sdk_config, config),
        }
    }

    pub fn from_client(client: aws_sdk_lambda::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl FunctionResolver for LambdaFunctionResolver {
    async fn function_arn(&self, function_name: &str) -> Result<String, ServiceError> {
        let output = self
            .client
            .get_function()
            .function_name(function_name)
            .send()
            .await
            .map_err(|e| classify(e, Target::Function(function_name)))?;

        let arn = output
            .configuration()
            .and_then(|configuration| configuration.function_arn())
            .map(str::to_string)
            .ok_or_else(|| ServiceError::not_found("function", function_name))?;
        tracing::debug!(function_name = %function_name, arn = %arn, "Resolved function ARN");
        Ok(arn)
    }
}
