//! AWS AppSync backend for gqlsync
//!
//! This crate provides:
//!
//! - [`AppSyncService`]: `GraphqlApiService` over `aws-sdk-appsync`
//! - [`IamRoleResolver`]: role name → ARN through IAM
//! - [`LambdaFunctionResolver`]: function name → ARN through Lambda
//!
//! SDK failures are classified into `ServiceError` variants from the AWS
//! error code and message, so the reconciliation engine can tell schema-lock
//! conflicts and missing objects apart from fatal errors.
//!
//! ## Usage
//!
//! ```ignore
//! use aws_config::BehaviorVersion;
//! use gqlsync_appsync::{AppSyncConfig, AppSyncService, IamRoleResolver, LambdaFunctionResolver};
//!
//! let sdk_config = aws_config::load_defaults(BehaviorVersion::latest()).await;
//! let config = AppSyncConfig {
//!     region: Some("eu-west-1".to_string()),
//!     ..Default::default()
//! };
//! let service = AppSyncService::new(&sdk_config, &config);
//! let roles = IamRoleResolver::new(&sdk_config, &config);
//! let functions = LambdaFunctionResolver::new(&sdk_config, &config);
//! ```

mod config;
mod convert;
mod error;
mod identity;
mod service;

pub use config::AppSyncConfig;
pub use identity::{IamRoleResolver, LambdaFunctionResolver};
pub use service::AppSyncService;
