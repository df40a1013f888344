//! # gqlsync-reconcile
//!
//! Converges the resolvers and data sources of a managed GraphQL API to a
//! declarative desired state.
//!
//! Each run snapshots the remote API, diffs it against the desired state,
//! upserts every desired resolver (provisioning each distinct data source
//! exactly once), then deletes resolvers and data sources that are no
//! longer wanted. A schema-lock conflict restarts the whole run from a fresh
//! snapshot according to the [`RetryPolicy`].
//!
//! ## Example
//!
//! ```ignore
//! use gqlsync_reconcile::{ReconcileRequest, Reconciler};
//!
//! let reconciler = Reconciler::new(service, roles, functions);
//! let request = ReconcileRequest::new("api-id", "appsync-role", resolvers);
//! let report = reconciler.reconcile(&request).await?;
//! println!("{} resolvers upserted", report.resolvers_upserted.len());
//! ```

mod cache;
mod data_source;
mod error;
mod plan;
mod reconciler;
mod request;
mod resolver;
mod retry;
mod snapshot;

pub use cache::ProvisionCache;
pub use data_source::{
    DataSourceProvisioner, ProvisionContext, ProvisionedDataSource, build_config,
};
pub use error::{ReconcileError, Result};
pub use plan::{ReconcilePlan, ResolverRef};
pub use reconciler::{DEFAULT_REGION, ReconcileReport, Reconciler};
pub use request::ReconcileRequest;
pub use resolver::ResolverProvisioner;
pub use retry::{DEFAULT_RETRY_PAUSE, RetryPolicy};
pub use snapshot::Snapshot;
