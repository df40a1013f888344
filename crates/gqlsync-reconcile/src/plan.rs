//! Desired-vs-existing diff.

use std::collections::BTreeSet;

use gqlsync_core::{DesiredState, ResolverSpec};
use serde::Serialize;

use crate::snapshot::Snapshot;

/// A resolver addressed by type and field.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolverRef {
    pub type_name: String,
    pub field_name: String,
}

impl ResolverRef {
    pub fn new(type_name: impl Into<String>, field_name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            field_name: field_name.into(),
        }
    }
}

impl std::fmt::Display for ResolverRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}", self.type_name, self.field_name)
    }
}

/// Work for one reconciliation pass.
///
/// - every desired resolver is upserted
/// - existing resolvers absent from the desired state are deleted
/// - existing data sources no desired resolver references are deleted
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReconcilePlan {
    pub upserts: Vec<ResolverSpec>,
    pub resolver_deletes: Vec<ResolverRef>,
    pub data_source_deletes: Vec<String>,
}

impl ReconcilePlan {
    pub fn compute(desired: &DesiredState, snapshot: &Snapshot) -> Self {
        let upserts = desired.iter().cloned().collect();

        let resolver_deletes: BTreeSet<ResolverRef> = snapshot
            .resolvers
            .iter()
            .filter(|r| !desired.contains(&r.type_name, &r.field_name))
            .map(|r| ResolverRef::new(&r.type_name, &r.field_name))
            .collect();

        let referenced = desired.data_source_names();
        let data_source_deletes = snapshot
            .data_source_names
            .difference(&referenced)
            .cloned()
            .collect();

        Self {
            upserts,
            resolver_deletes: resolver_deletes.into_iter().collect(),
            data_source_deletes,
        }
    }

    pub fn has_deletes(&self) -> bool {
        !self.resolver_deletes.is_empty() || !self.data_source_deletes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gqlsync_service::RemoteResolver;
    use serde_json::json;

    fn remote(type_name: &str, field_name: &str, data_source: &str) -> RemoteResolver {
        RemoteResolver {
            type_name: type_name.to_string(),
            field_name: field_name.to_string(),
            data_source_name: Some(data_source.to_string()),
            resolver_arn: None,
            request_mapping_template: None,
            response_mapping_template: None,
        }
    }

    fn desired(value: serde_json::Value) -> DesiredState {
        DesiredState::from_value(&value).unwrap()
    }

    #[test]
    fn test_empty_remote() {
        let plan = ReconcilePlan::compute(
            &desired(json!({"Query": {"getUser": {"lambdaName": "usersFn"}}})),
            &Snapshot::default(),
        );
        assert_eq!(plan.upserts.len(), 1);
        assert!(!plan.has_deletes());
    }

    #[test]
    fn test_removed_resolver_and_orphaned_data_source() {
        let snapshot = Snapshot {
            resolvers: vec![
                remote("Query", "getUser", "usersFn"),
                remote("Mutation", "deleteUser", "adminFn"),
            ],
            data_source_names: ["usersFn", "adminFn"].map(String::from).into(),
        };
        let plan = ReconcilePlan::compute(
            &desired(json!({"Query": {"getUser": {"lambdaName": "usersFn"}}})),
            &snapshot,
        );

        assert_eq!(
            plan.resolver_deletes,
            vec![ResolverRef::new("Mutation", "deleteUser")]
        );
        assert_eq!(plan.data_source_deletes, vec!["adminFn".to_string()]);
    }

    #[test]
    fn test_shared_data_source_kept() {
        let snapshot = Snapshot {
            resolvers: vec![
                remote("Query", "getUser", "usersFn"),
                remote("Mutation", "deleteUser", "usersFn"),
            ],
            data_source_names: ["usersFn"].map(String::from).into(),
        };
        let plan = ReconcilePlan::compute(
            &desired(json!({"Query": {"getUser": {"lambdaName": "usersFn"}}})),
            &snapshot,
        );

        assert_eq!(plan.resolver_deletes.len(), 1);
        assert!(plan.data_source_deletes.is_empty());
    }

    #[test]
    fn test_unreferenced_data_source_without_resolvers() {
        let snapshot = Snapshot {
            resolvers: vec![],
            data_source_names: ["legacy"].map(String::from).into(),
        };
        let plan = ReconcilePlan::compute(&desired(json!({})), &snapshot);
        assert_eq!(plan.data_source_deletes, vec!["legacy".to_string()]);
        assert!(plan.upserts.is_empty());
    }

    #[test]
    fn test_sanitized_name_matches_remote() {
        let snapshot = Snapshot {
            resolvers: vec![],
            data_source_names: ["usersfn"].map(String::from).into(),
        };
        let plan = ReconcilePlan::compute(
            &desired(json!({"Query": {"getUser": {"lambdaName": "users-fn"}}})),
            &snapshot,
        );
        assert!(plan.data_source_deletes.is_empty());
    }
}
