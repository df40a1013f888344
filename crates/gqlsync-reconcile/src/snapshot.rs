//! Remote state snapshot.

use std::collections::BTreeSet;

use gqlsync_core::RootType;
use gqlsync_service::{GraphqlApiService, RemoteResolver};

use crate::error::Result;

/// Resolvers and data-source names currently registered on the remote API.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Snapshot {
    /// Resolvers on managed root types only.
    pub resolvers: Vec<RemoteResolver>,
    pub data_source_names: BTreeSet<String>,
}

impl Snapshot {
    /// Read the current state of `api_id`. Never mutates remote state.
    ///
    /// A root type the schema does not define yet contributes no resolvers.
    pub async fn fetch(service: &dyn GraphqlApiService, api_id: &str) -> Result<Self> {
        let mut resolvers = Vec::new();
        for root in RootType::ALL {
            match service.list_resolvers(api_id, root.as_str()).await {
                Ok(found) => resolvers.extend(found),
                Err(err) if err.is_type_not_found() => {
                    tracing::debug!(
                        api_id = %api_id,
                        type_name = %root,
                        "Root type not defined by schema, treating as no resolvers"
                    );
                }
                Err(err) => return Err(err.into()),
            }
        }

        let data_source_names = service
            .list_data_sources(api_id)
            .await?
            .into_iter()
            .map(|ds| ds.name)
            .collect();

        Ok(Self {
            resolvers,
            data_source_names,
        })
    }
}
