//! Desired-state file loading.

use std::path::Path;

use anyhow::{Context, Result, bail};
use gqlsync_reconcile::ReconcileRequest;
use serde_json::Value;

/// Read a desired-state file.
///
/// The document is either a full request (`apiId`, `roleName`, `resolvers`)
/// or just the `resolvers` mapping. `.toml` files are parsed as TOML,
/// everything else as JSON.
pub fn load_request(path: &Path) -> Result<ReconcileRequest> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    parse_request(&text, is_toml(path)).with_context(|| format!("Invalid {}", path.display()))
}

fn is_toml(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("toml"))
}

fn parse_request(text: &str, toml: bool) -> Result<ReconcileRequest> {
    let document: Value = if toml {
        toml::from_str(text)?
    } else {
        serde_json::from_str(text)?
    };

    let Value::Object(map) = &document else {
        bail!("expected an object at the top level");
    };
    if map.contains_key("resolvers") {
        Ok(serde_json::from_value(document)?)
    } else {
        Ok(ReconcileRequest {
            resolvers: document,
            ..Default::default()
        })
    }
}

/// Fill in the API and role from flags, which win over the file.
pub fn apply_overrides(
    mut request: ReconcileRequest,
    api_id: Option<&str>,
    role_name: Option<&str>,
) -> ReconcileRequest {
    if let Some(api_id) = api_id {
        request.api_id = api_id.to_string();
    }
    if let Some(role_name) = role_name {
        request.role_name = role_name.to_string();
    }
    request
}
