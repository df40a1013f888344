use std::path::Path;

use anyhow::Result;

use crate::cli::OutputFormat;
use crate::desired::load_request;
use crate::output::print_desired;

pub fn validate(file: &Path, format: OutputFormat) -> Result<()> {
    let request = load_request(file)?;
    let desired = gqlsync_core::DesiredState::from_value(&request.resolvers)?;
    for type_name in desired.unmanaged_types() {
        tracing::warn!(type_name = %type_name, "Resolvers on non-root type are never deleted");
    }
    print_desired(&desired, format)
}
