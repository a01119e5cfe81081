//! Boot-time validation: every model a service references must have bound data access.

use crate::config::resolved::ServiceSpec;
use crate::error::BootError;
use crate::service::ModelBindings;

pub fn validate_models(spec: &ServiceSpec, bindings: &ModelBindings) -> Result<(), BootError> {
    let missing: Vec<String> = spec
        .models
        .iter()
        .filter(|m| !bindings.contains(m))
        .cloned()
        .collect();
    if missing.is_empty() {
        return Ok(());
    }
    Err(BootError::MissingDataAccess {
        service: spec.service.clone(),
        models: missing,
    })
}
