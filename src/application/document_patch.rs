use serde_json::Value;

use crate::domain::error::TodoError;

pub trait DocumentPatcher: Send + Sync + 'static {
    fn apply(&self, doc: &mut Value, patch: Value) -> Result<(), TodoError>;
}

// RFC 6902
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonPatcher;

impl DocumentPatcher for JsonPatcher {
    fn apply(&self, doc: &mut Value, patch: Value) -> Result<(), TodoError> {
        let ops: json_patch::Patch = serde_json::from_value(patch)
            .map_err(|e| TodoError::InvalidPatch(e.to_string()))?;
        json_patch::patch(doc, &ops.0).map_err(|e| TodoError::InvalidPatch(e.to_string()))
    }
}
