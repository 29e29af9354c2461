use serde::{Deserialize, Serialize};

/// Identity of the signed-in user, handed to the pipeline explicitly.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionContext {
    pub meter_id: String,
}

impl SessionContext {
    pub fn new(meter_id: impl Into<String>) -> Self {
        Self {
            meter_id: meter_id.into(),
        }
    }
}
