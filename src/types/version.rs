//! Version report types.

use serde::{Deserialize, Serialize};

/// Reported when the model service could not be asked.
pub const UNAVAILABLE: &str = "unavailable";

/// Combined version of this gateway and the model service behind it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VersionInfo {
    pub app: AppVersion,
    pub model_service: ModelServiceVersion,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppVersion {
    pub app_version: String,
    /// Git branch and commit the gateway was built from.
    pub build: String,
}

/// Version block reported by the model service's `/version` endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelServiceVersion {
    #[serde(default = "unknown")]
    pub model_version: String,
    #[serde(default = "unknown")]
    pub service_version: String,
}

impl ModelServiceVersion {
    pub fn unavailable() -> Self {
        Self {
            model_version: UNAVAILABLE.to_string(),
            service_version: UNAVAILABLE.to_string(),
        }
    }
}

fn unknown() -> String {
    "unknown".to_string()
}
