use serde::{Deserialize, Serialize};

/// Version of one backend plugin.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PluginVersion {
    pub name: String,
    pub version: String,
}

/// Build information reported by `/api/v1/version`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct VersionInfo {
    pub version: String,
    pub git_branch: String,
    pub git_commit: String,
    pub build_time: String,
    pub go_version: String,
    pub compiler: String,
    pub platform: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub plugins: Option<Vec<PluginVersion>>,
}
