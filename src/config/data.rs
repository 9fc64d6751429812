//! Static data file locations

use serde::Deserialize;

/// Paths of the documents loaded at start-up
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct DataConfig {
    /// Flow definition (JSON or YAML); missing or invalid aborts start-up
    #[serde(default = "default_flow_path")]
    pub flow_path: String,

    /// Service catalog; a missing file yields an empty catalog
    #[serde(default = "default_catalog_path")]
    pub catalog_path: String,

    /// Violation records; the built-in sample data is used when unset
    pub violations_path: Option<String>,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            flow_path: default_flow_path(),
            catalog_path: default_catalog_path(),
            violations_path: None,
        }
    }
}

fn default_flow_path() -> String {
    "flows/perpanjangan_sim.json".to_string()
}

fn default_catalog_path() -> String {
    "data/pelayanan.json".to_string()
}
