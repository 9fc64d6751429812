//! Service catalog port.
//!
//! Answers "what do I need to bring for service X" questions from a static
//! list of police administrative services.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// One entry of the service catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceRecord {
    pub no: u32,
    /// Snake-case service name, e.g. `perpanjangan_sim`.
    pub jenis_pelayanan: String,
    /// Documents the applicant has to prepare.
    #[serde(default)]
    pub dokumen_yang_perlu_disiapkan: Vec<String>,
}

impl ServiceRecord {
    /// Service name with underscores replaced by spaces.
    pub fn readable_name(&self) -> String {
        self.jenis_pelayanan.replace('_', " ")
    }
}

/// Outcome of a catalog search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceInfo {
    pub found: bool,
    #[serde(rename = "pelayanan", default, skip_serializing_if = "Option::is_none")]
    pub service: Option<ServiceRecord>,
    pub query: String,
}

impl ServiceInfo {
    pub fn found(service: ServiceRecord, query: impl Into<String>) -> Self {
        Self {
            found: true,
            service: Some(service),
            query: query.into(),
        }
    }

    pub fn not_found(query: impl Into<String>) -> Self {
        Self {
            found: false,
            service: None,
            query: query.into(),
        }
    }
}

/// Port for service requirement lookups.
#[async_trait]
pub trait ServiceCatalog: Send + Sync {
    /// Finds the service a free-text question is about.
    ///
    /// Never fails; an unmatched query yields `found == false`.
    async fn search(&self, query: &str) -> ServiceInfo;

    /// Every known service, in catalog order.
    async fn all(&self) -> Vec<ServiceRecord>;
}
