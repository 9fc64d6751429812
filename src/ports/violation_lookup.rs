//! Traffic-violation lookup port.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Settlement status of a single ticket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViolationStatus {
    Unpaid,
    Paid,
    Processed,
}

/// One recorded violation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Violation {
    pub date: String,
    pub violation: String,
    pub location: String,
    /// Fine in rupiah.
    pub fine: u64,
    pub officer_name: String,
    pub status: ViolationStatus,
}

/// Violation record of one vehicle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViolationInfo {
    pub plate_number: String,
    pub chassis_number: String,
    pub owner_name: String,
    pub vehicle_type: String,
    pub has_violation: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub violations: Vec<Violation>,
    pub total_fine: u64,
}

impl ViolationInfo {
    /// Record returned for plates the registry knows nothing about.
    pub fn clean(plate_number: impl Into<String>) -> Self {
        Self {
            plate_number: plate_number.into(),
            chassis_number: "XXXXXXXXXXXX".to_string(),
            owner_name: "-".to_string(),
            vehicle_type: "-".to_string(),
            has_violation: false,
            violations: Vec::new(),
            total_fine: 0,
        }
    }

    pub fn unpaid_total(&self) -> u64 {
        self.violations
            .iter()
            .filter(|v| v.status == ViolationStatus::Unpaid)
            .map(|v| v.fine)
            .sum()
    }
}

/// Port for looking up violations by plate number.
#[async_trait]
pub trait ViolationLookup: Send + Sync {
    /// Returns the record for `plate_number`; unknown plates get a clean record.
    async fn check(&self, plate_number: &str) -> ViolationInfo;
}
