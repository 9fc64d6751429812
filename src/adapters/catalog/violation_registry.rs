//! In-memory violation registry.
//!
//! Vehicle records keyed by normalized plate number. Ships with a small
//! sample data set and can alternatively be loaded from a JSON array of
//! [`ViolationInfo`] records.

use std::collections::HashMap;
use std::path::Path;

use async_trait::async_trait;

use super::json_service_catalog::CatalogLoadError;
use crate::domain::intent::normalize_plate;
use crate::ports::{Violation, ViolationInfo, ViolationLookup, ViolationStatus};

/// Plate number -> vehicle record.
#[derive(Debug, Clone, Default)]
pub struct InMemoryViolationRegistry {
    records: HashMap<String, ViolationInfo>,
}

impl InMemoryViolationRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_records(records: impl IntoIterator<Item = ViolationInfo>) -> Self {
        let mut registry = Self::new();
        for record in records {
            registry.insert(record);
        }
        registry
    }

    /// Registry seeded with the demo vehicles.
    pub fn with_sample_data() -> Self {
        Self::from_records(sample_records())
    }

    /// Loads records from a JSON array file.
    pub async fn load(path: impl AsRef<Path>) -> Result<Self, CatalogLoadError> {
        let path = path.as_ref();
        let shown = path.display().to_string();

        let raw = tokio::fs::read_to_string(path)
            .await
            .map_err(|source| CatalogLoadError::Io {
                path: shown.clone(),
                source,
            })?;
        let records: Vec<ViolationInfo> =
            serde_json::from_str(&raw).map_err(|source| CatalogLoadError::Parse {
                path: shown.clone(),
                source,
            })?;

        let registry = Self::from_records(records);
        tracing::info!(path = %shown, vehicles = registry.len(), "Violation registry loaded");
        Ok(registry)
    }

    /// Adds or replaces the record for its plate.
    pub fn insert(&mut self, record: ViolationInfo) {
        self.records.insert(normalize_plate(&record.plate_number), record);
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[async_trait]
impl ViolationLookup for InMemoryViolationRegistry {
    async fn check(&self, plate_number: &str) -> ViolationInfo {
        let key = normalize_plate(plate_number);
        match self.records.get(&key) {
            Some(record) => {
                tracing::debug!(plate = %key, violations = record.violations.len(), "Violation record found");
                record.clone()
            }
            None => {
                tracing::debug!(plate = %key, "No violation record, returning clean record");
                ViolationInfo::clean(plate_number)
            }
        }
    }
}

fn violation(
    date: &str,
    what: &str,
    location: &str,
    fine: u64,
    officer: &str,
    status: ViolationStatus,
) -> Violation {
    Violation {
        date: date.to_string(),
        violation: what.to_string(),
        location: location.to_string(),
        fine,
        officer_name: officer.to_string(),
        status,
    }
}

fn vehicle(plate: &str, chassis: &str, owner: &str, kind: &str, violations: Vec<Violation>) -> ViolationInfo {
    let total_fine = violations.iter().map(|v| v.fine).sum();
    ViolationInfo {
        plate_number: plate.to_string(),
        chassis_number: chassis.to_string(),
        owner_name: owner.to_string(),
        vehicle_type: kind.to_string(),
        has_violation: !violations.is_empty(),
        violations,
        total_fine,
    }
}

fn sample_records() -> Vec<ViolationInfo> {
    use ViolationStatus::*;

    vec![
        vehicle(
            "B 1234 SV",
            "MH1RP6701FK123456",
            "Budi Santoso",
            "Motor Honda Beat",
            vec![
                violation(
                    "2025-12-15",
                    "Melanggar lampu merah",
                    "Jl. Sudirman - Jakarta Pusat",
                    500_000,
                    "Brigadir Joko Widodo",
                    Unpaid,
                ),
                violation(
                    "2025-12-20",
                    "Tidak menggunakan helm SNI",
                    "Jl. Gatot Subroto - Jakarta Selatan",
                    250_000,
                    "Aipda Siti Nurhaliza",
                    Unpaid,
                ),
            ],
        ),
        vehicle(
            "B 5678 XY",
            "MHKA42BA7JK098765",
            "Siti Rahayu",
            "Mobil Toyota Avanza",
            vec![violation(
                "2026-01-02",
                "Parkir di tempat terlarang",
                "Jl. MH Thamrin - Jakarta Pusat",
                300_000,
                "Bripka Ahmad Dahlan",
                Unpaid,
            )],
        ),
        vehicle(
            "B 9999 ZZ",
            "MH1JC5101FK234567",
            "Ahmad Fauzi",
            "Motor Yamaha NMAX",
            Vec::new(),
        ),
        vehicle(
            "D 1111 AA",
            "MHRGN81235K876543",
            "Rina Kartika",
            "Mobil Honda CR-V",
            vec![violation(
                "2025-12-28",
                "Melebihi batas kecepatan (120 km/jam di tol)",
                "Tol Jagorawi KM 15",
                500_000,
                "Aiptu Bambang Suryono",
                Paid,
            )],
        ),
        vehicle(
            "E 7777 BB",
            "MH1JFJ110FK345678",
            "Dedi Gunawan",
            "Motor Kawasaki Ninja",
            vec![violation(
                "2026-01-05",
                "Menggunakan handphone saat berkendara",
                "Jl. Asia Afrika - Bandung",
                750_000,
                "Brigadir Eka Prasetya",
                Unpaid,
            )],
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn lookup_normalizes_plate() {
        let registry = InMemoryViolationRegistry::with_sample_data();

        let info = registry.check("b 1234 sv").await;

        assert_eq!(info.plate_number, "B 1234 SV");
        assert!(info.has_violation);
        assert_eq!(info.violations.len(), 2);
        assert_eq!(info.total_fine, 750_000);
        assert_eq!(info.unpaid_total(), 750_000);
    }

    #[tokio::test]
    async fn clean_vehicle_has_no_violations() {
        let registry = InMemoryViolationRegistry::with_sample_data();
        let info = registry.check("B9999ZZ").await;
        assert!(!info.has_violation);
        assert_eq!(info.owner_name, "Ahmad Fauzi");
    }

    #[tokio::test]
    async fn paid_fines_are_not_unpaid() {
        let registry = InMemoryViolationRegistry::with_sample_data();
        let info = registry.check("D1111AA").await;
        assert_eq!(info.total_fine, 500_000);
        assert_eq!(info.unpaid_total(), 0);
    }

    #[tokio::test]
    async fn unknown_plate_yields_clean_record() {
        let registry = InMemoryViolationRegistry::with_sample_data();
        let info = registry.check("Z 4321 QQ").await;
        assert_eq!(info.plate_number, "Z 4321 QQ");
        assert!(!info.has_violation);
        assert!(info.violations.is_empty());
    }

    #[tokio::test]
    async fn load_from_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("violations.json");
        std::fs::write(
            &path,
            r#"[{
                "plate_number": "F 1 AB",
                "chassis_number": "X1",
                "owner_name": "Tono",
                "vehicle_type": "Motor",
                "has_violation": true,
                "violations": [{
                    "date": "2026-02-01",
                    "violation": "Melawan arus",
                    "location": "Bogor",
                    "fine": 500000,
                    "officer_name": "Bripda Andi",
                    "status": "processed"
                }],
                "total_fine": 500000
            }]"#,
        )
        .unwrap();

        let registry = InMemoryViolationRegistry::load(&path).await.unwrap();

        assert_eq!(registry.len(), 1);
        let info = registry.check("F1AB").await;
        assert_eq!(info.violations[0].status, ViolationStatus::Processed);
    }

    #[tokio::test]
    async fn load_missing_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        let err = InMemoryViolationRegistry::load(dir.path().join("nope.json"))
            .await
            .unwrap_err();
        assert!(matches!(err, CatalogLoadError::Io { .. }));
    }
}
