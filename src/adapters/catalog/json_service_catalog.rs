//! JSON-file backed service catalog.
//!
//! Records are loaded once at start-up. Search is keyword based:
//!
//! 1. the readable service name contains the whole query
//! 2. the query names a category (SIM, STNK, ...) and a qualifier that
//!    points at one specific service
//! 3. at least two underscore-separated parts of a service name occur in
//!    the query
//!
//! Within each pass records are visited in file order.

use std::path::Path;

use async_trait::async_trait;
use once_cell::sync::Lazy;

use crate::ports::{ServiceCatalog, ServiceInfo, ServiceRecord};

/// Service categories with the phrases that select them, in priority order.
static CATEGORIES: Lazy<Vec<(Category, Vec<&'static str>)>> = Lazy::new(|| {
    vec![
        (
            Category::Sim,
            vec![
                "sim",
                "surat izin mengemudi",
                "bikin sim",
                "buat sim",
                "perpanjang sim",
                "perpanjangan sim",
                "sim hilang",
                "sim rusak",
                "sim internasional",
            ],
        ),
        (
            Category::Stnk,
            vec![
                "stnk",
                "pajak kendaraan",
                "pajak motor",
                "pajak mobil",
                "pengesahan stnk",
                "stnk hilang",
                "ganti data stnk",
                "lapor kehilangan stnk",
            ],
        ),
        (
            Category::Tilang,
            vec!["tilang", "etle", "e-tilang", "cek tilang", "pelanggaran"],
        ),
        (Category::Bpn, vec!["balik nama", "mutasi kendaraan", "mutasi"]),
        (Category::Kehilangan, vec!["hilang", "kehilangan", "lapor kehilangan"]),
    ]
});

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Category {
    Sim,
    Stnk,
    Tilang,
    Bpn,
    Kehilangan,
}

impl Category {
    fn detect(query: &str) -> Option<Self> {
        CATEGORIES
            .iter()
            .find(|(_, words)| words.iter().any(|w| query.contains(w)))
            .map(|(category, _)| *category)
    }

    /// Whether `name` (lowercase snake case) is the service this category
    /// and the query's qualifier point at.
    fn selects(self, query: &str, name: &str) -> bool {
        let has = |word: &str| query.contains(word);
        match self {
            Category::Sim => {
                if has("buat") || has("bikin") {
                    name.contains("buat_sim")
                } else if has("perpanjang") {
                    name.contains("perpanjangan_sim")
                } else if has("hilang") || has("rusak") {
                    name.contains("sim_hilang")
                } else if has("internasional") {
                    name.contains("sim_internasional")
                } else {
                    false
                }
            }
            Category::Stnk => {
                if has("pajak") {
                    name.contains("pajak_kendaraan")
                } else if has("pengesahan") || has("5 tahun") {
                    name.contains("pengesahan_stnk")
                } else if has("ganti data") {
                    name.contains("ganti_data_stnk")
                } else if has("hilang") {
                    name.contains("laporan_kehilangan_stnk")
                } else if has("cek status") {
                    name.contains("cek_status")
                } else {
                    false
                }
            }
            Category::Tilang => name.contains("cek_tilang") || name.contains("etle"),
            Category::Bpn => name.contains("balik_nama") || name.contains("mutasi"),
            Category::Kehilangan => false,
        }
    }
}

/// Errors raised while loading the catalog file.
#[derive(Debug, thiserror::Error)]
pub enum CatalogLoadError {
    #[error("failed to read catalog {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse catalog {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

/// In-memory catalog of police administrative services.
#[derive(Debug, Clone, Default)]
pub struct JsonServiceCatalog {
    records: Vec<ServiceRecord>,
}

impl JsonServiceCatalog {
    pub fn from_records(records: Vec<ServiceRecord>) -> Self {
        Self { records }
    }

    pub fn from_json_str(json: &str) -> Result<Self, serde_json::Error> {
        Ok(Self::from_records(serde_json::from_str(json)?))
    }

    /// Loads the catalog from `path`.
    ///
    /// A missing file yields an empty catalog; the assistant still answers,
    /// just without service requirements.
    pub async fn load(path: impl AsRef<Path>) -> Result<Self, CatalogLoadError> {
        let path = path.as_ref();
        let shown = path.display().to_string();

        let raw = match tokio::fs::read_to_string(path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::warn!(path = %shown, "Service catalog not found, continuing with an empty catalog");
                return Ok(Self::default());
            }
            Err(source) => return Err(CatalogLoadError::Io { path: shown, source }),
        };

        let catalog = Self::from_json_str(&raw).map_err(|source| CatalogLoadError::Parse {
            path: shown.clone(),
            source,
        })?;

        tracing::info!(path = %shown, services = catalog.len(), "Service catalog loaded");
        Ok(catalog)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Synchronous search used by the port implementation.
    pub fn find(&self, query: &str) -> Option<&ServiceRecord> {
        let query_lower = query.trim().to_lowercase();
        if query_lower.is_empty() {
            return None;
        }
        let category = Category::detect(&query_lower);

        for record in &self.records {
            let name = record.jenis_pelayanan.to_lowercase();
            if name.replace('_', " ").contains(&query_lower) {
                tracing::debug!(service = %record.jenis_pelayanan, "Service matched by name");
                return Some(record);
            }
            if let Some(category) = category {
                if category.selects(&query_lower, &name) {
                    tracing::debug!(service = %record.jenis_pelayanan, ?category, "Service matched by category");
                    return Some(record);
                }
            }
        }

        self.records.iter().find(|record| {
            let name = record.jenis_pelayanan.to_lowercase();
            let hits = name
                .split('_')
                .filter(|part| !part.is_empty() && query_lower.contains(part))
                .count();
            hits >= 2
        })
    }
}

#[async_trait]
impl ServiceCatalog for JsonServiceCatalog {
    async fn search(&self, query: &str) -> ServiceInfo {
        match self.find(query) {
            Some(record) => ServiceInfo::found(record.clone(), query),
            None => {
                tracing::debug!(query = %query, "No service matched");
                ServiceInfo::not_found(query)
            }
        }
    }

    async fn all(&self) -> Vec<ServiceRecord> {
        self.records.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(no: u32, name: &str) -> ServiceRecord {
        ServiceRecord {
            no,
            jenis_pelayanan: name.to_string(),
            dokumen_yang_perlu_disiapkan: vec!["KTP".to_string()],
        }
    }

    fn catalog() -> JsonServiceCatalog {
        JsonServiceCatalog::from_records(vec![
            record(1, "buat_sim_baru"),
            record(2, "perpanjangan_sim"),
            record(3, "sim_hilang_atau_rusak"),
            record(4, "sim_internasional"),
            record(5, "pajak_kendaraan_tahunan"),
            record(6, "pengesahan_stnk_5_tahun"),
            record(7, "ganti_data_stnk"),
            record(8, "laporan_kehilangan_stnk"),
            record(9, "cek_tilang_etle"),
            record(10, "balik_nama_kendaraan"),
            record(11, "mutasi_kendaraan"),
        ])
    }

    fn found(query: &str) -> Option<String> {
        catalog().find(query).map(|r| r.jenis_pelayanan.clone())
    }

    #[test]
    fn direct_name_match() {
        assert_eq!(found("Perpanjangan SIM"), Some("perpanjangan_sim".to_string()));
        assert_eq!(found("ganti data stnk"), Some("ganti_data_stnk".to_string()));
    }

    #[test]
    fn sim_qualifiers() {
        assert_eq!(found("gimana cara bikin sim?"), Some("buat_sim_baru".to_string()));
        assert_eq!(found("mau perpanjang sim saya"), Some("perpanjangan_sim".to_string()));
        assert_eq!(found("sim saya rusak"), Some("sim_hilang_atau_rusak".to_string()));
        assert_eq!(found("syarat sim internasional apa"), Some("sim_internasional".to_string()));
    }

    #[test]
    fn stnk_qualifiers() {
        assert_eq!(found("bayar pajak stnk"), Some("pajak_kendaraan_tahunan".to_string()));
        assert_eq!(found("stnk sudah 5 tahun"), Some("pengesahan_stnk_5_tahun".to_string()));
        assert_eq!(found("stnk saya hilang"), Some("laporan_kehilangan_stnk".to_string()));
    }

    #[test]
    fn tilang_and_transfer_categories() {
        assert_eq!(found("ada e-tilang ga"), Some("cek_tilang_etle".to_string()));
        assert_eq!(found("mau balik nama motor"), Some("balik_nama_kendaraan".to_string()));
    }

    #[test]
    fn fuzzy_match_needs_two_parts() {
        let catalog = JsonServiceCatalog::from_records(vec![record(1, "surat_keterangan_catatan")]);
        assert!(catalog.find("minta surat keterangan").is_some());
        assert!(catalog.find("minta surat").is_none());
    }

    #[test]
    fn unknown_query_not_found() {
        assert_eq!(found("cuaca hari ini"), None);
        assert_eq!(found("   "), None);
    }

    #[tokio::test]
    async fn search_wraps_result() {
        let info = catalog().search("perpanjang sim").await;
        assert!(info.found);
        assert_eq!(info.query, "perpanjang sim");
        assert_eq!(info.service.unwrap().no, 2);

        let info = catalog().search("halo").await;
        assert!(!info.found);
        assert!(info.service.is_none());
    }

    #[tokio::test]
    async fn load_missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let catalog = JsonServiceCatalog::load(dir.path().join("absent.json")).await.unwrap();
        assert!(catalog.is_empty());
    }

    #[tokio::test]
    async fn load_reads_records() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pelayanan.json");
        std::fs::write(
            &path,
            r#"[{"no": 1, "jenis_pelayanan": "perpanjangan_sim", "dokumen_yang_perlu_disiapkan": ["KTP", "SIM lama"]}]"#,
        )
        .unwrap();

        let catalog = JsonServiceCatalog::load(&path).await.unwrap();

        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.all().await[0].dokumen_yang_perlu_disiapkan.len(), 2);
    }

    #[tokio::test]
    async fn load_rejects_malformed_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pelayanan.json");
        std::fs::write(&path, "{not json").unwrap();

        let err = JsonServiceCatalog::load(&path).await.unwrap_err();
        assert!(matches!(err, CatalogLoadError::Parse { .. }));
    }
}
