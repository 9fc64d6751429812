//! File-backed flow definition loader.
//!
//! Reads a flow document from disk and validates it. The format follows the
//! file extension: `.json` for JSON, `.yaml`/`.yml` for YAML.

use std::path::{Path, PathBuf};

use tokio::fs;

use crate::domain::flow::{FlowDefinition, FlowDefinitionError};

/// Supported flow document encodings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowFormat {
    Json,
    Yaml,
}

impl FlowFormat {
    /// Detects the format from a path's extension.
    pub fn from_path(path: &Path) -> Result<Self, FlowDefinitionError> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);
        match ext.as_deref() {
            Some("json") => Ok(Self::Json),
            Some("yaml") | Some("yml") => Ok(Self::Yaml),
            _ => Err(FlowDefinitionError::UnsupportedFormat(
                path.display().to_string(),
            )),
        }
    }
}

/// Loads flow definitions from the filesystem.
#[derive(Debug, Clone)]
pub struct FileFlowLoader {
    path: PathBuf,
}

impl FileFlowLoader {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads, parses and validates the flow document.
    ///
    /// # Errors
    ///
    /// Any error here is meant to abort start-up.
    pub async fn load(&self) -> Result<FlowDefinition, FlowDefinitionError> {
        let format = FlowFormat::from_path(&self.path)?;
        let raw = fs::read_to_string(&self.path)
            .await
            .map_err(|source| FlowDefinitionError::Io {
                path: self.path.display().to_string(),
                source,
            })?;

        let definition = match format {
            FlowFormat::Json => FlowDefinition::from_json_str(&raw)?,
            FlowFormat::Yaml => FlowDefinition::from_yaml_str(&raw)?,
        };

        let unreachable = definition.unreachable_nodes();
        if !unreachable.is_empty() {
            let ids: Vec<&str> = unreachable.iter().map(|id| id.as_str()).collect();
            tracing::warn!(
                flow_id = definition.flow_id(),
                nodes = ?ids,
                "Flow contains nodes unreachable from the entry node"
            );
        }

        tracing::info!(
            flow_id = definition.flow_id(),
            version = definition.version(),
            nodes = definition.node_count(),
            entry_node = %definition.entry_node_id(),
            path = %self.path.display(),
            "Flow definition loaded"
        );

        Ok(definition)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const FLOW_JSON: &str = r#"{
        "flow_id": "sim",
        "version": "1",
        "entry_node": "entry_node",
        "nodes": [
            {"id": "entry_node", "type": "question", "text": "Pilih",
             "choices": [{"id": "a", "label": "Buat SIM baru"}],
             "transitions": [{"when": "a", "to": "done"}]},
            {"id": "done", "type": "message", "text": "Selesai", "transitions": []}
        ]
    }"#;

    const FLOW_YAML: &str = r#"
flow_id: sim
version: "1"
entry_node: entry_node
nodes:
  - id: entry_node
    type: question
    text: Pilih
    choices:
      - id: a
        label: Buat SIM baru
    transitions:
      - when: a
        to: done
  - id: done
    type: message
    text: Selesai
"#;

    async fn write(dir: &TempDir, name: &str, contents: &str) -> PathBuf {
        let path = dir.path().join(name);
        fs::write(&path, contents).await.unwrap();
        path
    }

    #[tokio::test]
    async fn loads_json_by_extension() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "flow.json", FLOW_JSON).await;

        let flow = FileFlowLoader::new(&path).load().await.unwrap();

        assert_eq!(flow.flow_id(), "sim");
        assert_eq!(flow.node_count(), 2);
    }

    #[tokio::test]
    async fn loads_yaml_by_extension() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "flow.yml", FLOW_YAML).await;

        let flow = FileFlowLoader::new(&path).load().await.unwrap();

        assert_eq!(flow.entry_node_id().as_str(), "entry_node");
        assert!(flow.node("done").is_some());
    }

    #[tokio::test]
    async fn missing_file_is_io_error() {
        let dir = TempDir::new().unwrap();
        let err = FileFlowLoader::new(dir.path().join("absent.json"))
            .load()
            .await
            .unwrap_err();
        assert!(matches!(err, FlowDefinitionError::Io { .. }));
    }

    #[tokio::test]
    async fn unknown_extension_is_rejected() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "flow.txt", FLOW_JSON).await;
        let err = FileFlowLoader::new(&path).load().await.unwrap_err();
        assert!(matches!(err, FlowDefinitionError::UnsupportedFormat(_)));
    }

    #[tokio::test]
    async fn dangling_transition_fails_load() {
        let dir = TempDir::new().unwrap();
        let broken = FLOW_JSON.replace(r#""to": "done""#, r#""to": "nowhere""#);
        let path = write(&dir, "flow.json", &broken).await;

        let err = FileFlowLoader::new(&path).load().await.unwrap_err();
        assert!(matches!(err, FlowDefinitionError::DanglingTransition { .. }));
    }

    #[tokio::test]
    async fn malformed_document_is_parse_error() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "flow.json", "{ not json").await;
        let err = FileFlowLoader::new(&path).load().await.unwrap_err();
        assert!(matches!(err, FlowDefinitionError::Parse(_)));
    }

    #[test]
    fn format_detection_is_case_insensitive() {
        assert_eq!(FlowFormat::from_path(Path::new("a/FLOW.JSON")).unwrap(), FlowFormat::Json);
        assert_eq!(FlowFormat::from_path(Path::new("flow.yaml")).unwrap(), FlowFormat::Yaml);
        assert!(FlowFormat::from_path(Path::new("flow")).is_err());
    }
}
