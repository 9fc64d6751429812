//! Flow definitions.
//!
//! A flow is an immutable directed graph of conversational steps. It is
//! parsed once at start-up from a structured document and validated as a
//! whole; any structural defect is reported as a [`FlowDefinitionError`] and
//! is expected to abort start-up. After construction the graph is read-only
//! and can be shared across request tasks without synchronization.

use std::collections::{HashMap, HashSet};
use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::foundation::NodeId;

/// Kind of step a node represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeType {
    /// Informational text, no input expected.
    Message,
    /// Multiple-choice prompt.
    Question,
    /// Asks the user to upload a document.
    Collect,
    /// Side effect performed by an external collaborator.
    Action,
}

impl NodeType {
    pub fn as_str(&self) -> &'static str {
        match self {
            NodeType::Message => "message",
            NodeType::Question => "question",
            NodeType::Collect => "collect",
            NodeType::Action => "action",
        }
    }
}

impl fmt::Display for NodeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One selectable option of a question node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlowChoice {
    pub id: String,
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<serde_json::Value>,
}

/// Upload requirements of a collect node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectSpec {
    pub key: String,
    #[serde(default)]
    pub mime: Vec<String>,
}

/// Action descriptor, carried verbatim for the collaborator that executes it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionSpec {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub template: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub inputs: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

/// Edge of the flow graph.
///
/// `when` is matched against a resolved choice id by substring, so a single
/// transition may serve several choices (e.g. `"a|b"`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlowTransition {
    pub when: String,
    pub to: NodeId,
}

/// A single step of a flow.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlowNode {
    pub id: NodeId,
    #[serde(rename = "type")]
    pub node_type: NodeType,
    pub text: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub choices: Vec<FlowChoice>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub collect: Option<CollectSpec>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action: Option<ActionSpec>,
    #[serde(default)]
    pub transitions: Vec<FlowTransition>,
}

/// Wire format of a flow document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FlowDocument {
    #[serde(default)]
    pub flow_id: String,
    #[serde(default)]
    pub version: String,
    #[serde(default)]
    pub locale: String,
    pub entry_node: NodeId,
    pub nodes: Vec<FlowNode>,
}

/// Structural defects detected while loading a flow.
#[derive(Debug, Error)]
pub enum FlowDefinitionError {
    #[error("failed to read flow document {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse flow document: {0}")]
    Parse(String),

    #[error("unsupported flow document format: {0}")]
    UnsupportedFormat(String),

    #[error("flow has no nodes")]
    Empty,

    #[error("duplicate node id: {0}")]
    DuplicateNode(NodeId),

    #[error("entry node '{0}' does not exist")]
    MissingEntryNode(NodeId),

    #[error("node '{from}' has a transition to unknown node '{to}'")]
    DanglingTransition { from: NodeId, to: NodeId },

    #[error("question node '{0}' has no choices")]
    QuestionWithoutChoices(NodeId),
}

/// A validated, immutable flow graph.
#[derive(Debug, Clone)]
pub struct FlowDefinition {
    flow_id: String,
    version: String,
    locale: String,
    entry_node: NodeId,
    nodes: Vec<FlowNode>,
    index: HashMap<NodeId, usize>,
}

impl FlowDefinition {
    /// Builds a definition from a parsed document, validating the graph.
    ///
    /// # Errors
    ///
    /// Returns the first structural defect found.
    pub fn from_document(doc: FlowDocument) -> Result<Self, FlowDefinitionError> {
        if doc.nodes.is_empty() {
            return Err(FlowDefinitionError::Empty);
        }

        let mut index = HashMap::with_capacity(doc.nodes.len());
        for (position, node) in doc.nodes.iter().enumerate() {
            if index.insert(node.id.clone(), position).is_some() {
                return Err(FlowDefinitionError::DuplicateNode(node.id.clone()));
            }
        }

        if !index.contains_key(&doc.entry_node) {
            return Err(FlowDefinitionError::MissingEntryNode(doc.entry_node));
        }

        for node in &doc.nodes {
            if node.node_type == NodeType::Question && node.choices.is_empty() {
                return Err(FlowDefinitionError::QuestionWithoutChoices(node.id.clone()));
            }
            for transition in &node.transitions {
                if !index.contains_key(&transition.to) {
                    return Err(FlowDefinitionError::DanglingTransition {
                        from: node.id.clone(),
                        to: transition.to.clone(),
                    });
                }
            }
        }

        Ok(Self {
            flow_id: doc.flow_id,
            version: doc.version,
            locale: doc.locale,
            entry_node: doc.entry_node,
            nodes: doc.nodes,
            index,
        })
    }

    /// Parses and validates a JSON flow document.
    pub fn from_json_str(json: &str) -> Result<Self, FlowDefinitionError> {
        let doc: FlowDocument =
            serde_json::from_str(json).map_err(|e| FlowDefinitionError::Parse(e.to_string()))?;
        Self::from_document(doc)
    }

    /// Parses and validates a YAML flow document.
    pub fn from_yaml_str(yaml: &str) -> Result<Self, FlowDefinitionError> {
        let doc: FlowDocument =
            serde_yaml::from_str(yaml).map_err(|e| FlowDefinitionError::Parse(e.to_string()))?;
        Self::from_document(doc)
    }

    pub fn flow_id(&self) -> &str {
        &self.flow_id
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn locale(&self) -> &str {
        &self.locale
    }

    pub fn entry_node_id(&self) -> &NodeId {
        &self.entry_node
    }

    /// O(1) lookup by id.
    pub fn node(&self, id: &str) -> Option<&FlowNode> {
        self.index.get(id).map(|&position| &self.nodes[position])
    }

    pub fn nodes(&self) -> &[FlowNode] {
        &self.nodes
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Ids of nodes that cannot be reached from the entry node.
    ///
    /// Unreachable nodes are legal but usually indicate an editing mistake,
    /// so callers log them at load time.
    pub fn unreachable_nodes(&self) -> Vec<&NodeId> {
        let mut seen: HashSet<&NodeId> = HashSet::new();
        let mut stack = vec![&self.entry_node];
        while let Some(id) = stack.pop() {
            if !seen.insert(id) {
                continue;
            }
            if let Some(node) = self.node(id.as_str()) {
                stack.extend(node.transitions.iter().map(|t| &t.to));
            }
        }
        self.nodes
            .iter()
            .map(|n| &n.id)
            .filter(|id| !seen.contains(id))
            .collect()
    }
}
