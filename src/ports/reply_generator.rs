//! Reply generator port.
//!
//! Receives the context bundle assembled for a chat turn and produces the
//! assistant's answer. The orchestrator never builds prompts itself.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::ai_provider::AIError;
use super::service_catalog::ServiceInfo;
use super::violation_lookup::ViolationInfo;
use crate::domain::flow::{FlowNode, NodeType};
use crate::domain::foundation::{NodeId, SessionId};
use crate::domain::session::ChatMessage;

/// Choice shown to the user for the active flow step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActiveFlowChoice {
    pub id: String,
    pub label: String,
}

/// Snapshot of the flow step a session currently sits on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActiveFlow {
    pub active: bool,
    #[serde(rename = "current_node")]
    pub node_id: NodeId,
    pub node_type: NodeType,
    #[serde(rename = "node_text")]
    pub text: String,
    pub choices: Vec<ActiveFlowChoice>,
    /// Upload key requested by a collect node.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub collect_key: Option<String>,
    /// Accepted mime types for a collect node.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub accepted_mime: Vec<String>,
}

impl ActiveFlow {
    pub fn from_node(node: &FlowNode) -> Self {
        let (collect_key, accepted_mime) = match &node.collect {
            Some(spec) => (Some(spec.key.clone()), spec.mime.clone()),
            None => (None, Vec::new()),
        };
        Self {
            active: true,
            node_id: node.id.clone(),
            node_type: node.node_type,
            text: node.text.clone(),
            choices: node
                .choices
                .iter()
                .map(|c| ActiveFlowChoice {
                    id: c.id.clone(),
                    label: c.label.clone(),
                })
                .collect(),
            collect_key,
            accepted_mime,
        }
    }
}

/// Metadata of a document attached to a chat turn.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadedDocument {
    pub file_name: String,
    #[serde(default)]
    pub file_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Everything the reply generator needs to answer one turn.
#[derive(Debug, Clone, PartialEq)]
pub struct TurnContext {
    pub session_id: SessionId,
    /// Conversation so far, excluding the current message.
    pub history: Vec<ChatMessage>,
    pub active_flow: Option<ActiveFlow>,
    pub service_info: Option<ServiceInfo>,
    pub violation_info: Option<ViolationInfo>,
    pub documents: Vec<UploadedDocument>,
}

impl TurnContext {
    pub fn new(session_id: SessionId) -> Self {
        Self {
            session_id,
            history: Vec::new(),
            active_flow: None,
            service_info: None,
            violation_info: None,
            documents: Vec::new(),
        }
    }

    pub fn is_first_message(&self) -> bool {
        self.history.is_empty()
    }

    pub fn has_uploaded_documents(&self) -> bool {
        !self.documents.is_empty()
    }

    pub fn uploaded_document_count(&self) -> usize {
        self.documents.len()
    }
}

/// Port for generating the assistant reply of a turn.
#[async_trait]
pub trait ReplyGenerator: Send + Sync {
    async fn generate(&self, context: &TurnContext, message: &str) -> Result<String, AIError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::flow::{CollectSpec, FlowChoice};

    fn question_node() -> FlowNode {
        FlowNode {
            id: NodeId::from("entry_node"),
            node_type: NodeType::Question,
            text: "Mau buat atau perpanjang?".to_string(),
            choices: vec![FlowChoice {
                id: "a".to_string(),
                label: "Buat SIM baru".to_string(),
                value: None,
            }],
            collect: None,
            action: None,
            transitions: Vec::new(),
        }
    }

    #[test]
    fn reply_generator_is_object_safe() {
        fn _accepts_dyn(_generator: &dyn ReplyGenerator) {}
    }

    #[test]
    fn active_flow_copies_choices() {
        let flow = ActiveFlow::from_node(&question_node());
        assert!(flow.active);
        assert_eq!(flow.node_id.as_str(), "entry_node");
        assert_eq!(
            flow.choices,
            vec![ActiveFlowChoice {
                id: "a".to_string(),
                label: "Buat SIM baru".to_string()
            }]
        );
        assert!(flow.collect_key.is_none());
    }

    #[test]
    fn active_flow_surfaces_collect_requirements() {
        let mut node = question_node();
        node.node_type = NodeType::Collect;
        node.choices.clear();
        node.collect = Some(CollectSpec {
            key: "ktp".to_string(),
            mime: vec!["image/jpeg".to_string()],
        });

        let flow = ActiveFlow::from_node(&node);
        assert_eq!(flow.collect_key.as_deref(), Some("ktp"));
        assert_eq!(flow.accepted_mime, vec!["image/jpeg".to_string()]);
    }

    #[test]
    fn active_flow_serializes_with_wire_names() {
        let json = serde_json::to_value(ActiveFlow::from_node(&question_node())).unwrap();
        assert_eq!(json["current_node"], "entry_node");
        assert_eq!(json["node_type"], "question");
        assert_eq!(json["node_text"], "Mau buat atau perpanjang?");
    }

    #[test]
    fn turn_context_document_flags() {
        let mut context = TurnContext::new(SessionId::generate());
        assert!(context.is_first_message());
        assert!(!context.has_uploaded_documents());

        context.documents.push(UploadedDocument {
            file_name: "ktp.jpg".to_string(),
            file_type: "image/jpeg".to_string(),
            description: Some("KTP".to_string()),
        });
        assert!(context.has_uploaded_documents());
        assert_eq!(context.uploaded_document_count(), 1);
    }
}
