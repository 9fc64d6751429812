//! Flow engine - pure traversal over a [`FlowDefinition`].
//!
//! Given the node a session currently occupies and the raw text of the
//! user's reply, the engine decides which node comes next. It holds no
//! per-session state and performs no I/O, so the same `(node, input)` pair
//! always yields the same answer.
//!
//! # Choice resolution
//!
//! Input is trimmed and lowercased, then matched against the node's choices
//! by the first rule that produces a hit, in this order:
//!
//! 1. the whole input equals a choice label (case-insensitive)
//! 2. the input contains a choice label
//! 3. the input contains a choice id
//! 4. the input is a 1-based ordinal (`"1"`, `"2"`, ...)
//!
//! Within a rule, the first choice in declaration order wins. Conversation
//! scripts rely on this substring behaviour, so it must not be tightened to
//! exact matching.

use std::sync::Arc;

use super::definition::{FlowChoice, FlowDefinition, FlowNode};
use crate::domain::foundation::NodeId;

/// Which matching rule resolved a choice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchRule {
    ExactLabel,
    ContainsLabel,
    ContainsId,
    Ordinal,
}

/// A choice picked out of free-form input.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedChoice<'a> {
    pub choice: &'a FlowChoice,
    pub rule: MatchRule,
}

impl ResolvedChoice<'_> {
    pub fn id(&self) -> &str {
        &self.choice.id
    }
}

/// Result of a successful advance.
#[derive(Debug, Clone, PartialEq)]
pub struct FlowStep<'a> {
    pub node_id: &'a NodeId,
    pub node: &'a FlowNode,
}

/// Stateless traversal over a shared flow definition.
#[derive(Debug, Clone)]
pub struct FlowEngine {
    definition: Arc<FlowDefinition>,
}

impl FlowEngine {
    pub fn new(definition: Arc<FlowDefinition>) -> Self {
        Self { definition }
    }

    pub fn definition(&self) -> &FlowDefinition {
        &self.definition
    }

    pub fn entry_node_id(&self) -> &NodeId {
        self.definition.entry_node_id()
    }

    /// Looks up a node; unknown or stale ids yield `None`.
    pub fn get_node(&self, id: &str) -> Option<&FlowNode> {
        self.definition.node(id)
    }

    /// Resolves free-form input to one of the node's choices.
    ///
    /// Nodes without choices never resolve.
    pub fn resolve_choice<'a>(&self, node: &'a FlowNode, raw_input: &str) -> Option<ResolvedChoice<'a>> {
        resolve_choice(node, raw_input)
    }

    /// Computes the node that follows `current_node_id` for this input.
    ///
    /// Returns `None` when the current node is unknown, no choice resolves,
    /// or no transition covers the resolved choice. Callers keep the session
    /// on its current node in every one of those cases.
    pub fn advance(&self, current_node_id: &str, raw_input: &str) -> Option<FlowStep<'_>> {
        let node = self.get_node(current_node_id)?;
        let resolved = resolve_choice(node, raw_input)?;

        let transition = node
            .transitions
            .iter()
            .find(|t| t.when.contains(resolved.id()))?;

        let next = self.get_node(transition.to.as_str())?;
        Some(FlowStep {
            node_id: &next.id,
            node: next,
        })
    }
}

/// Applies the layered matching rules described in the module docs.
pub fn resolve_choice<'a>(node: &'a FlowNode, raw_input: &str) -> Option<ResolvedChoice<'a>> {
    if node.choices.is_empty() {
        return None;
    }

    let input = raw_input.trim().to_lowercase();
    if input.is_empty() {
        return None;
    }

    let found = |rule: MatchRule, choice: Option<&'a FlowChoice>| {
        choice.map(|choice| ResolvedChoice { choice, rule })
    };

    let exact = node
        .choices
        .iter()
        .find(|c| c.label.trim().to_lowercase() == input);
    if let Some(hit) = found(MatchRule::ExactLabel, exact) {
        return Some(hit);
    }

    // An empty label or id would be a substring of everything.
    let contains_label = node.choices.iter().find(|c| {
        let label = c.label.trim().to_lowercase();
        !label.is_empty() && input.contains(&label)
    });
    if let Some(hit) = found(MatchRule::ContainsLabel, contains_label) {
        return Some(hit);
    }

    let contains_id = node
        .choices
        .iter()
        .find(|c| !c.id.is_empty() && input.contains(c.id.as_str()));
    if let Some(hit) = found(MatchRule::ContainsId, contains_id) {
        return Some(hit);
    }

    if input.bytes().all(|b| b.is_ascii_digit()) {
        let ordinal = input.parse::<usize>().ok().filter(|&n| n >= 1)?;
        return found(MatchRule::Ordinal, node.choices.get(ordinal - 1));
    }

    None
}
