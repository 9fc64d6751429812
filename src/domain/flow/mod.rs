//! Flow domain module.
//!
//! Static wizard graphs and the pure traversal logic that walks them.

mod definition;
mod engine;

pub use definition::{
    ActionSpec, CollectSpec, FlowChoice, FlowDefinition, FlowDefinitionError, FlowDocument,
    FlowNode, FlowTransition, NodeType,
};
pub use engine::{resolve_choice, FlowEngine, FlowStep, MatchRule, ResolvedChoice};
