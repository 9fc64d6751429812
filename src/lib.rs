//! Police Assistant - conversational traffic-police backend
//!
//! Tracks multi-turn chat sessions, walks users through guided service
//! flows (driver-license renewal), looks up service requirements and
//! traffic violations, and hands the enriched context to an LLM.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
