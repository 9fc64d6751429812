//! Intent module - lightweight dispatch signals for a chat turn.
//!
//! Nothing here understands language; it only decides which sub-flows a
//! message should wake up and pulls a plate number out of the text.

mod classifier;
mod plate;

pub use classifier::{
    IntentClassifier, TurnIntents, FLOW_TRIGGER_KEYWORDS, SERVICE_KEYWORDS, VIOLATION_KEYWORDS,
};
pub use plate::{extract_plate_number, normalize_plate};
